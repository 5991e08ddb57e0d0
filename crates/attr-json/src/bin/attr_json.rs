//! `attr-json`: normalize JSON documents against a schema document.
//!
//! Usage:
//!   attr-json normalize --schemas schemas.json --type Pet < pet.json
//!   attr-json describe --schemas schemas.json
//!
//! `normalize` decodes stdin into the named schema and encodes it back, which
//! drops unknown keys of non-dynamic schemas and falsy attributes.

use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use attr_json::{Attribute, Decoder, Encoder, Registry, SchemaDocument};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "attr-json", about = "Schema-driven JSON encoding and decoding")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Decode a JSON object from stdin and re-encode it.
    Normalize {
        #[arg(long)]
        schemas: PathBuf,
        #[arg(long = "type")]
        type_name: String,
        #[arg(long)]
        pretty: bool,
    },
    /// List the registered schemas.
    Describe {
        #[arg(long)]
        schemas: PathBuf,
    },
}

fn load_registry(path: &Path) -> anyhow::Result<Registry> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let document: SchemaDocument =
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
    Ok(Registry::from_document(document)?)
}

fn normalize(schemas: &Path, type_name: &str, pretty: bool) -> anyhow::Result<()> {
    let registry = Arc::new(load_registry(schemas)?);
    let mut input = String::new();
    io::stdin().read_to_string(&mut input)?;
    let data: serde_json::Value = serde_json::from_str(input.trim()).context("parsing stdin")?;

    let container = Decoder::new(registry.clone()).decode_value(type_name, &data)?;
    tracing::debug!(schema = container.schema(), "decoded input");
    let encoded = serde_json::Value::Object(Encoder::new(registry).encode(&container)?);

    let text = if pretty {
        serde_json::to_string_pretty(&encoded)?
    } else {
        serde_json::to_string(&encoded)?
    };
    let mut stdout = io::stdout().lock();
    stdout.write_all(text.as_bytes())?;
    stdout.write_all(b"\n")?;
    Ok(())
}

fn describe_attribute(attr: &Attribute) -> String {
    match attr {
        Attribute::List { of: Some(of) } => format!("list<{}>", describe_attribute(of)),
        Attribute::TypedMap(schema) | Attribute::DynamicMap(schema) => {
            format!("{}<{}>", attr.kind(), schema)
        }
        Attribute::Binary(format) => format!("binary({})", format.as_str()),
        _ => attr.kind().to_string(),
    }
}

fn describe(schemas: &Path) -> anyhow::Result<()> {
    let registry = load_registry(schemas)?;
    let mut stdout = io::stdout().lock();
    for schema in registry.schemas() {
        write!(stdout, "{} ({})", schema.name(), schema.kind().as_str())?;
        if let Some(parent) = schema.parent() {
            write!(stdout, " extends {parent}")?;
        }
        if let Some(tag) = schema.variant_tag() {
            write!(stdout, " tag {tag:?}")?;
        }
        writeln!(stdout)?;
        for (name, attr) in schema.attributes() {
            writeln!(stdout, "  {name}: {}", describe_attribute(attr))?;
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    match Cli::parse().command {
        Command::Normalize {
            schemas,
            type_name,
            pretty,
        } => normalize(&schemas, &type_name, pretty),
        Command::Describe { schemas } => describe(&schemas),
    }
}
