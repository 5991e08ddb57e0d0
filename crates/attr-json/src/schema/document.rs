//! JSON schema documents.
//!
//! A document lists schemas in registration order:
//!
//! ```json
//! {
//!   "schemas": [
//!     { "name": "Pet", "kind": "map", "attributes": { "cls": { "type": "discriminator" } } },
//!     { "name": "Cat", "kind": "map", "extends": "Pet", "tag": "Cat",
//!       "attributes": { "name": { "type": "unicode" } } },
//!     { "name": "Human", "kind": "model",
//!       "attributes": { "pets": { "type": "list", "of": { "type": "typed_map", "schema": "Pet" } } } }
//!   ]
//! }
//! ```

use indexmap::IndexMap;
use serde::Deserialize;

use super::{Attribute, ContainerKind, Registry, Schema};
use crate::codec::{BinaryFormat, ScalarKind};
use crate::error::RegistryError;

#[derive(Debug, Clone, Deserialize)]
pub struct SchemaDocument {
    pub schemas: Vec<SchemaEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SchemaEntry {
    pub name: String,
    pub kind: KindEntry,
    #[serde(default)]
    pub extends: Option<String>,
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default)]
    pub attributes: IndexMap<String, AttributeEntry>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KindEntry {
    Model,
    Map,
    DynamicMap,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AttributeEntry {
    Any,
    Unicode,
    Number,
    Boolean,
    Null,
    Json,
    Binary {
        #[serde(default)]
        legacy: bool,
    },
    BinarySet {
        #[serde(default)]
        legacy: bool,
    },
    UnicodeSet,
    NumberSet,
    UtcDatetime,
    Ttl,
    Version,
    List {
        #[serde(default)]
        of: Option<Box<AttributeEntry>>,
    },
    Map,
    TypedMap {
        schema: String,
    },
    DynamicMap {
        schema: String,
    },
    Discriminator,
}

fn binary_format(legacy: bool) -> BinaryFormat {
    if legacy {
        BinaryFormat::Legacy
    } else {
        BinaryFormat::DataUri
    }
}

impl From<KindEntry> for ContainerKind {
    fn from(kind: KindEntry) -> Self {
        match kind {
            KindEntry::Model => Self::Model,
            KindEntry::Map => Self::Map,
            KindEntry::DynamicMap => Self::DynamicMap,
        }
    }
}

impl From<AttributeEntry> for Attribute {
    fn from(entry: AttributeEntry) -> Self {
        match entry {
            AttributeEntry::Any => Self::Scalar(ScalarKind::Any),
            AttributeEntry::Unicode => Self::Scalar(ScalarKind::Unicode),
            AttributeEntry::Number => Self::Scalar(ScalarKind::Number),
            AttributeEntry::Boolean => Self::Scalar(ScalarKind::Boolean),
            AttributeEntry::Null => Self::Scalar(ScalarKind::Null),
            AttributeEntry::Json => Self::Scalar(ScalarKind::Json),
            AttributeEntry::Binary { legacy } => Self::Binary(binary_format(legacy)),
            AttributeEntry::BinarySet { legacy } => {
                Self::Scalar(ScalarKind::BinarySet(binary_format(legacy)))
            }
            AttributeEntry::UnicodeSet => Self::Scalar(ScalarKind::UnicodeSet),
            AttributeEntry::NumberSet => Self::Scalar(ScalarKind::NumberSet),
            AttributeEntry::UtcDatetime => Self::Scalar(ScalarKind::UtcDateTime),
            AttributeEntry::Ttl => Self::Scalar(ScalarKind::Ttl),
            AttributeEntry::Version => Self::Scalar(ScalarKind::Version),
            AttributeEntry::List { of } => Self::List {
                of: of.map(|entry| Box::new(Attribute::from(*entry))),
            },
            AttributeEntry::Map => Self::Map,
            AttributeEntry::TypedMap { schema } => Self::TypedMap(schema),
            AttributeEntry::DynamicMap { schema } => Self::DynamicMap(schema),
            AttributeEntry::Discriminator => Self::Discriminator,
        }
    }
}

impl From<SchemaEntry> for Schema {
    fn from(entry: SchemaEntry) -> Self {
        let mut schema = Schema::new(entry.name, entry.kind.into());
        if let Some(parent) = entry.extends {
            schema = schema.extends(parent);
        }
        if let Some(tag) = entry.tag {
            schema = schema.tag(tag);
        }
        for (name, attr) in entry.attributes {
            schema = schema.attribute(name, attr.into());
        }
        schema
    }
}

impl Registry {
    /// Register every schema of `document`, in order.
    pub fn from_document(document: SchemaDocument) -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        for entry in document.schemas {
            registry.register(entry.into())?;
        }
        Ok(registry)
    }
}
