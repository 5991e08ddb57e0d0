//! Typed containers → plain JSON.
//!
//! Attributes whose value is absent or falsy are left out of the output; see
//! [`AttrValue::is_truthy`]. A nested variant with no values is still
//! written, since it carries its tag. Dynamic maps write every attribute that
//! is set, followed by the passthrough keys that no attribute declares.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::codec::binary;
use crate::error::{Error, Result};
use crate::options::CodecOptions;
use crate::schema::{Attribute, Registry, Schema, UNTYPED};
use crate::value::{AttrValue, Container};

/// Encodes containers against the schemas of a [`Registry`].
///
/// Holds no per-call state, so one encoder can be shared across threads.
#[derive(Debug, Clone)]
pub struct Encoder {
    registry: Arc<Registry>,
    options: CodecOptions,
}

impl Encoder {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self::with_options(registry, CodecOptions::default())
    }

    pub fn with_options(registry: Arc<Registry>, options: CodecOptions) -> Self {
        Self { registry, options }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Encode a container with its own (concrete) schema.
    pub fn encode(&self, container: &Container) -> Result<Map<String, Value>> {
        let schema = self.registry.schema(container.schema())?;
        self.container(schema, container, 0)
    }

    /// Encode a container's attributes as declared by `schema`.
    pub fn encode_container(
        &self,
        schema: &Schema,
        container: &Container,
    ) -> Result<Map<String, Value>> {
        self.container(schema, container, 0)
    }

    /// Encode a single attribute value.
    pub fn encode_attribute(&self, attribute: &Attribute, value: &AttrValue) -> Result<Value> {
        self.attribute(attribute, value, 0)
    }

    fn descend(&self, depth: usize) -> Result<usize> {
        let depth = depth + 1;
        if depth > self.options.max_depth {
            tracing::debug!(limit = self.options.max_depth, "encode depth exceeded");
            return Err(Error::DepthExceeded {
                limit: self.options.max_depth,
            });
        }
        Ok(depth)
    }

    fn container(
        &self,
        schema: &Schema,
        container: &Container,
        depth: usize,
    ) -> Result<Map<String, Value>> {
        let depth = self.descend(depth)?;
        let tag = self.registry.tag_of(container.schema());
        if schema.is_dynamic() {
            return self.dynamic(schema, container, tag, depth);
        }

        let mut out = Map::new();
        for (name, attr) in schema.attributes() {
            if let Attribute::Discriminator = attr {
                if let Some(tag) = tag {
                    out.insert(name.clone(), Value::String(tag.to_string()));
                }
                continue;
            }
            match container.get(name) {
                Some(value) if self.is_kept(value) => {
                    out.insert(name.clone(), self.attribute(attr, value, depth)?);
                }
                _ => {}
            }
        }
        Ok(out)
    }

    fn dynamic(
        &self,
        schema: &Schema,
        container: &Container,
        tag: Option<&str>,
        depth: usize,
    ) -> Result<Map<String, Value>> {
        let mut out = Map::new();
        for (name, attr) in schema.attributes() {
            if let Attribute::Discriminator = attr {
                if let Some(tag) = tag {
                    out.insert(name.clone(), Value::String(tag.to_string()));
                }
                continue;
            }
            if let Some(value) = container.get(name) {
                out.insert(name.clone(), self.attribute(attr, value, depth)?);
            }
        }
        // Values set on undeclared names are untyped passthrough too.
        for (name, value) in container.values() {
            if schema.get(name).is_none() {
                out.insert(name.clone(), self.attribute(&UNTYPED, value, depth)?);
            }
        }
        // Declared names only ever go through their attribute codec.
        for (key, value) in container.extras() {
            if !out.contains_key(key) && schema.get(key).is_none() {
                out.insert(key.clone(), value.clone());
            }
        }
        Ok(out)
    }

    /// Falsy values are omitted, except variants: their tag alone is content.
    fn is_kept(&self, value: &AttrValue) -> bool {
        match value {
            AttrValue::Container(c) if self.registry.tag_of(c.schema()).is_some() => true,
            _ => value.is_truthy(),
        }
    }

    fn attribute(&self, attribute: &Attribute, value: &AttrValue, depth: usize) -> Result<Value> {
        match attribute {
            Attribute::Binary(format) => Ok(binary::serialize(value, *format)?),
            Attribute::Discriminator => match value {
                AttrValue::String(tag) => Ok(Value::String(tag.clone())),
                AttrValue::Container(c) => Ok(self
                    .registry
                    .tag_of(c.schema())
                    .map_or(Value::Null, |tag| Value::String(tag.to_string()))),
                other => Err(Error::Shape {
                    expected: "string",
                    found: other.kind(),
                }),
            },
            Attribute::List { .. } => {
                let AttrValue::List(items) = value else {
                    return Err(Error::Shape {
                        expected: "list",
                        found: value.kind(),
                    });
                };
                let depth = self.descend(depth)?;
                let element = attribute.element();
                items
                    .iter()
                    .map(|item| match item {
                        AttrValue::Null => Ok(Value::Null),
                        _ => self.attribute(element, item, depth),
                    })
                    .collect::<Result<Vec<_>>>()
                    .map(Value::Array)
            }
            Attribute::Map => match value {
                AttrValue::Map(map) => Ok(Value::Object(map.clone())),
                AttrValue::Json(Value::Object(map)) => Ok(Value::Object(map.clone())),
                other => Err(Error::Shape {
                    expected: "map",
                    found: other.kind(),
                }),
            },
            Attribute::TypedMap(declared) | Attribute::DynamicMap(declared) => {
                let AttrValue::Container(container) = value else {
                    return Err(Error::Shape {
                        expected: "container",
                        found: value.kind(),
                    });
                };
                let schema = self.concrete(declared, container)?;
                self.container(schema, container, depth).map(Value::Object)
            }
            Attribute::Scalar(kind) => Ok(kind.serialize(value)?),
        }
    }

    /// The container's own schema, which must be `declared` or one of its
    /// variants.
    fn concrete(&self, declared: &str, container: &Container) -> Result<&Schema> {
        let schema = self.registry.schema(container.schema())?;
        if !schema.descends_from(declared) {
            return Err(Error::VariantMismatch {
                requested: declared.to_string(),
                resolved: container.schema().to_string(),
            });
        }
        Ok(schema.as_ref())
    }
}
