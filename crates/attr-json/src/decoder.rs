//! Plain JSON → typed containers.
//!
//! Only keys present in the input are set; everything else stays unset. A key
//! holding `null` counts as absent. The discriminator key is never decoded as
//! an attribute: it selects the variant and is then skipped. The caller's
//! input is never modified.

use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::codec::binary;
use crate::error::{Error, Result};
use crate::options::CodecOptions;
use crate::schema::{Attribute, Registry, Schema};
use crate::value::{json_kind, AttrValue, Container};

/// Outcome of discriminator resolution.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedVariant<'a> {
    /// The schema that governs the remaining keys.
    pub schema: &'a Schema,
    /// The discriminator key, when the input carried one.
    pub consumed: Option<&'a str>,
}

/// Decodes plain JSON objects against the schemas of a [`Registry`].
///
/// Holds no per-call state, so one decoder can be shared across threads.
#[derive(Debug, Clone)]
pub struct Decoder {
    registry: Arc<Registry>,
    options: CodecOptions,
}

impl Decoder {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self::with_options(registry, CodecOptions::default())
    }

    pub fn with_options(registry: Arc<Registry>, options: CodecOptions) -> Self {
        Self { registry, options }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Decode `data` as an instance of the schema named `schema`, or of one of
    /// its variants.
    pub fn decode(&self, schema: &str, data: &Map<String, Value>) -> Result<Container> {
        let schema = self.registry.schema(schema)?;
        self.container(schema, data, 0)
    }

    /// Like [`decode`](Self::decode) for an arbitrary JSON value, which must
    /// be an object.
    pub fn decode_value(&self, schema: &str, data: &Value) -> Result<Container> {
        match data {
            Value::Object(map) => self.decode(schema, map),
            other => Err(Error::Shape {
                expected: "object",
                found: json_kind(other),
            }),
        }
    }

    pub fn decode_container(
        &self,
        schema: &Schema,
        data: &Map<String, Value>,
    ) -> Result<Container> {
        self.container(schema, data, 0)
    }

    /// Decode a single attribute value.
    pub fn decode_attribute(&self, attribute: &Attribute, value: &Value) -> Result<AttrValue> {
        self.attribute(attribute, value, 0)
    }

    /// Pick the schema that governs `data`.
    ///
    /// Without a discriminator attribute, or without the discriminator key in
    /// `data`, that is `schema` itself. Otherwise the key's tag selects a
    /// registered variant, which must descend from `schema`.
    pub fn resolve_variant<'a>(
        &'a self,
        schema: &'a Schema,
        data: &Map<String, Value>,
    ) -> Result<ResolvedVariant<'a>> {
        let unresolved = ResolvedVariant {
            schema,
            consumed: None,
        };
        let Some(discriminator) = schema.discriminator() else {
            return Ok(unresolved);
        };
        let family = schema.family().unwrap_or(schema.name());
        let tag = match data.get(discriminator) {
            None => return Ok(unresolved),
            Some(Value::Null) => {
                return Ok(ResolvedVariant {
                    schema,
                    consumed: Some(discriminator),
                })
            }
            Some(Value::String(tag)) => tag.as_str(),
            Some(other) => {
                return Err(Error::UnknownVariant {
                    family: family.to_string(),
                    tag: other.to_string(),
                })
            }
        };

        let variant = self
            .registry
            .variant(family, tag)
            .ok_or_else(|| Error::UnknownVariant {
                family: family.to_string(),
                tag: tag.to_string(),
            })?;
        if !variant.descends_from(schema.name()) {
            return Err(Error::VariantMismatch {
                requested: schema.name().to_string(),
                resolved: variant.name().to_string(),
            });
        }
        tracing::trace!(family, tag, variant = variant.name(), "resolved variant");
        Ok(ResolvedVariant {
            schema: variant,
            consumed: Some(discriminator),
        })
    }

    fn descend(&self, depth: usize) -> Result<usize> {
        let depth = depth + 1;
        if depth > self.options.max_depth {
            tracing::debug!(limit = self.options.max_depth, "decode depth exceeded");
            return Err(Error::DepthExceeded {
                limit: self.options.max_depth,
            });
        }
        Ok(depth)
    }

    fn container(
        &self,
        schema: &Schema,
        data: &Map<String, Value>,
        depth: usize,
    ) -> Result<Container> {
        let depth = self.descend(depth)?;
        let ResolvedVariant { schema, consumed } = self.resolve_variant(schema, data)?;

        let mut values = IndexMap::new();
        let mut extras = Map::new();
        if schema.is_dynamic() {
            for (key, value) in data {
                if Some(key.as_str()) == consumed {
                    continue;
                }
                match schema.get(key) {
                    Some(Attribute::Discriminator) => {}
                    Some(_) if value.is_null() => {}
                    Some(attr) => {
                        values.insert(key.clone(), self.attribute(attr, value, depth)?);
                    }
                    None => {
                        extras.insert(key.clone(), value.clone());
                    }
                }
            }
        } else {
            for (name, attr) in schema.attributes() {
                if let Attribute::Discriminator = attr {
                    continue;
                }
                match data.get(name) {
                    None | Some(Value::Null) => {}
                    Some(value) => {
                        values.insert(name.clone(), self.attribute(attr, value, depth)?);
                    }
                }
            }
        }

        self.registry.construct(schema.name(), values, extras)
    }

    fn attribute(&self, attribute: &Attribute, value: &Value, depth: usize) -> Result<AttrValue> {
        match attribute {
            Attribute::Binary(format) => Ok(binary::deserialize(value, *format)?),
            Attribute::Discriminator => match value {
                Value::String(tag) => Ok(AttrValue::String(tag.clone())),
                other => Err(Error::Shape {
                    expected: "string",
                    found: json_kind(other),
                }),
            },
            Attribute::List { .. } => {
                let Value::Array(items) = value else {
                    return Err(Error::Shape {
                        expected: "array",
                        found: json_kind(value),
                    });
                };
                let depth = self.descend(depth)?;
                let element = attribute.element();
                items
                    .iter()
                    .map(|item| match item {
                        Value::Null => Ok(AttrValue::Null),
                        _ => self.attribute(element, item, depth),
                    })
                    .collect::<Result<Vec<_>>>()
                    .map(AttrValue::List)
            }
            Attribute::Map => match value {
                Value::Object(map) => Ok(AttrValue::Map(map.clone())),
                other => Err(Error::Shape {
                    expected: "object",
                    found: json_kind(other),
                }),
            },
            Attribute::TypedMap(name) | Attribute::DynamicMap(name) => {
                let Value::Object(map) = value else {
                    return Err(Error::Shape {
                        expected: "object",
                        found: json_kind(value),
                    });
                };
                let schema = self.registry.schema(name)?;
                self.container(schema, map, depth).map(AttrValue::Container)
            }
            Attribute::Scalar(kind) => Ok(kind.deserialize(value)?),
        }
    }
}
