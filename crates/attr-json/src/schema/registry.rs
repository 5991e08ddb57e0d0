//! Schema registry: the set of known schemas and their discriminator families.
//!
//! Registration is a build step: schemas go in through `&mut self`, after
//! which the registry is shared read-only (usually behind an `Arc`) by any
//! number of encoders and decoders.

use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use super::{Attribute, Schema};
use crate::error::{Error, RegistryError};
use crate::value::{AttrValue, Container};

/// A polymorphic family: the variants registered under one discriminator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Family {
    discriminator: String,
    variants: IndexMap<String, String>,
}

impl Family {
    /// Name of the discriminator attribute.
    pub fn discriminator(&self) -> &str {
        &self.discriminator
    }

    /// Schema name registered under `tag`.
    pub fn variant(&self, tag: &str) -> Option<&str> {
        self.variants.get(tag).map(String::as_str)
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.variants.keys().map(String::as_str)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Registry {
    schemas: IndexMap<String, Arc<Schema>>,
    families: HashMap<String, Family>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a schema, expanding its parent's attributes in front of its own.
    ///
    /// Parents must be registered before their children.
    pub fn register(&mut self, schema: Schema) -> Result<Arc<Schema>, RegistryError> {
        let Schema {
            name,
            kind,
            attributes: own,
            extends,
            tag,
            ..
        } = schema;

        if self.schemas.contains_key(&name) {
            return Err(RegistryError::DuplicateSchema(name));
        }

        let mut attributes = IndexMap::new();
        let mut lineage = Vec::new();
        let mut family = None;
        if let Some(parent_name) = &extends {
            let parent = self
                .schemas
                .get(parent_name)
                .ok_or_else(|| RegistryError::UnknownParent {
                    schema: name.clone(),
                    parent: parent_name.clone(),
                })?;
            if parent.kind != kind {
                return Err(RegistryError::KindMismatch {
                    schema: name,
                    kind: kind.as_str(),
                    parent: parent_name.clone(),
                    parent_kind: parent.kind.as_str(),
                });
            }
            attributes = parent.attributes.clone();
            lineage.push(parent.name.clone());
            lineage.extend(parent.lineage.iter().cloned());
            family = parent.family.clone();
        }
        // A redeclared attribute keeps the parent's position.
        for (attr_name, attr) in own {
            attributes.insert(attr_name, attr);
        }

        let mut discriminators = attributes
            .iter()
            .filter(|(_, attr)| matches!(attr, Attribute::Discriminator))
            .map(|(attr_name, _)| attr_name);
        let discriminator = discriminators.next().cloned();
        if let Some(second) = discriminators.next() {
            return Err(RegistryError::SecondDiscriminator {
                schema: name,
                attribute: second.clone(),
            });
        }

        let new_family = match discriminator {
            Some(attr_name) if family.is_none() => Some(Family {
                discriminator: attr_name,
                variants: IndexMap::new(),
            }),
            _ => None,
        };
        if new_family.is_some() {
            family = Some(name.clone());
        }

        if let Some(tag) = &tag {
            let Some(family_name) = &family else {
                return Err(RegistryError::TagWithoutFamily {
                    schema: name,
                    tag: tag.clone(),
                });
            };
            let taken = self
                .families
                .get(family_name)
                .is_some_and(|f| f.variants.contains_key(tag));
            if taken {
                return Err(RegistryError::DuplicateTag {
                    family: family_name.clone(),
                    tag: tag.clone(),
                });
            }
        }

        if let Some(new_family) = new_family {
            self.families.insert(name.clone(), new_family);
        }
        if let (Some(tag), Some(family_name)) = (&tag, &family) {
            if let Some(f) = self.families.get_mut(family_name) {
                f.variants.insert(tag.clone(), name.clone());
            }
        }

        tracing::debug!(
            schema = %name,
            kind = kind.as_str(),
            attributes = attributes.len(),
            tag = tag.as_deref(),
            family = family.as_deref(),
            "registered schema"
        );

        let schema = Arc::new(Schema {
            name: name.clone(),
            kind,
            attributes,
            extends,
            tag,
            lineage,
            family,
        });
        self.schemas.insert(name, schema.clone());
        Ok(schema)
    }

    pub fn get(&self, name: &str) -> Option<&Arc<Schema>> {
        self.schemas.get(name)
    }

    /// Like [`get`](Self::get), failing with [`Error::UnknownSchema`].
    pub fn schema(&self, name: &str) -> Result<&Arc<Schema>, Error> {
        self.schemas
            .get(name)
            .ok_or_else(|| Error::UnknownSchema(name.to_string()))
    }

    pub fn schemas(&self) -> impl Iterator<Item = &Arc<Schema>> {
        self.schemas.values()
    }

    /// The family declared by schema `name`.
    pub fn family(&self, name: &str) -> Option<&Family> {
        self.families.get(name)
    }

    /// The variant registered under `tag` in `family`.
    pub fn variant(&self, family: &str, tag: &str) -> Option<&Arc<Schema>> {
        self.families
            .get(family)
            .and_then(|f| f.variant(tag))
            .and_then(|name| self.schemas.get(name))
    }

    /// The tag of schema `name`, if it is a registered variant.
    pub fn tag_of(&self, name: &str) -> Option<&str> {
        self.schemas.get(name).and_then(|s| s.variant_tag())
    }

    /// Build a container of schema `name` holding exactly the given values.
    ///
    /// Every value must name a declared attribute, and `extras` must be empty
    /// unless the schema is a dynamic map.
    pub fn construct(
        &self,
        name: &str,
        values: IndexMap<String, AttrValue>,
        extras: Map<String, Value>,
    ) -> Result<Container, Error> {
        let schema = self.schema(name)?;
        if let Some(attribute) = values.keys().find(|key| schema.get(key).is_none()) {
            return Err(Error::UnknownAttribute {
                schema: schema.name.clone(),
                attribute: attribute.clone(),
            });
        }
        if !schema.is_dynamic() {
            if let Some(key) = extras.keys().next() {
                return Err(Error::UnexpectedPassthrough {
                    schema: schema.name.clone(),
                    key: key.clone(),
                });
            }
        }
        Ok(Container::from_parts(schema.name.clone(), values, extras))
    }
}
