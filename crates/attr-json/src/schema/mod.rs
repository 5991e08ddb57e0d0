//! Schemas: named, ordered sets of typed attributes.
//!
//! A [`Schema`] is declared with a fluent API and then handed to a
//! [`Registry`], which expands `extends` chains and wires discriminator
//! families. Nested schemas are referenced by name, so schemas may refer to
//! themselves or to each other without shared ownership.

pub mod document;
pub mod registry;

use indexmap::IndexMap;

use crate::codec::{BinaryFormat, ScalarKind};
pub use registry::{Family, Registry};

/// Attribute descriptor: what kind of value an attribute holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attribute {
    Scalar(ScalarKind),
    Binary(BinaryFormat),
    /// `of: None` means untyped elements.
    List { of: Option<Box<Attribute>> },
    /// Untyped map; contents pass through as-is.
    Map,
    /// Nested typed container, by schema name.
    TypedMap(String),
    /// Nested typed container that also keeps unknown keys, by schema name.
    DynamicMap(String),
    /// Variant tag of a polymorphic family.
    Discriminator,
}

/// Descriptor used for list elements when none is declared.
pub static UNTYPED: Attribute = Attribute::Scalar(ScalarKind::Any);

impl Attribute {
    pub fn any() -> Self {
        Self::Scalar(ScalarKind::Any)
    }

    pub fn unicode() -> Self {
        Self::Scalar(ScalarKind::Unicode)
    }

    pub fn number() -> Self {
        Self::Scalar(ScalarKind::Number)
    }

    pub fn boolean() -> Self {
        Self::Scalar(ScalarKind::Boolean)
    }

    pub fn json() -> Self {
        Self::Scalar(ScalarKind::Json)
    }

    pub fn binary() -> Self {
        Self::Binary(BinaryFormat::DataUri)
    }

    pub fn legacy_binary() -> Self {
        Self::Binary(BinaryFormat::Legacy)
    }

    pub fn utc_datetime() -> Self {
        Self::Scalar(ScalarKind::UtcDateTime)
    }

    pub fn list() -> Self {
        Self::List { of: None }
    }

    pub fn list_of(element: Attribute) -> Self {
        Self::List {
            of: Some(Box::new(element)),
        }
    }

    pub fn typed_map(schema: impl Into<String>) -> Self {
        Self::TypedMap(schema.into())
    }

    pub fn dynamic_map(schema: impl Into<String>) -> Self {
        Self::DynamicMap(schema.into())
    }

    /// Element descriptor of a list, falling back to [`UNTYPED`].
    pub fn element(&self) -> &Attribute {
        match self {
            Self::List { of: Some(of) } => of,
            _ => &UNTYPED,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Scalar(k) => k.as_str(),
            Self::Binary(_) => "binary",
            Self::List { .. } => "list",
            Self::Map => "map",
            Self::TypedMap(_) => "typed_map",
            Self::DynamicMap(_) => "dynamic_map",
            Self::Discriminator => "discriminator",
        }
    }
}

/// What kind of container a schema describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    /// Top-level object.
    Model,
    /// Nested typed map; unknown keys are dropped.
    Map,
    /// Nested typed map; unknown keys pass through.
    DynamicMap,
}

impl ContainerKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Model => "model",
            Self::Map => "map",
            Self::DynamicMap => "dynamic_map",
        }
    }
}

/// A named schema.
///
/// After registration `attributes` holds the inherited attributes too, and
/// `lineage` lists the ancestors nearest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    name: String,
    kind: ContainerKind,
    attributes: IndexMap<String, Attribute>,
    extends: Option<String>,
    tag: Option<String>,
    lineage: Vec<String>,
    family: Option<String>,
}

impl Schema {
    pub fn new(name: impl Into<String>, kind: ContainerKind) -> Self {
        Self {
            name: name.into(),
            kind,
            attributes: IndexMap::new(),
            extends: None,
            tag: None,
            lineage: Vec::new(),
            family: None,
        }
    }

    pub fn model(name: impl Into<String>) -> Self {
        Self::new(name, ContainerKind::Model)
    }

    pub fn map(name: impl Into<String>) -> Self {
        Self::new(name, ContainerKind::Map)
    }

    pub fn dynamic_map(name: impl Into<String>) -> Self {
        Self::new(name, ContainerKind::DynamicMap)
    }

    pub fn attribute(mut self, name: impl Into<String>, attribute: Attribute) -> Self {
        self.attributes.insert(name.into(), attribute);
        self
    }

    pub fn extends(mut self, parent: impl Into<String>) -> Self {
        self.extends = Some(parent.into());
        self
    }

    /// Registers this schema under `tag` in its parent's discriminator family.
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ContainerKind {
        self.kind
    }

    pub fn attributes(&self) -> &IndexMap<String, Attribute> {
        &self.attributes
    }

    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    pub fn parent(&self) -> Option<&str> {
        self.extends.as_deref()
    }

    pub fn variant_tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// Name of the schema that declared the discriminator this schema uses.
    pub fn family(&self) -> Option<&str> {
        self.family.as_deref()
    }

    /// The discriminator attribute name, if any.
    pub fn discriminator(&self) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(_, attr)| matches!(attr, Attribute::Discriminator))
            .map(|(name, _)| name.as_str())
    }

    /// True if `ancestor` is this schema or one of its ancestors.
    pub fn descends_from(&self, ancestor: &str) -> bool {
        self.name == ancestor || self.lineage.iter().any(|name| name == ancestor)
    }

    pub fn is_dynamic(&self) -> bool {
        self.kind == ContainerKind::DynamicMap
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_defaults_to_untyped() {
        assert_eq!(Attribute::list().element(), &UNTYPED);
        assert_eq!(
            Attribute::list_of(Attribute::unicode()).element(),
            &Attribute::unicode()
        );
    }

    #[test]
    fn declaration_order_is_kept() {
        let schema = Schema::model("Pet")
            .attribute("name", Attribute::unicode())
            .attribute("age", Attribute::number())
            .attribute("cls", Attribute::Discriminator);
        let names: Vec<_> = schema.attributes().keys().map(String::as_str).collect();
        assert_eq!(names, ["name", "age", "cls"]);
        assert_eq!(schema.discriminator(), Some("cls"));
    }
}
