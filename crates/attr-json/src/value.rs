//! Typed attribute values and containers.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde_json::{Map, Number, Value};

/// A typed attribute value held by a [`Container`].
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Bytes(Vec<u8>),
    BytesSet(BTreeSet<Vec<u8>>),
    StringSet(BTreeSet<String>),
    NumberSet(Vec<Number>),
    DateTime(DateTime<Utc>),
    /// Untyped JSON: parsed JSON text, or arrays/objects with no schema.
    Json(Value),
    /// Plain map attribute contents.
    Map(Map<String, Value>),
    List(Vec<AttrValue>),
    Container(Container),
}

impl AttrValue {
    /// Whether the encoder keeps this value. Null, `false`, zero and empty
    /// values are falsy and get omitted from encoded containers.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Bool(b) => *b,
            Self::Number(n) => !is_zero_number(n),
            Self::String(s) => !s.is_empty(),
            Self::Bytes(b) => !b.is_empty(),
            Self::BytesSet(s) => !s.is_empty(),
            Self::StringSet(s) => !s.is_empty(),
            Self::NumberSet(s) => !s.is_empty(),
            Self::DateTime(_) => true,
            Self::Json(v) => is_truthy_json(v),
            Self::Map(m) => !m.is_empty(),
            Self::List(l) => !l.is_empty(),
            Self::Container(c) => !c.is_empty(),
        }
    }

    /// Short name of the variant, used in shape errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Bytes(_) => "bytes",
            Self::BytesSet(_) => "bytes set",
            Self::StringSet(_) => "string set",
            Self::NumberSet(_) => "number set",
            Self::DateTime(_) => "datetime",
            Self::Json(_) => "json",
            Self::Map(_) => "map",
            Self::List(_) => "list",
            Self::Container(_) => "container",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    pub fn as_container(&self) -> Option<&Container> {
        match self {
            Self::Container(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[AttrValue]> {
        match self {
            Self::List(l) => Some(l),
            _ => None,
        }
    }
}

/// Short name of a JSON value's type, used in shape errors.
pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn is_truthy_json(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => !is_zero_number(n),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

fn is_zero_number(num: &Number) -> bool {
    if let Some(i) = num.as_i64() {
        return i == 0;
    }
    if let Some(u) = num.as_u64() {
        return u == 0;
    }
    if let Some(f) = num.as_f64() {
        return f == 0.0;
    }
    false
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<i32> for AttrValue {
    fn from(value: i32) -> Self {
        Self::Number(value.into())
    }
}

impl From<u64> for AttrValue {
    fn from(value: u64) -> Self {
        Self::Number(value.into())
    }
}

/// Non-finite floats have no JSON form and become [`AttrValue::Null`].
impl From<f64> for AttrValue {
    fn from(value: f64) -> Self {
        Number::from_f64(value).map_or(Self::Null, Self::Number)
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Vec<u8>> for AttrValue {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

impl From<DateTime<Utc>> for AttrValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::DateTime(value)
    }
}

impl From<Vec<AttrValue>> for AttrValue {
    fn from(value: Vec<AttrValue>) -> Self {
        Self::List(value)
    }
}

impl From<Map<String, Value>> for AttrValue {
    fn from(value: Map<String, Value>) -> Self {
        Self::Map(value)
    }
}

impl From<Container> for AttrValue {
    fn from(value: Container) -> Self {
        Self::Container(value)
    }
}

/// An instance of a schema: the typed object the codec converts.
///
/// `schema` names the concrete schema, so for a polymorphic family it is the
/// variant (`Cat`), never the base (`Pet`). `extras` only holds keys for
/// dynamic map schemas.
#[derive(Debug, Clone, PartialEq)]
pub struct Container {
    schema: String,
    values: IndexMap<String, AttrValue>,
    extras: Map<String, Value>,
}

impl Container {
    pub fn new(schema: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            values: IndexMap::new(),
            extras: Map::new(),
        }
    }

    pub(crate) fn from_parts(
        schema: String,
        values: IndexMap<String, AttrValue>,
        extras: Map<String, Value>,
    ) -> Self {
        Self {
            schema,
            values,
            extras,
        }
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.set(name, value);
        self
    }

    /// Builder-style [`set_extra`](Self::set_extra).
    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.set_extra(key, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<AttrValue>) {
        self.values.insert(name.into(), value.into());
    }

    /// Sets a passthrough key. Only meaningful on dynamic map schemas.
    pub fn set_extra(&mut self, key: impl Into<String>, value: Value) {
        self.extras.insert(key.into(), value);
    }

    pub fn remove(&mut self, name: &str) -> Option<AttrValue> {
        self.values.shift_remove(name)
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }

    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.values.get(name)
    }

    pub fn extra(&self, key: &str) -> Option<&Value> {
        self.extras.get(key)
    }

    pub fn values(&self) -> &IndexMap<String, AttrValue> {
        &self.values
    }

    pub fn extras(&self) -> &Map<String, Value> {
        &self.extras
    }

    /// True when no attribute and no passthrough key is set.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.extras.is_empty()
    }
}
