//! Scalar attribute codecs.
//!
//! Every attribute kind that is not a list, a map or a discriminator converts
//! through [`ScalarKind::serialize`] / [`ScalarKind::deserialize`], or through
//! [`binary`] for raw bytes. Plain scalars are identity conversions that only
//! check the JSON type.

pub mod binary;
pub mod datetime;

use std::collections::BTreeSet;

use serde_json::{Number, Value};

use crate::value::AttrValue;
pub use binary::BinaryFormat;

/// Scalar codec failures.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("{kind} expects {expected}")]
    Type {
        kind: &'static str,
        expected: &'static str,
    },
    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("invalid datetime: {0}")]
    DateTime(#[from] chrono::ParseError),
    #[error("invalid JSON text: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0} value out of range")]
    OutOfRange(&'static str),
}

/// The scalar attribute kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    /// Untyped: whatever JSON value is there. Default for list elements.
    Any,
    Unicode,
    Number,
    Boolean,
    Null,
    /// A JSON document stored as JSON text.
    Json,
    BinarySet(BinaryFormat),
    UnicodeSet,
    NumberSet,
    UtcDateTime,
    /// Expiry time stored as epoch seconds.
    Ttl,
    /// Optimistic-locking counter; an integer.
    Version,
}

impl ScalarKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::Unicode => "unicode",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Null => "null",
            Self::Json => "json",
            Self::BinarySet(_) => "binary_set",
            Self::UnicodeSet => "unicode_set",
            Self::NumberSet => "number_set",
            Self::UtcDateTime => "utc_datetime",
            Self::Ttl => "ttl",
            Self::Version => "version",
        }
    }

    /// Typed value → plain JSON value.
    pub fn serialize(self, value: &AttrValue) -> Result<Value, CodecError> {
        match (self, value) {
            (Self::Any, v) => any_to_json(v).ok_or(self.type_error("a JSON-compatible value")),
            (Self::Unicode, AttrValue::String(s)) => Ok(Value::String(s.clone())),
            (Self::Number, AttrValue::Number(n)) => Ok(Value::Number(n.clone())),
            (Self::Version, AttrValue::Number(n)) if is_integer(n) => Ok(Value::Number(n.clone())),
            (Self::Version, AttrValue::Number(_)) => Err(self.type_error("an integer")),
            (Self::Boolean, AttrValue::Bool(b)) => Ok(Value::Bool(*b)),
            (Self::Null, AttrValue::Null) => Ok(Value::Null),
            (Self::Json, AttrValue::Json(v)) => Ok(Value::String(serde_json::to_string(v)?)),
            (Self::BinarySet(format), AttrValue::BytesSet(set)) => Ok(Value::Array(
                set.iter()
                    .map(|b| Value::String(binary::encode(b, format)))
                    .collect(),
            )),
            (Self::UnicodeSet, AttrValue::StringSet(set)) => {
                Ok(Value::Array(set.iter().cloned().map(Value::String).collect()))
            }
            (Self::NumberSet, AttrValue::NumberSet(set)) => {
                Ok(Value::Array(set.iter().cloned().map(Value::Number).collect()))
            }
            (Self::UtcDateTime, AttrValue::DateTime(dt)) => {
                Ok(Value::String(datetime::format_utc(dt)))
            }
            (Self::Ttl, AttrValue::DateTime(dt)) => Ok(datetime::ttl_to_json(dt)),
            _ => Err(self.type_error(self.typed_name())),
        }
    }

    /// Plain JSON value → typed value.
    pub fn deserialize(self, value: &Value) -> Result<AttrValue, CodecError> {
        match (self, value) {
            (Self::Any, v) => Ok(any_from_json(v)),
            (Self::Unicode, Value::String(s)) => Ok(AttrValue::String(s.clone())),
            (Self::Number, Value::Number(n)) => Ok(AttrValue::Number(n.clone())),
            (Self::Version, Value::Number(n)) if is_integer(n) => Ok(AttrValue::Number(n.clone())),
            (Self::Version, Value::Number(_)) => Err(self.type_error("an integer")),
            (Self::Boolean, Value::Bool(b)) => Ok(AttrValue::Bool(*b)),
            (Self::Null, Value::Null) => Ok(AttrValue::Null),
            (Self::Json, Value::String(s)) => Ok(AttrValue::Json(serde_json::from_str(s)?)),
            (Self::BinarySet(format), Value::Array(items)) => {
                let mut set = BTreeSet::new();
                for item in items {
                    let text = item.as_str().ok_or(self.type_error("an array of strings"))?;
                    set.insert(binary::decode(text, format)?);
                }
                Ok(AttrValue::BytesSet(set))
            }
            (Self::UnicodeSet, Value::Array(items)) => items
                .iter()
                .map(|item| {
                    item.as_str()
                        .map(str::to_string)
                        .ok_or(self.type_error("an array of strings"))
                })
                .collect::<Result<BTreeSet<_>, _>>()
                .map(AttrValue::StringSet),
            (Self::NumberSet, Value::Array(items)) => {
                let mut set: Vec<Number> = Vec::with_capacity(items.len());
                for item in items {
                    let Value::Number(n) = item else {
                        return Err(self.type_error("an array of numbers"));
                    };
                    if !set.iter().any(|seen| same_number(seen, n)) {
                        set.push(n.clone());
                    }
                }
                Ok(AttrValue::NumberSet(set))
            }
            (Self::UtcDateTime, Value::String(s)) => {
                Ok(AttrValue::DateTime(datetime::parse_utc(s)?))
            }
            (Self::Ttl, v) => Ok(AttrValue::DateTime(datetime::ttl_from_json(v)?)),
            _ => Err(self.type_error(self.plain_name())),
        }
    }

    fn type_error(self, expected: &'static str) -> CodecError {
        CodecError::Type {
            kind: self.as_str(),
            expected,
        }
    }

    fn typed_name(self) -> &'static str {
        match self {
            Self::Any => "a JSON-compatible value",
            Self::Unicode => "a string",
            Self::Number | Self::Version => "a number",
            Self::Boolean => "a bool",
            Self::Null => "null",
            Self::Json => "a JSON value",
            Self::BinarySet(_) => "a bytes set",
            Self::UnicodeSet => "a string set",
            Self::NumberSet => "a number set",
            Self::UtcDateTime | Self::Ttl => "a datetime",
        }
    }

    fn plain_name(self) -> &'static str {
        match self {
            Self::Any => "any JSON value",
            Self::Unicode | Self::Json | Self::UtcDateTime => "a string",
            Self::Number | Self::Version | Self::Ttl => "a number",
            Self::Boolean => "a bool",
            Self::Null => "null",
            Self::BinarySet(_) | Self::UnicodeSet | Self::NumberSet => "an array",
        }
    }
}

fn is_integer(n: &Number) -> bool {
    n.is_i64() || n.is_u64()
}

/// Numeric equality: `1` and `1.0` are the same set member.
fn same_number(a: &Number, b: &Number) -> bool {
    match (a.as_i64(), b.as_i64()) {
        (Some(x), Some(y)) => x == y,
        _ => match (a.as_u64(), b.as_u64()) {
            (Some(x), Some(y)) => x == y,
            _ => a.as_f64() == b.as_f64(),
        },
    }
}

/// Untyped values map JSON scalars onto their typed counterparts and keep
/// arrays and objects as raw JSON.
fn any_from_json(value: &Value) -> AttrValue {
    match value {
        Value::Null => AttrValue::Null,
        Value::Bool(b) => AttrValue::Bool(*b),
        Value::Number(n) => AttrValue::Number(n.clone()),
        Value::String(s) => AttrValue::String(s.clone()),
        Value::Array(_) | Value::Object(_) => AttrValue::Json(value.clone()),
    }
}

fn any_to_json(value: &AttrValue) -> Option<Value> {
    match value {
        AttrValue::Null => Some(Value::Null),
        AttrValue::Bool(b) => Some(Value::Bool(*b)),
        AttrValue::Number(n) => Some(Value::Number(n.clone())),
        AttrValue::String(s) => Some(Value::String(s.clone())),
        AttrValue::Json(v) => Some(v.clone()),
        AttrValue::Map(m) => Some(Value::Object(m.clone())),
        _ => None,
    }
}
