//! Text forms of binary attribute values.
//!
//! - `Legacy`: bare standard base64, `"KA=="`.
//! - `DataUri`: `"data:application/octet-stream;base64,KA=="`.

use base64::{engine::general_purpose::STANDARD as B64, Engine};
use serde_json::Value;

use super::CodecError;
use crate::value::AttrValue;

pub const BIN_URI_START: &str = "data:application/octet-stream;base64,";

/// How raw bytes are written as JSON text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BinaryFormat {
    Legacy,
    #[default]
    DataUri,
}

impl BinaryFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Legacy => "legacy",
            Self::DataUri => "data_uri",
        }
    }
}

pub fn encode(bytes: &[u8], format: BinaryFormat) -> String {
    match format {
        BinaryFormat::Legacy => B64.encode(bytes),
        BinaryFormat::DataUri => format!("{}{}", BIN_URI_START, B64.encode(bytes)),
    }
}

/// Decodes binary text. `DataUri` also accepts bare base64; `Legacy` accepts
/// bare base64 only.
pub fn decode(text: &str, format: BinaryFormat) -> Result<Vec<u8>, CodecError> {
    let b64 = match format {
        BinaryFormat::Legacy => text,
        BinaryFormat::DataUri => text.strip_prefix(BIN_URI_START).unwrap_or(text),
    };
    Ok(B64.decode(b64)?)
}

pub fn serialize(value: &AttrValue, format: BinaryFormat) -> Result<Value, CodecError> {
    match value {
        AttrValue::Bytes(bytes) => Ok(Value::String(encode(bytes, format))),
        _ => Err(CodecError::Type {
            kind: "binary",
            expected: "bytes",
        }),
    }
}

pub fn deserialize(value: &Value, format: BinaryFormat) -> Result<AttrValue, CodecError> {
    match value {
        Value::String(text) => Ok(AttrValue::Bytes(decode(text, format)?)),
        _ => Err(CodecError::Type {
            kind: "binary",
            expected: "a string",
        }),
    }
}
