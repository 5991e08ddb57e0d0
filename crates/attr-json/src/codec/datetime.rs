//! Date/time attribute codecs.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Number, Value};

use super::CodecError;

/// RFC 3339 with microseconds and a numeric UTC offset,
/// e.g. `2024-05-01T12:30:00.250000+00:00`.
pub fn format_utc(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, false)
}

pub fn parse_utc(text: &str) -> Result<DateTime<Utc>, CodecError> {
    Ok(DateTime::parse_from_rfc3339(text)?.with_timezone(&Utc))
}

/// TTL values are whole epoch seconds.
pub fn ttl_to_json(dt: &DateTime<Utc>) -> Value {
    Value::Number(Number::from(dt.timestamp()))
}

/// Accepts integer or float epoch seconds. Fractions are truncated.
pub fn ttl_from_json(value: &Value) -> Result<DateTime<Utc>, CodecError> {
    let secs = match value {
        Value::Number(n) => match n.as_i64() {
            Some(i) => i,
            None => n
                .as_f64()
                .filter(|f| f.is_finite())
                .map(|f| f.trunc() as i64)
                .ok_or(CodecError::OutOfRange("ttl"))?,
        },
        _ => {
            return Err(CodecError::Type {
                kind: "ttl",
                expected: "number",
            })
        }
    };
    DateTime::from_timestamp(secs, 0).ok_or(CodecError::OutOfRange("ttl"))
}
