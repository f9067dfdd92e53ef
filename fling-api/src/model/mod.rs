//! Values reported by a renderer.
//!
//! Renderers hand scalars back either as JSON scalars or as their string
//! rendering (`"0.5"`, `"true"`, `"12000"`); the decoders here accept both.

mod info;
mod seek;
mod status;

pub use info::MediaPlayerInfo;
pub use seek::SeekMode;
pub use status::{MediaCondition, MediaPlayerStatus, MediaState};

use serde_json::Value;

use crate::error::{ApiError, Result};

pub(crate) fn decode_f64(value: &Value, what: &str) -> Result<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
    .ok_or_else(|| ApiError::protocol(format!("{what}: expected a number, got {value}")))
}

pub(crate) fn decode_i64(value: &Value, what: &str) -> Result<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
    .ok_or_else(|| ApiError::protocol(format!("{what}: expected an integer, got {value}")))
}

pub(crate) fn decode_bool(value: &Value, what: &str) -> Result<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim() {
            s if s.eq_ignore_ascii_case("true") => Some(true),
            s if s.eq_ignore_ascii_case("false") => Some(false),
            _ => None,
        },
        _ => None,
    }
    .ok_or_else(|| ApiError::protocol(format!("{what}: expected a bool, got {value}")))
}

pub(crate) fn decode_string(value: &Value, what: &str) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Null => Ok(String::new()),
        other => Err(ApiError::protocol(format!("{what}: expected a string, got {other}"))),
    }
}

/// Look up a required field of a renderer object.
pub(crate) fn field<'a>(object: &'a Value, key: &str, what: &str) -> Result<&'a Value> {
    let map = object
        .as_object()
        .ok_or_else(|| ApiError::protocol(format!("{what}: expected an object, got {object}")))?;
    map.get(key)
        .ok_or_else(|| ApiError::protocol(format!("{what}: missing field '{key}'")))
}
