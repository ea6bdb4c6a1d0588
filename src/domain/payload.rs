//! Decoding of untrusted language model payloads.
//!
//! A completion is accepted when it parses as a JSON object, either as is or
//! from the first Markdown code fence it contains. Everything inside the object is read
//! field by field with fallbacks, so missing or mistyped fields never fail
//! a decode.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::domain::interview::InterviewError;

/// A decoded top-level payload object.
pub type JsonObject = Map<String, Value>;

/// The payload could not be read as a JSON object at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadError {
    #[error("response is empty")]
    Empty,

    #[error("response is not valid JSON: {0}")]
    Malformed(String),

    #[error("response is a JSON {found}, expected an object")]
    NotAnObject { found: &'static str },
}

impl From<PayloadError> for InterviewError {
    fn from(err: PayloadError) -> Self {
        InterviewError::UpstreamParse(err.to_string())
    }
}

/// Returns the body of the first Markdown code fence (with or without a
/// language tag). Text after the first closing fence is dropped.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(open) = trimmed.find("```") else {
        return trimmed;
    };
    let after_open = &trimmed[open + 3..];
    let body = match after_open.split_once('\n') {
        Some((tag, rest)) if tag.trim().chars().all(|c| c.is_ascii_alphanumeric()) => rest,
        _ => after_open.strip_prefix("json").unwrap_or(after_open),
    };
    let body = match body.find("```") {
        Some(close) => &body[..close],
        None => body,
    };
    body.trim()
}

/// Parses the text as a JSON object, falling back to its first code fence.
pub fn decode_object(text: &str) -> Result<JsonObject, PayloadError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(PayloadError::Empty);
    }
    let value = match serde_json::from_str::<Value>(trimmed) {
        Ok(value) => value,
        Err(_) => {
            let body = strip_code_fence(trimmed);
            if body.is_empty() {
                return Err(PayloadError::Empty);
            }
            serde_json::from_str(body).map_err(|e| PayloadError::Malformed(e.to_string()))?
        }
    };
    match value {
        Value::Object(map) => Ok(map),
        other => Err(PayloadError::NotAnObject {
            found: kind_of(&other),
        }),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ───────────────────────────────────────────────────────────────
// Lenient field readers
// ───────────────────────────────────────────────────────────────

/// Non-blank string field.
pub(crate) fn text(obj: &JsonObject, key: &str) -> Option<String> {
    obj.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Nested object field.
pub(crate) fn object<'a>(obj: &'a JsonObject, key: &str) -> Option<&'a JsonObject> {
    obj.get(key).and_then(Value::as_object)
}

/// Boolean field; anything else is `None`.
pub(crate) fn flag(obj: &JsonObject, key: &str) -> Option<bool> {
    obj.get(key).and_then(Value::as_bool)
}

/// Integer field, accepting numbers and numeric strings.
pub(crate) fn integer(obj: &JsonObject, key: &str) -> Option<i64> {
    match obj.get(key)? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// List of non-blank strings; other entries are dropped.
pub(crate) fn string_list(obj: &JsonObject, key: &str) -> Vec<String> {
    obj.get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Array field; anything else reads as empty.
pub(crate) fn array<'a>(obj: &'a JsonObject, key: &str) -> &'a [Value] {
    obj.get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}
