//! Optional-field access over a decoded JSON payload
//!
//! Honeypots omit fields freely, so every read returns an absence marker
//! instead of failing. The few accessors that return `DecodeResult` are for
//! fields a decoder cannot do without.

use hpfeeds_core::plugins::{DecodeError, DecodeResult};
use serde_json::{Map, Value};

/// Top-level fields of one payload
#[derive(Debug, Clone)]
pub struct Fields {
    map: Map<String, Value>,
}

impl Fields {
    /// Parse a payload that must be a JSON object
    pub fn parse(payload: &[u8]) -> DecodeResult<Self> {
        match serde_json::from_slice::<Value>(payload)? {
            Value::Object(map) => Ok(Self { map }),
            _ => Err(DecodeError::NotAnObject),
        }
    }

    /// Field value, `Value::Null` when absent
    pub fn get(&self, key: &str) -> Value {
        self.map.get(key).cloned().unwrap_or(Value::Null)
    }

    /// Field as a string slice, `None` when absent or not a string
    pub fn str(&self, key: &str) -> Option<&str> {
        self.map.get(key).and_then(Value::as_str)
    }

    /// Field as an object, `None` when absent or not an object
    pub fn object(&self, key: &str) -> Option<&Map<String, Value>> {
        self.map.get(key).and_then(Value::as_object)
    }

    /// List field for iteration. Absent or null is an empty list; any other
    /// non-array value is an error.
    pub fn list(&self, key: &'static str) -> DecodeResult<&[Value]> {
        match self.map.get(key) {
            None | Some(Value::Null) => Ok(&[][..]),
            Some(Value::Array(items)) => Ok(items.as_slice()),
            Some(other) => Err(DecodeError::invalid(
                key,
                format!("expected a list, got {}", kind(other)),
            )),
        }
    }

    /// Element `index` of a required array field
    pub fn index(&self, key: &'static str, index: usize) -> DecodeResult<Value> {
        match self.map.get(key) {
            None | Some(Value::Null) => Err(DecodeError::MissingField(key)),
            Some(Value::Array(items)) => items.get(index).cloned().ok_or_else(|| {
                DecodeError::invalid(key, format!("no element at index {}", index))
            }),
            Some(other) => Err(DecodeError::invalid(
                key,
                format!("expected a list, got {}", kind(other)),
            )),
        }
    }

    /// A field that must be present and non-null
    pub fn require(&self, key: &'static str) -> DecodeResult<&Value> {
        match self.map.get(key) {
            None | Some(Value::Null) => Err(DecodeError::MissingField(key)),
            Some(value) => Ok(value),
        }
    }
}

/// Render a value for use in a string (event type suffixes and the like)
pub fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}
