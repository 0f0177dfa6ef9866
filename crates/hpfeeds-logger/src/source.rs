//! Raw event input
//!
//! One JSON record per line, as captured from an hpfeeds subscription:
//! `{"ident": "...", "channel": "...", "payload": ...}`. The payload is
//! either the raw payload text or an already-decoded JSON value.

use hpfeeds_core::events::RawEvent;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Invalid raw event record: {0}")]
    Record(#[from] serde_json::Error),

    #[error("Raw event record is not a JSON object")]
    NotAnObject,
}

#[derive(Debug, Deserialize)]
struct RawRecord {
    ident: String,
    channel: String,
    #[serde(default)]
    payload: Value,
}

/// Parse one input line into a [`RawEvent`]
pub fn parse_line(line: &str) -> Result<RawEvent, SourceError> {
    // Records must be JSON objects; a derived struct would also take an array
    let Value::Object(map) = serde_json::from_str::<Value>(line)? else {
        return Err(SourceError::NotAnObject);
    };
    let record: RawRecord = serde_json::from_value(Value::Object(map))?;

    let payload = match record.payload {
        Value::String(text) => text.into_bytes(),
        other => serde_json::to_vec(&other)?,
    };

    Ok(RawEvent::new(record.ident, record.channel, payload))
}
