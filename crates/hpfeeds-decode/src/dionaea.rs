//! Dionaea - multi-protocol malware capture honeypot
//!
//! Dionaea publishes on two channels: `dionaea.capture` when a binary was
//! downloaded and `dionaea.connections` for every accepted connection.

use crate::field::Fields;
use crate::{inbound, CONNECTION_SIGNATURE};
use hpfeeds_core::events::CanonicalMessage;
use hpfeeds_core::plugins::{DecodeResult, Decoder, PluginInfo};

/// Decodes `dionaea.capture`
pub struct DionaeaCaptureDecoder;

impl PluginInfo for DionaeaCaptureDecoder {
    fn name(&self) -> &str {
        "dionaea-capture"
    }

    fn description(&self) -> &str {
        "Dionaea malware capture events"
    }
}

impl Decoder for DionaeaCaptureDecoder {
    fn decode(&self, sensor: &str, payload: &[u8]) -> DecodeResult<Vec<CanonicalMessage>> {
        let f = Fields::parse(payload)?;

        let msg = inbound("dionaea.capture", sensor, "Dionaea", "dionaea")
            .src_ip(f.get("saddr"))
            .dest_ip(f.get("daddr"))
            .src_port(f.get("sport"))
            .dest_port(f.get("dport"))
            .severity("high")
            .signature(CONNECTION_SIGNATURE)
            .ext("url", f.get("url"))
            .ext("md5", f.get("md5"))
            .ext("sha512", f.get("sha512"))
            .build();

        Ok(vec![msg])
    }
}

/// Decodes `dionaea.connections`
pub struct DionaeaConnectionsDecoder;

impl PluginInfo for DionaeaConnectionsDecoder {
    fn name(&self) -> &str {
        "dionaea-connections"
    }

    fn description(&self) -> &str {
        "Dionaea connection events"
    }
}

impl Decoder for DionaeaConnectionsDecoder {
    fn decode(&self, sensor: &str, payload: &[u8]) -> DecodeResult<Vec<CanonicalMessage>> {
        let f = Fields::parse(payload)?;

        let msg = inbound("dionaea.connections", sensor, "Dionaea", "dionaea")
            .src_ip(f.get("remote_host"))
            .dest_ip(f.get("local_host"))
            .src_port(f.get("remote_port"))
            .dest_port(f.get("local_port"))
            .severity("high")
            .signature(CONNECTION_SIGNATURE)
            .build();

        Ok(vec![msg])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_capture() {
        let payload = json!({
            "saddr": "203.0.113.5",
            "sport": "4711",
            "daddr": "198.51.100.7",
            "dport": "445",
            "url": "http://203.0.113.5:5555/x.exe",
            "md5": "d41d8cd98f00b204e9800998ecf8427e"
        });

        let out = DionaeaCaptureDecoder
            .decode("dionaea-1", payload.to_string().as_bytes())
            .unwrap();
        let msg = &out[0];
        assert_eq!(msg.event_type, "dionaea.capture");
        assert_eq!(msg.src_ip, "203.0.113.5");
        // ports are passed through untouched, strings included
        assert_eq!(msg.src_port, "4711");
        assert_eq!(msg.ext("md5"), Some(&json!("d41d8cd98f00b204e9800998ecf8427e")));
        assert_eq!(msg.ext("url"), Some(&json!("http://203.0.113.5:5555/x.exe")));
        // sha512 not reported but still present
        assert_eq!(msg.ext("sha512"), Some(&serde_json::Value::Null));
    }

    #[test]
    fn test_decode_connection() {
        let payload = json!({
            "remote_host": "203.0.113.5",
            "remote_port": 33012,
            "local_host": "198.51.100.7",
            "local_port": 21,
            "connection_transport": "tcp"
        });

        let out = DionaeaConnectionsDecoder
            .decode("dionaea-1", payload.to_string().as_bytes())
            .unwrap();
        let msg = &out[0];
        assert_eq!(msg.event_type, "dionaea.connections");
        assert_eq!(msg.dest_ip, "198.51.100.7");
        assert_eq!(msg.dest_port, 21);
        assert_eq!(msg.vendor_product, "Dionaea");
        assert!(msg.extra.is_empty());
    }
}
