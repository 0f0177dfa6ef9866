//! Network IDS alerts - Snort and Suricata
//!
//! Both sensors publish the same flat alert shape. The rule signature and
//! the transport protocol come from the alert itself.

use crate::field::Fields;
use crate::inbound;
use hpfeeds_core::events::CanonicalMessage;
use hpfeeds_core::plugins::{DecodeResult, Decoder, PluginInfo};

fn decode_alert(
    f: &Fields,
    event_type: &str,
    sensor: &str,
    vendor_product: &str,
    app: &str,
) -> CanonicalMessage {
    inbound(event_type, sensor, vendor_product, app)
        .src_ip(f.get("source_ip"))
        .dest_ip(f.get("destination_ip"))
        .src_port(f.get("source_port"))
        .dest_port(f.get("destination_port"))
        .transport(f.get("protocol"))
        .severity("high")
        .signature(f.get("signature"))
        .build()
}

/// Decodes `snort.alerts`
pub struct SnortDecoder;

impl PluginInfo for SnortDecoder {
    fn name(&self) -> &str {
        "snort"
    }

    fn description(&self) -> &str {
        "Snort IDS alerts"
    }
}

impl Decoder for SnortDecoder {
    fn decode(&self, sensor: &str, payload: &[u8]) -> DecodeResult<Vec<CanonicalMessage>> {
        let f = Fields::parse(payload)?;
        Ok(vec![decode_alert(&f, "snort.alerts", sensor, "Snort", "snort")])
    }
}

/// Decodes `suricata.events`
pub struct SuricataDecoder;

impl PluginInfo for SuricataDecoder {
    fn name(&self) -> &str {
        "suricata"
    }

    fn description(&self) -> &str {
        "Suricata IDS alerts"
    }
}

impl Decoder for SuricataDecoder {
    fn decode(&self, sensor: &str, payload: &[u8]) -> DecodeResult<Vec<CanonicalMessage>> {
        let f = Fields::parse(payload)?;
        Ok(vec![decode_alert(
            &f,
            "suricata.events",
            sensor,
            "Suricata",
            "suricata",
        )])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn alert() -> String {
        json!({
            "source_ip": "203.0.113.8",
            "source_port": 53211,
            "destination_ip": "198.51.100.3",
            "destination_port": 80,
            "protocol": "TCP",
            "signature": "ET SCAN Nmap Scripting Engine User-Agent Detected",
            "priority": 2
        })
        .to_string()
    }

    #[test]
    fn test_decode_snort_alert() {
        let out = SnortDecoder.decode("snort-1", alert().as_bytes()).unwrap();
        let msg = &out[0];
        assert_eq!(msg.event_type, "snort.alerts");
        assert_eq!(msg.transport, "TCP");
        assert_eq!(
            msg.signature,
            "ET SCAN Nmap Scripting Engine User-Agent Detected"
        );
        assert_eq!(msg.vendor_product, "Snort");
    }

    #[test]
    fn test_decode_suricata_alert() {
        let out = SuricataDecoder.decode("suricata-1", alert().as_bytes()).unwrap();
        let msg = &out[0];
        assert_eq!(msg.event_type, "suricata.events");
        assert_eq!(msg.app, "suricata");
        assert_eq!(msg.dest_port, 80);
    }

    #[test]
    fn test_missing_protocol_gives_null_transport() {
        let payload = json!({"source_ip": "203.0.113.8", "signature": "x"});
        let out = SnortDecoder
            .decode("snort-1", payload.to_string().as_bytes())
            .unwrap();
        assert!(out[0].transport.is_null());
    }
}
