//! ElasticHoney - Elasticsearch honeypot

use crate::field::Fields;
use crate::inbound;
use hpfeeds_core::events::CanonicalMessage;
use hpfeeds_core::plugins::{DecodeResult, Decoder, PluginInfo};
use serde_json::Value;

/// Decodes `elastichoney.events`.
///
/// Attacks (`type == "attack"`) are high severity; anything else is
/// treated as reconnaissance.
pub struct ElasticHoneyDecoder;

impl PluginInfo for ElasticHoneyDecoder {
    fn name(&self) -> &str {
        "elastichoney"
    }

    fn description(&self) -> &str {
        "ElasticHoney Elasticsearch exploit and recon attempts"
    }
}

impl Decoder for ElasticHoneyDecoder {
    fn decode(&self, sensor: &str, payload: &[u8]) -> DecodeResult<Vec<CanonicalMessage>> {
        let f = Fields::parse(payload)?;

        let (severity, signature) = match f.str("type") {
            Some("attack") => ("high", "ElasticSearch Exploit Attempted"),
            _ => ("medium", "ElasticSearch Recon Attempted"),
        };

        let user_agent = f
            .object("headers")
            .and_then(|headers| headers.get("user_agent"))
            .cloned()
            .unwrap_or_else(|| Value::String(String::new()));

        let msg = inbound("elastichoney.events", sensor, "ElasticHoney", "elastichoney")
            .src_ip(f.get("source"))
            .dest_ip(f.get("honeypot"))
            .src_port(0)
            .dest_port(9200)
            .severity(severity)
            .signature(signature)
            .ext("elastichoney_form", f.get("form"))
            .ext("elastichoney_payload", f.get("payload"))
            .ext("user_agent", user_agent)
            .build();

        Ok(vec![msg])
    }
}
