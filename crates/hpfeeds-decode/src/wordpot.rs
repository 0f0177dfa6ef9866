//! Wordpot - WordPress honeypot

use crate::field::Fields;
use crate::inbound;
use hpfeeds_core::events::CanonicalMessage;
use hpfeeds_core::plugins::{DecodeResult, Decoder, PluginInfo};

/// Decodes `wordpot.events` into `wordpot.alerts` messages
pub struct WordpotDecoder;

impl PluginInfo for WordpotDecoder {
    fn name(&self) -> &str {
        "wordpot"
    }

    fn description(&self) -> &str {
        "Wordpot WordPress exploit and enumeration attempts"
    }
}

impl Decoder for WordpotDecoder {
    fn decode(&self, sensor: &str, payload: &[u8]) -> DecodeResult<Vec<CanonicalMessage>> {
        let f = Fields::parse(payload)?;

        let msg = inbound("wordpot.alerts", sensor, "Wordpot", "wordpot")
            .src_ip(f.get("source_ip"))
            .dest_ip(f.get("dest_ip"))
            .src_port(f.get("source_port"))
            .dest_port(f.get("dest_port"))
            .severity("high")
            .signature("Wordpress Exploit, Scan, or Enumeration Attempted")
            .build();

        Ok(vec![msg])
    }
}
