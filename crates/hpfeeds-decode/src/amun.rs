//! Amun - low-interaction malware collection honeypot

use crate::field::Fields;
use crate::{inbound, CONNECTION_SIGNATURE};
use hpfeeds_core::events::CanonicalMessage;
use hpfeeds_core::plugins::{DecodeResult, Decoder, PluginInfo};

/// Decodes `amun.events`
pub struct AmunDecoder;

impl PluginInfo for AmunDecoder {
    fn name(&self) -> &str {
        "amun"
    }

    fn description(&self) -> &str {
        "Amun exploit and connection events"
    }
}

impl Decoder for AmunDecoder {
    fn decode(&self, sensor: &str, payload: &[u8]) -> DecodeResult<Vec<CanonicalMessage>> {
        let f = Fields::parse(payload)?;

        let msg = inbound("amun.events", sensor, "Amun", "amun")
            .src_ip(f.get("attackerIP"))
            .dest_ip(f.get("victimIP"))
            .src_port(f.get("attackerPort"))
            .dest_port(f.get("victimPort"))
            .severity("high")
            .signature(CONNECTION_SIGNATURE)
            .build();

        Ok(vec![msg])
    }
}
