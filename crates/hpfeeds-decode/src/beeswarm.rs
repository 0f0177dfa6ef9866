//! Beeswarm - honeypot hive

use crate::field::Fields;
use crate::{inbound, CONNECTION_SIGNATURE};
use hpfeeds_core::events::CanonicalMessage;
use hpfeeds_core::plugins::{DecodeResult, Decoder, PluginInfo};

/// Decodes `beeswarm.hive`
pub struct BeeswarmHiveDecoder;

impl PluginInfo for BeeswarmHiveDecoder {
    fn name(&self) -> &str {
        "beeswarm-hive"
    }

    fn description(&self) -> &str {
        "Beeswarm hive session events"
    }
}

impl Decoder for BeeswarmHiveDecoder {
    fn decode(&self, sensor: &str, payload: &[u8]) -> DecodeResult<Vec<CanonicalMessage>> {
        let f = Fields::parse(payload)?;

        let msg = inbound("beeswarm.hive", sensor, "Beeswarm", "beeswarm")
            .src_ip(f.get("attacker_ip"))
            .dest_ip(f.get("honey_ip"))
            .src_port(f.get("attacker_source_port"))
            .dest_port(f.get("honey_port"))
            .severity("high")
            .signature(CONNECTION_SIGNATURE)
            .build();

        Ok(vec![msg])
    }
}
