//! p0f - passive OS fingerprinting

use crate::field::Fields;
use crate::inbound;
use hpfeeds_core::events::CanonicalMessage;
use hpfeeds_core::plugins::{DecodeResult, Decoder, PluginInfo};

/// Decodes `p0f.events`
pub struct P0fDecoder;

impl PluginInfo for P0fDecoder {
    fn name(&self) -> &str {
        "p0f"
    }

    fn description(&self) -> &str {
        "p0f passive fingerprinting observations"
    }
}

impl Decoder for P0fDecoder {
    fn decode(&self, sensor: &str, payload: &[u8]) -> DecodeResult<Vec<CanonicalMessage>> {
        let f = Fields::parse(payload)?;

        let msg = inbound("p0f.events", sensor, "p0f", "p0f")
            .src_ip(f.get("client_ip"))
            .dest_ip(f.get("server_ip"))
            .src_port(f.get("client_port"))
            .dest_port(f.get("server_port"))
            .severity("informational")
            .signature("Packet Observed by p0f")
            .ext("p0f_app", f.get("app"))
            .ext("p0f_link", f.get("link"))
            .ext("p0f_os", f.get("os"))
            .ext("p0f_uptime", f.get("uptime"))
            .build();

        Ok(vec![msg])
    }
}
