//! Conpot - industrial control system honeypot

use crate::field::{display, Fields};
use crate::{inbound, CONNECTION_SIGNATURE};
use hpfeeds_core::events::CanonicalMessage;
use hpfeeds_core::plugins::{DecodeResult, Decoder, PluginInfo};
use tracing::debug;

/// Conpot polls itself over SNMP from this address
const LOCAL_POLL_ADDR: &str = "127.0.0.1";

/// Decodes `conpot.events`.
///
/// The event type carries the protocol, e.g. `conpot.events-modbus`.
pub struct ConpotDecoder;

impl PluginInfo for ConpotDecoder {
    fn name(&self) -> &str {
        "conpot"
    }

    fn description(&self) -> &str {
        "Conpot ICS protocol interactions"
    }
}

impl Decoder for ConpotDecoder {
    fn decode(&self, sensor: &str, payload: &[u8]) -> DecodeResult<Vec<CanonicalMessage>> {
        let f = Fields::parse(payload)?;

        let remote = f.index("remote", 0)?;
        let port = f.index("remote", 1)?;

        if remote.as_str() == Some(LOCAL_POLL_ADDR) {
            debug!("Dropping conpot local poll from {}", sensor);
            return Ok(Vec::new());
        }

        let data_type = display(f.require("data_type")?);

        let msg = inbound(format!("conpot.events-{}", data_type), sensor, "Conpot", "conpot")
            .src_ip(remote)
            .dest_ip(f.get("public_ip"))
            .src_port(port)
            .dest_port(502)
            .severity("medium")
            .signature(CONNECTION_SIGNATURE)
            .build();

        Ok(vec![msg])
    }
}
