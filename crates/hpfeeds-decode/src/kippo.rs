//! Kippo - medium-interaction SSH honeypot
//!
//! One hpfeeds message describes a whole SSH session. It is fanned out into
//! a session message followed by one message per login attempt, download,
//! command, and unknown command, in that order.

use crate::field::Fields;
use crate::inbound;
use hpfeeds_core::events::CanonicalMessage;
use hpfeeds_core::plugins::{DecodeError, DecodeResult, Decoder, PluginInfo};
use serde_json::Value;

pub const SESSION_SIGNATURE: &str = "SSH session on kippo honeypot";
pub const LOGIN_SIGNATURE: &str = "SSH login attempted on kippo honeypot";
pub const DOWNLOAD_SIGNATURE: &str = "URL download attempted on kippo honeypot";
pub const COMMAND_SIGNATURE: &str = "command attempted on kippo honeypot";
pub const UNKNOWN_COMMAND_SIGNATURE: &str = "unknown command attempted on kippo honeypot";

/// Decodes `kippo.sessions`
pub struct KippoDecoder;

impl PluginInfo for KippoDecoder {
    fn name(&self) -> &str {
        "kippo"
    }

    fn description(&self) -> &str {
        "Kippo SSH sessions, fanned out per login attempt, download and command"
    }
}

impl Decoder for KippoDecoder {
    fn decode(&self, sensor: &str, payload: &[u8]) -> DecodeResult<Vec<CanonicalMessage>> {
        let f = Fields::parse(payload)?;

        let base = inbound("kippo.sessions", sensor, "Kippo", "kippo")
            .src_ip(f.get("peerIP"))
            .dest_ip(f.get("hostIP"))
            .src_port(f.get("peerPort"))
            .dest_port(f.get("hostPort"))
            .severity("high")
            .signature(SESSION_SIGNATURE)
            .ext("ssh_version", f.get("version"))
            .build();

        let credentials = f.list("credentials")?;
        let urls = f.list("urls")?;
        let commands = f.list("commands")?;
        let unknown_commands = f.list("unknownCommands")?;

        let mut messages =
            Vec::with_capacity(1 + credentials.len() + urls.len() + commands.len() + unknown_commands.len());

        for credential in credentials {
            let (username, password) = credential_pair(credential)?;
            messages.push(
                base.sibling(LOGIN_SIGNATURE)
                    .with_ext("ssh_username", username)
                    .with_ext("ssh_password", password),
            );
        }

        for url in urls {
            messages.push(base.sibling(DOWNLOAD_SIGNATURE).with_ext("url", url.clone()));
        }

        for command in commands {
            messages.push(
                base.sibling(COMMAND_SIGNATURE)
                    .with_ext("command", command.clone()),
            );
        }

        for command in unknown_commands {
            messages.push(
                base.sibling(UNKNOWN_COMMAND_SIGNATURE)
                    .with_ext("command", command.clone()),
            );
        }

        messages.insert(0, base);
        Ok(messages)
    }
}

/// A credential is reported as a `[username, password]` pair
fn credential_pair(value: &Value) -> DecodeResult<(Value, Value)> {
    match value.as_array().map(Vec::as_slice) {
        Some([username, password]) => Ok((username.clone(), password.clone())),
        _ => Err(DecodeError::invalid(
            "credentials",
            format!("expected [username, password], got {}", value),
        )),
    }
}
