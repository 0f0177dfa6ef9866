//! Processor - decodes one raw event into canonical messages
//!
//! Registry lookup, decoder invocation under an error policy, flattening,
//! and the enrichment pass. Holds no per-call state, so a single instance
//! can be shared across threads.

use crate::enrich::EndpointEnricher;
use crate::events::{CanonicalMessage, RawEvent};
use crate::plugins::DecodeError;
use crate::registry::DecoderRegistry;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;
use tracing::{trace, warn};

/// What to do when a decoder fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPolicy {
    /// Propagate the first decoder failure to the caller
    Strict,
    /// Log the failure, drop that decoder's output, keep going
    #[default]
    Lenient,
}

impl ErrorPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorPolicy::Strict => "strict",
            ErrorPolicy::Lenient => "lenient",
        }
    }
}

impl FromStr for ErrorPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "strict" => Ok(ErrorPolicy::Strict),
            "lenient" => Ok(ErrorPolicy::Lenient),
            other => Err(format!("unknown error policy: {}", other)),
        }
    }
}

impl std::fmt::Display for ErrorPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Processing error type
#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("Decoder {decoder} failed on channel {channel}: {source}")]
    Decoder {
        decoder: String,
        channel: String,
        #[source]
        source: DecodeError,
    },
}

pub type ProcessResult<T> = Result<T, ProcessError>;

/// The normalization entry point
#[derive(Debug, Clone)]
pub struct Processor {
    registry: DecoderRegistry,
    enricher: EndpointEnricher,
}

impl Processor {
    /// Create a processor without enrichment
    pub fn new(registry: DecoderRegistry) -> Self {
        Self {
            registry,
            enricher: EndpointEnricher::disabled(),
        }
    }

    /// Set the endpoint enricher
    pub fn with_enricher(mut self, enricher: EndpointEnricher) -> Self {
        self.enricher = enricher;
        self
    }

    pub fn registry(&self) -> &DecoderRegistry {
        &self.registry
    }

    pub fn enricher(&self) -> &EndpointEnricher {
        &self.enricher
    }

    /// Decode one payload published by `sensor` on `channel`.
    ///
    /// Decoder outputs are concatenated in registration order. Under
    /// [`ErrorPolicy::Strict`] the first decoder error aborts the call and
    /// no partial output is returned; under [`ErrorPolicy::Lenient`] this
    /// never returns `Err`.
    pub fn process(
        &self,
        sensor: &str,
        channel: &str,
        payload: &[u8],
        policy: ErrorPolicy,
    ) -> ProcessResult<Vec<CanonicalMessage>> {
        let decoders = self.registry.decoders_for(channel);
        if decoders.is_empty() {
            trace!("No decoders registered for channel {}", channel);
            return Ok(Vec::new());
        }

        let mut messages = Vec::new();
        for decoder in decoders {
            match decoder.decode(sensor, payload) {
                Ok(decoded) => messages.extend(decoded),
                Err(e) => match policy {
                    ErrorPolicy::Strict => {
                        return Err(ProcessError::Decoder {
                            decoder: decoder.name().to_string(),
                            channel: channel.to_string(),
                            source: e,
                        });
                    }
                    ErrorPolicy::Lenient => {
                        warn!(
                            "Decoder {} failed on channel {} (sensor {}): {}",
                            decoder.name(),
                            channel,
                            sensor,
                            e
                        );
                    }
                },
            }
        }

        if self.enricher.is_configured() {
            for message in &mut messages {
                self.enricher.enrich(message);
            }
        }

        Ok(messages)
    }

    /// [`Processor::process`] for a [`RawEvent`]
    pub fn process_event(
        &self,
        event: &RawEvent,
        policy: ErrorPolicy,
    ) -> ProcessResult<Vec<CanonicalMessage>> {
        self.process(&event.sensor, &event.channel, &event.payload, policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::GeoRecord;
    use crate::plugins::{
        AsnLookup, DecodeResult, Decoder, GeoLookup, LookupError, PluginInfo,
    };
    use std::net::IpAddr;
    use std::sync::Arc;

    /// Emits `count` messages tagged with its name
    struct Emitting {
        name: &'static str,
        count: usize,
    }

    impl PluginInfo for Emitting {
        fn name(&self) -> &str {
            self.name
        }
    }

    impl Decoder for Emitting {
        fn decode(&self, sensor: &str, _payload: &[u8]) -> DecodeResult<Vec<CanonicalMessage>> {
            Ok((0..self.count)
                .map(|i| {
                    CanonicalMessage::builder("test.events", sensor)
                        .src_ip("8.8.8.8")
                        .signature(format!("{}-{}", self.name, i))
                        .build()
                })
                .collect())
        }
    }

    struct Failing;

    impl PluginInfo for Failing {
        fn name(&self) -> &str {
            "failing"
        }
    }

    impl Decoder for Failing {
        fn decode(&self, _sensor: &str, payload: &[u8]) -> DecodeResult<Vec<CanonicalMessage>> {
            serde_json::from_slice::<serde_json::Value>(payload)?;
            Err(DecodeError::MissingField("source"))
        }
    }

    struct CountryGeo;

    impl GeoLookup for CountryGeo {
        fn record_by_addr(&self, _ip: IpAddr) -> Result<Option<GeoRecord>, LookupError> {
            Ok(Some(GeoRecord {
                country_code: Some("US".to_string()),
                ..Default::default()
            }))
        }
    }

    struct NoAsn;

    impl AsnLookup for NoAsn {
        fn org_by_addr(&self, _ip: IpAddr) -> Result<Option<String>, LookupError> {
            Ok(None)
        }
    }

    fn registry() -> DecoderRegistry {
        DecoderRegistry::new()
            .with("multi", Arc::new(Emitting { name: "a", count: 2 }))
            .with("multi", Arc::new(Failing))
            .with("multi", Arc::new(Emitting { name: "b", count: 1 }))
            .with("ok", Arc::new(Emitting { name: "a", count: 1 }))
    }

    fn signatures(messages: &[CanonicalMessage]) -> Vec<String> {
        messages
            .iter()
            .map(|m| m.signature.as_str().unwrap_or_default().to_string())
            .collect()
    }

    #[test]
    fn test_unknown_channel() {
        let processor = Processor::new(registry());
        let out = processor
            .process("s", "unknown.events", b"{}", ErrorPolicy::Strict)
            .unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_lenient_skips_failing_decoder() {
        let processor = Processor::new(registry());
        let out = processor
            .process("s", "multi", b"{}", ErrorPolicy::Lenient)
            .unwrap();
        assert_eq!(signatures(&out), vec!["a-0", "a-1", "b-0"]);
    }

    #[test]
    fn test_strict_propagates() {
        let processor = Processor::new(registry());
        let err = processor
            .process("s", "multi", b"{}", ErrorPolicy::Strict)
            .unwrap_err();

        match err {
            ProcessError::Decoder {
                decoder, channel, ..
            } => {
                assert_eq!(decoder, "failing");
                assert_eq!(channel, "multi");
            }
        }
    }

    #[test]
    fn test_lenient_malformed_payload() {
        let processor = Processor::new(registry());
        let out = processor
            .process("s", "multi", b"{not json", ErrorPolicy::Lenient)
            .unwrap();
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn test_no_enrichment_without_capabilities() {
        let processor = Processor::new(registry());
        let out = processor.process("s", "ok", b"{}", ErrorPolicy::Lenient).unwrap();
        assert!(out[0].src_geo.is_none());
        assert!(!out[0].to_map().contains_key("src_city"));
    }

    #[test]
    fn test_enrichment_applied_to_every_message() {
        let enricher = EndpointEnricher::new(Some(Arc::new(CountryGeo)), Some(Arc::new(NoAsn)));
        let processor = Processor::new(registry()).with_enricher(enricher);
        let out = processor
            .process("s", "multi", b"{}", ErrorPolicy::Lenient)
            .unwrap();

        assert_eq!(out.len(), 3);
        for msg in &out {
            let map = msg.to_map();
            assert_eq!(map["src_country_code"], "US");
            // dest_ip is null, so the dest record is present but empty
            assert!(map["dest_country_code"].is_null());
            for field in GeoRecord::FIELDS {
                assert!(map.contains_key(&format!("src_{}", field)));
                assert!(map.contains_key(&format!("dest_{}", field)));
            }
        }
    }

    #[test]
    fn test_process_event_is_idempotent() {
        let processor = Processor::new(registry());
        let event = RawEvent::new("s", "multi", b"{}".to_vec());
        let first = processor.process_event(&event, ErrorPolicy::Lenient).unwrap();
        let second = processor.process_event(&event, ErrorPolicy::Lenient).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_error_policy_parse() {
        assert_eq!("Strict".parse::<ErrorPolicy>(), Ok(ErrorPolicy::Strict));
        assert_eq!("lenient".parse::<ErrorPolicy>(), Ok(ErrorPolicy::Lenient));
        assert!("ignore".parse::<ErrorPolicy>().is_err());
        assert_eq!(ErrorPolicy::default(), ErrorPolicy::Lenient);
    }
}
