//! Decoder registry - routes a channel name to its decoders

use crate::plugins::Decoder;
use std::collections::HashMap;
use std::sync::Arc;

/// Registry of decoders keyed by hpfeeds channel.
///
/// Populated once at start-up. A channel may have several decoders; they run
/// in registration order and their outputs are concatenated.
#[derive(Default, Clone)]
pub struct DecoderRegistry {
    channels: HashMap<String, Vec<Arc<dyn Decoder>>>,
}

impl DecoderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a decoder to a channel
    pub fn register(&mut self, channel: impl Into<String>, decoder: Arc<dyn Decoder>) {
        self.channels.entry(channel.into()).or_default().push(decoder);
    }

    /// Builder-style [`DecoderRegistry::register`]
    pub fn with(mut self, channel: impl Into<String>, decoder: Arc<dyn Decoder>) -> Self {
        self.register(channel, decoder);
        self
    }

    /// Decoders for a channel, empty if the channel is unknown
    pub fn decoders_for(&self, channel: &str) -> &[Arc<dyn Decoder>] {
        self.channels
            .get(channel)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn contains(&self, channel: &str) -> bool {
        self.channels.contains_key(channel)
    }

    /// Registered channel names, sorted
    pub fn channels(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.channels.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}

impl std::fmt::Debug for DecoderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_map();
        for channel in self.channels() {
            let names: Vec<&str> = self.decoders_for(channel).iter().map(|d| d.name()).collect();
            map.entry(&channel, &names);
        }
        map.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::CanonicalMessage;
    use crate::plugins::{DecodeResult, PluginInfo};

    struct Named(&'static str);

    impl PluginInfo for Named {
        fn name(&self) -> &str {
            self.0
        }
    }

    impl Decoder for Named {
        fn decode(&self, _sensor: &str, _payload: &[u8]) -> DecodeResult<Vec<CanonicalMessage>> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_unknown_channel_is_empty() {
        let registry = DecoderRegistry::new();
        assert!(registry.decoders_for("nope.events").is_empty());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_registration_order_preserved() {
        let registry = DecoderRegistry::new()
            .with("a.events", Arc::new(Named("first")))
            .with("b.events", Arc::new(Named("other")))
            .with("a.events", Arc::new(Named("second")));

        let names: Vec<&str> = registry
            .decoders_for("a.events")
            .iter()
            .map(|d| d.name())
            .collect();
        assert_eq!(names, vec!["first", "second"]);
        assert_eq!(registry.channels(), vec!["a.events", "b.events"]);
        assert_eq!(registry.len(), 2);
        assert!(registry.contains("b.events"));
    }
}
