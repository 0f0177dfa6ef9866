//! hpfeeds Core - Canonical message types, decoder traits, and dispatch
//!
//! This crate provides the foundational types and abstractions for the
//! hpfeeds normalizer:
//!
//! - **Events**: raw hpfeeds events, the canonical message shape, geo records
//! - **Plugins**: the `Decoder` trait and the geo/ASN lookup capabilities
//! - **Registry**: channel to decoder routing
//! - **Processor**: decode, flatten, and enrich one raw event
//! - **Config**: TOML configuration discovery and env overrides

pub mod config;
pub mod enrich;
pub mod events;
pub mod plugins;
pub mod processor;
pub mod registry;

// Re-export commonly used types
pub use enrich::EndpointEnricher;
pub use events::{CanonicalMessage, GeoRecord, MessageBuilder, RawEvent};
pub use plugins::{
    AsnLookup, DecodeError, DecodeResult, Decoder, GeoLookup, LookupError, PluginInfo,
};
pub use processor::{ErrorPolicy, ProcessError, ProcessResult, Processor};
pub use registry::DecoderRegistry;

/// Normalizer version
pub const NORMALIZER_VERSION: &str = env!("CARGO_PKG_VERSION");
