//! Honeypot decoders for the hpfeeds normalizer
//!
//! One decoder per honeypot/sensor product. Each turns the product's native
//! JSON payload into canonical messages:
//!
//! - **Honeypots**: Amun, Glastopf, Dionaea, Beeswarm, Kippo, Conpot,
//!   Wordpot, Shockpot, ElasticHoney
//! - **Network sensors**: Snort, Suricata, p0f
//!
//! [`default_registry`] wires every decoder to the hpfeeds channel it
//! listens on.

pub mod amun;
pub mod beeswarm;
pub mod conpot;
pub mod dionaea;
pub mod elastichoney;
pub mod field;
pub mod glastopf;
pub mod ids;
pub mod kippo;
pub mod p0f;
pub mod shockpot;
pub mod wordpot;

pub use amun::AmunDecoder;
pub use beeswarm::BeeswarmHiveDecoder;
pub use conpot::ConpotDecoder;
pub use dionaea::{DionaeaCaptureDecoder, DionaeaConnectionsDecoder};
pub use elastichoney::ElasticHoneyDecoder;
pub use field::Fields;
pub use glastopf::GlastopfDecoder;
pub use ids::{SnortDecoder, SuricataDecoder};
pub use kippo::KippoDecoder;
pub use p0f::P0fDecoder;
pub use shockpot::ShockpotDecoder;
pub use wordpot::WordpotDecoder;

use hpfeeds_core::events::{CanonicalMessage, MessageBuilder};
use hpfeeds_core::registry::DecoderRegistry;
use std::sync::Arc;

/// Signature used by honeypots that only report a connection
pub const CONNECTION_SIGNATURE: &str = "Connection to Honeypot";

/// Builder preset shared by every decoder: inbound network traffic to `app`
pub(crate) fn inbound(
    event_type: impl Into<String>,
    sensor: &str,
    vendor_product: &str,
    app: &str,
) -> MessageBuilder {
    CanonicalMessage::builder(event_type, sensor)
        .vendor_product(vendor_product)
        .app(app)
        .direction("inbound")
        .ids_type("network")
}

/// Registry with every built-in decoder on its hpfeeds channel
pub fn default_registry() -> DecoderRegistry {
    DecoderRegistry::new()
        .with("amun.events", Arc::new(AmunDecoder))
        .with("glastopf.events", Arc::new(GlastopfDecoder))
        .with("dionaea.capture", Arc::new(DionaeaCaptureDecoder))
        .with("dionaea.connections", Arc::new(DionaeaConnectionsDecoder))
        .with("beeswarm.hive", Arc::new(BeeswarmHiveDecoder))
        .with("kippo.sessions", Arc::new(KippoDecoder))
        .with("conpot.events", Arc::new(ConpotDecoder))
        .with("snort.alerts", Arc::new(SnortDecoder))
        .with("wordpot.events", Arc::new(WordpotDecoder))
        .with("shockpot.events", Arc::new(ShockpotDecoder))
        .with("p0f.events", Arc::new(P0fDecoder))
        .with("suricata.events", Arc::new(SuricataDecoder))
        .with("elastichoney.events", Arc::new(ElasticHoneyDecoder))
}
