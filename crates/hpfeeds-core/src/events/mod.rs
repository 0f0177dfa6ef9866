//! Event types for the hpfeeds normalizer
//!
//! A [`RawEvent`] comes in from the transport, one or more
//! [`CanonicalMessage`]s go out to the sink, and [`GeoRecord`]s are merged
//! into them on the way.

pub mod geo;
pub mod message;

pub use geo::*;
pub use message::*;

/// One payload as delivered by the hpfeeds transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEvent {
    /// Identifier of the reporting sensor (hpfeeds ident)
    pub sensor: String,

    /// Channel the payload was published on
    pub channel: String,

    /// Raw payload bytes, usually JSON
    pub payload: Vec<u8>,
}

impl RawEvent {
    pub fn new(
        sensor: impl Into<String>,
        channel: impl Into<String>,
        payload: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            sensor: sensor.into(),
            channel: channel.into(),
            payload: payload.into(),
        }
    }
}
