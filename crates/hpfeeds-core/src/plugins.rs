//! Plugin traits for the normalization stages
//!
//! Every honeypot format is a [`Decoder`]; the enrichment backends are
//! [`GeoLookup`] and [`AsnLookup`] capabilities.

use crate::events::{CanonicalMessage, GeoRecord};
use std::net::IpAddr;
use thiserror::Error;

/// Decoder error type
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Malformed payload: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Payload is not a JSON object")]
    NotAnObject,

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid field {field}: {reason}")]
    InvalidField {
        field: &'static str,
        reason: String,
    },
}

impl DecodeError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        DecodeError::InvalidField {
            field,
            reason: reason.into(),
        }
    }
}

pub type DecodeResult<T> = Result<T, DecodeError>;

/// Lookup backend error type
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("Lookup backend error: {0}")]
    Backend(String),
}

/// Basic plugin information
pub trait PluginInfo {
    /// Plugin name
    fn name(&self) -> &str;

    /// Plugin version
    fn version(&self) -> &str {
        crate::NORMALIZER_VERSION
    }

    /// Plugin description
    fn description(&self) -> &str {
        ""
    }
}

// =============================================================================
// DECODERS
// =============================================================================

/// Decoder - translates one honeypot's native payload into canonical messages
///
/// Decoders are pure: no state, no I/O. An irrelevant event is `Ok(vec![])`;
/// a payload that cannot be decoded is an `Err`, and the processor decides
/// whether that aborts the call.
pub trait Decoder: PluginInfo + Send + Sync {
    /// Decode one payload reported by `sensor`
    fn decode(&self, sensor: &str, payload: &[u8]) -> DecodeResult<Vec<CanonicalMessage>>;
}

// =============================================================================
// ENRICHMENT CAPABILITIES
// =============================================================================

/// Geolocation-by-address capability
pub trait GeoLookup: Send + Sync {
    /// Geographic attributes for `ip`; `Ok(None)` when the address is unknown.
    /// The `org` attribute is owned by [`AsnLookup`] and ignored here.
    fn record_by_addr(&self, ip: IpAddr) -> Result<Option<GeoRecord>, LookupError>;
}

/// Organization/ASN-by-address capability
pub trait AsnLookup: Send + Sync {
    /// Autonomous system organization for `ip`; `Ok(None)` when unknown
    fn org_by_addr(&self, ip: IpAddr) -> Result<Option<String>, LookupError>;
}
