//! MaxMind lookup backends for hpfeeds endpoint enrichment
//!
//! Implements the core [`GeoLookup`](hpfeeds_core::plugins::GeoLookup) and
//! [`AsnLookup`](hpfeeds_core::plugins::AsnLookup) capabilities on top of
//! `.mmdb` databases, and builds an [`EndpointEnricher`] from configuration.

pub mod maxmind;

pub use maxmind::{MaxmindAsn, MaxmindGeo};

use hpfeeds_core::config::GeoSettings;
use hpfeeds_core::EndpointEnricher;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Enrichment backend errors
#[derive(Error, Debug)]
pub enum EnrichError {
    #[error("Failed to open MaxMind database {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: maxminddb::MaxMindDBError,
    },
}

pub type EnrichResult<T> = Result<T, EnrichError>;

/// Build an enricher from the configured database paths.
///
/// With no paths configured the enricher is disabled and messages are
/// emitted without geo fields. A configured path that cannot be opened is
/// an error.
pub fn open_enricher(settings: &GeoSettings) -> EnrichResult<EndpointEnricher> {
    let mut enricher = EndpointEnricher::disabled();

    if let Some(path) = &settings.geo_db {
        enricher = enricher.with_geo(Arc::new(MaxmindGeo::open(path)?));
    }

    if let Some(path) = &settings.asn_db {
        enricher = enricher.with_asn(Arc::new(MaxmindAsn::open(path)?));
    }

    if enricher.is_configured() {
        info!("Endpoint enrichment enabled: {:?}", enricher);
    }

    Ok(enricher)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_databases_is_disabled() {
        let enricher = open_enricher(&GeoSettings::default()).unwrap();
        assert!(!enricher.is_configured());
    }

    #[test]
    fn test_missing_database_is_an_error() {
        let settings = GeoSettings {
            geo_db: None,
            asn_db: Some(PathBuf::from("/nonexistent/GeoLite2-ASN.mmdb")),
        };
        let err = open_enricher(&settings).unwrap_err();
        assert!(matches!(err, EnrichError::Open { ref path, .. } if path.ends_with("GeoLite2-ASN.mmdb")));
    }
}
