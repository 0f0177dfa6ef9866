//! Endpoint enrichment - geolocation and ASN attributes for message IPs

use crate::events::{CanonicalMessage, GeoRecord};
use crate::plugins::{AsnLookup, GeoLookup};
use serde_json::Value;
use std::net::IpAddr;
use std::sync::Arc;
use tracing::debug;

/// Wraps the two optional lookup capabilities.
///
/// Lookups never fail: a missing capability, an unparseable address, or a
/// backend error all leave the corresponding attributes `None`.
#[derive(Clone, Default)]
pub struct EndpointEnricher {
    geo: Option<Arc<dyn GeoLookup>>,
    asn: Option<Arc<dyn AsnLookup>>,
}

impl EndpointEnricher {
    pub fn new(geo: Option<Arc<dyn GeoLookup>>, asn: Option<Arc<dyn AsnLookup>>) -> Self {
        Self { geo, asn }
    }

    /// Enricher with no capabilities
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn with_geo(mut self, geo: Arc<dyn GeoLookup>) -> Self {
        self.geo = Some(geo);
        self
    }

    pub fn with_asn(mut self, asn: Arc<dyn AsnLookup>) -> Self {
        self.asn = Some(asn);
        self
    }

    /// At least one capability is present
    pub fn is_configured(&self) -> bool {
        self.geo.is_some() || self.asn.is_some()
    }

    /// Look up an address given as a message field value
    pub fn lookup(&self, ip: &Value) -> GeoRecord {
        match ip.as_str().and_then(|s| s.trim().parse::<IpAddr>().ok()) {
            Some(addr) => self.lookup_addr(addr),
            None => GeoRecord::default(),
        }
    }

    pub fn lookup_addr(&self, ip: IpAddr) -> GeoRecord {
        let mut record = GeoRecord::default();

        if let Some(geo) = &self.geo {
            match geo.record_by_addr(ip) {
                Ok(Some(found)) => {
                    record = GeoRecord { org: None, ..found };
                }
                Ok(None) => {}
                Err(e) => debug!("Geo lookup failed for {}: {}", ip, e),
            }
        }

        if let Some(asn) = &self.asn {
            match asn.org_by_addr(ip) {
                Ok(org) => record.org = org,
                Err(e) => debug!("ASN lookup failed for {}: {}", ip, e),
            }
        }

        record
    }

    /// Attach `src_` and `dest_` geo records to a message
    pub fn enrich(&self, message: &mut CanonicalMessage) {
        message.src_geo = Some(self.lookup(&message.src_ip));
        message.dest_geo = Some(self.lookup(&message.dest_ip));
    }
}

impl std::fmt::Debug for EndpointEnricher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EndpointEnricher")
            .field("geo", &self.geo.is_some())
            .field("asn", &self.asn.is_some())
            .finish()
    }
}
