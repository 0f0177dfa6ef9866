//! Geolocation / ASN attributes for one network endpoint

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Result of one endpoint lookup.
///
/// Every attribute is optional. A record where nothing is known serializes
/// to the full key set with `null` values, which is what downstream
/// consumers expect once enrichment is enabled.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoRecord {
    pub city: Option<String>,
    pub region_name: Option<String>,
    /// Region (subdivision) ISO code
    pub region: Option<String>,
    pub area_code: Option<u32>,
    pub time_zone: Option<String>,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub metro_code: Option<u32>,
    pub dma_code: Option<u32>,
    pub postal_code: Option<String>,
    /// ISO 3166-1 alpha-2
    pub country_code: Option<String>,
    /// ISO 3166-1 alpha-3
    pub country_code3: Option<String>,
    pub country_name: Option<String>,
    /// Autonomous system organization
    pub org: Option<String>,
}

impl GeoRecord {
    /// Attribute names, in declaration order
    pub const FIELDS: [&'static str; 14] = [
        "city",
        "region_name",
        "region",
        "area_code",
        "time_zone",
        "longitude",
        "latitude",
        "metro_code",
        "dma_code",
        "postal_code",
        "country_code",
        "country_code3",
        "country_name",
        "org",
    ];

    /// Whether no attribute is known
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Flatten into a map with every key prefixed (`src_`, `dest_`)
    pub fn prefixed(&self, prefix: &str) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map
                .into_iter()
                .map(|(name, value)| (format!("{}{}", prefix, name), value))
                .collect(),
            _ => Map::new(),
        }
    }
}
