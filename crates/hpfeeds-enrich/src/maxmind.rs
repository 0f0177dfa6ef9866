//! MaxMind database readers
//!
//! City databases (GeoIP2-City, GeoLite2-City) provide location attributes,
//! ASN databases (GeoLite2-ASN) provide the owning organization.

use crate::{EnrichError, EnrichResult};
use hpfeeds_core::events::GeoRecord;
use hpfeeds_core::plugins::{AsnLookup, GeoLookup, LookupError};
use maxminddb::{geoip2, MaxMindDBError, Reader};
use std::collections::BTreeMap;
use std::net::IpAddr;
use std::path::Path;
use tracing::info;

const NAME_LANGUAGE: &str = "en";

fn open_reader(path: &Path) -> EnrichResult<Reader<Vec<u8>>> {
    let reader = Reader::open_readfile(path).map_err(|source| EnrichError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    info!(
        "Opened {} database from {}",
        reader.metadata.database_type,
        path.display()
    );
    Ok(reader)
}

/// Not being in the database is a miss, not a failure
fn found<T>(result: Result<T, MaxMindDBError>) -> Result<Option<T>, LookupError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(MaxMindDBError::AddressNotFoundError(_)) => Ok(None),
        Err(e) => Err(LookupError::Backend(e.to_string())),
    }
}

/// Location lookups against a City database
pub struct MaxmindGeo {
    reader: Reader<Vec<u8>>,
}

impl MaxmindGeo {
    pub fn open(path: impl AsRef<Path>) -> EnrichResult<Self> {
        Ok(Self {
            reader: open_reader(path.as_ref())?,
        })
    }
}

impl GeoLookup for MaxmindGeo {
    fn record_by_addr(&self, ip: IpAddr) -> Result<Option<GeoRecord>, LookupError> {
        Ok(found(self.reader.lookup::<geoip2::City>(ip))?.map(|city| city_record(&city)))
    }
}

fn english(names: &Option<BTreeMap<&str, &str>>) -> Option<String> {
    names
        .as_ref()
        .and_then(|names| names.get(NAME_LANGUAGE))
        .map(|name| name.to_string())
}

fn city_record(city: &geoip2::City) -> GeoRecord {
    let subdivision = city
        .subdivisions
        .as_ref()
        .and_then(|subdivisions| subdivisions.first());
    let location = city.location.as_ref();
    let metro_code = location.and_then(|l| l.metro_code).map(u32::from);

    GeoRecord {
        city: city.city.as_ref().and_then(|c| english(&c.names)),
        region_name: subdivision.and_then(|s| english(&s.names)),
        region: subdivision.and_then(|s| s.iso_code).map(str::to_string),
        area_code: None,
        time_zone: location.and_then(|l| l.time_zone).map(str::to_string),
        longitude: location.and_then(|l| l.longitude),
        latitude: location.and_then(|l| l.latitude),
        metro_code,
        dma_code: metro_code,
        postal_code: city
            .postal
            .as_ref()
            .and_then(|p| p.code)
            .map(str::to_string),
        country_code: city
            .country
            .as_ref()
            .and_then(|c| c.iso_code)
            .map(str::to_string),
        country_code3: None,
        country_name: city.country.as_ref().and_then(|c| english(&c.names)),
        org: None,
    }
}

/// Organization lookups against an ASN database
pub struct MaxmindAsn {
    reader: Reader<Vec<u8>>,
}

impl MaxmindAsn {
    pub fn open(path: impl AsRef<Path>) -> EnrichResult<Self> {
        Ok(Self {
            reader: open_reader(path.as_ref())?,
        })
    }
}

impl AsnLookup for MaxmindAsn {
    fn org_by_addr(&self, ip: IpAddr) -> Result<Option<String>, LookupError> {
        Ok(found(self.reader.lookup::<geoip2::Asn>(ip))?
            .and_then(|asn| asn.autonomous_system_organization)
            .map(str::to_string))
    }
}
