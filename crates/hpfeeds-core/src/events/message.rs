//! Canonical message - the normalized record every decoder produces

use super::geo::GeoRecord;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

pub const DEFAULT_TRANSPORT: &str = "tcp";
pub const DEFAULT_PROTOCOL: &str = "ip";
pub const DEFAULT_DIRECTION: &str = "inbound";

/// Canonical field names, always present on the wire
pub const CANONICAL_FIELDS: [&str; 14] = [
    "type",
    "sensor",
    "src_ip",
    "dest_ip",
    "src_port",
    "dest_port",
    "transport",
    "protocol",
    "vendor_product",
    "direction",
    "ids_type",
    "severity",
    "signature",
    "app",
];

/// The normalized event record handed to the sink.
///
/// Canonical fields and extension fields live in separate namespaces and are
/// only flattened into one object by [`CanonicalMessage::to_map`] (and
/// therefore by `Serialize`). Values are plain JSON values: whatever the
/// honeypot reported is carried through without type checks.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalMessage {
    /// Event type, usually the channel name (e.g. "conpot.events-modbus")
    pub event_type: String,

    /// Reporting sensor identifier
    pub sensor: String,

    pub src_ip: Value,
    pub dest_ip: Value,
    pub src_port: Value,
    pub dest_port: Value,
    pub transport: Value,
    pub protocol: Value,
    pub vendor_product: Value,
    pub direction: Value,
    pub ids_type: Value,
    pub severity: Value,
    pub signature: Value,
    pub app: Value,

    /// Format-specific extension fields
    pub extra: BTreeMap<String, Value>,

    /// Enrichment for `src_ip`, flattened under `src_`
    pub src_geo: Option<GeoRecord>,

    /// Enrichment for `dest_ip`, flattened under `dest_`
    pub dest_geo: Option<GeoRecord>,
}

impl CanonicalMessage {
    /// Start building a message of the given type
    pub fn builder(event_type: impl Into<String>, sensor: impl Into<String>) -> MessageBuilder {
        MessageBuilder::new(event_type, sensor)
    }

    /// Clone this message with a new signature.
    ///
    /// Used for fan-out: one session event followed by one sibling per
    /// sub-event (login attempt, download, command, ...).
    pub fn sibling(&self, signature: impl Into<Value>) -> Self {
        let mut msg = self.clone();
        msg.signature = signature.into();
        msg
    }

    /// Set an extension field
    pub fn set_ext(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.extra.insert(key.into(), value.into());
    }

    /// Builder-style [`CanonicalMessage::set_ext`]
    pub fn with_ext(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set_ext(key, value);
        self
    }

    /// Get an extension field
    pub fn ext(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }

    /// Look up a field by its wire name, as it would appear after flattening
    pub fn get(&self, key: &str) -> Option<Value> {
        self.to_map().remove(key)
    }

    /// Flatten into the wire shape: canonical fields, then extension fields
    /// (which win on collision), then prefixed geo fields.
    pub fn to_map(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("type".to_string(), Value::String(self.event_type.clone()));
        map.insert("sensor".to_string(), Value::String(self.sensor.clone()));
        map.insert("src_ip".to_string(), self.src_ip.clone());
        map.insert("dest_ip".to_string(), self.dest_ip.clone());
        map.insert("src_port".to_string(), self.src_port.clone());
        map.insert("dest_port".to_string(), self.dest_port.clone());
        map.insert("transport".to_string(), self.transport.clone());
        map.insert("protocol".to_string(), self.protocol.clone());
        map.insert("vendor_product".to_string(), self.vendor_product.clone());
        map.insert("direction".to_string(), self.direction.clone());
        map.insert("ids_type".to_string(), self.ids_type.clone());
        map.insert("severity".to_string(), self.severity.clone());
        map.insert("signature".to_string(), self.signature.clone());
        map.insert("app".to_string(), self.app.clone());

        for (key, value) in &self.extra {
            map.insert(key.clone(), value.clone());
        }

        if let Some(geo) = &self.src_geo {
            map.extend(geo.prefixed("src_"));
        }
        if let Some(geo) = &self.dest_geo {
            map.extend(geo.prefixed("dest_"));
        }

        map
    }

    /// Serialize to a single JSON line
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl Serialize for CanonicalMessage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_map().serialize(serializer)
    }
}

/// Builder for [`CanonicalMessage`].
///
/// Unset canonical fields end up as explicit `null`, except `transport`,
/// `protocol` and `direction` which have defaults. Setting a field to
/// `Value::Null` overrides its default.
#[derive(Debug, Clone)]
pub struct MessageBuilder {
    msg: CanonicalMessage,
}

impl MessageBuilder {
    pub fn new(event_type: impl Into<String>, sensor: impl Into<String>) -> Self {
        Self {
            msg: CanonicalMessage {
                event_type: event_type.into(),
                sensor: sensor.into(),
                src_ip: Value::Null,
                dest_ip: Value::Null,
                src_port: Value::Null,
                dest_port: Value::Null,
                transport: Value::from(DEFAULT_TRANSPORT),
                protocol: Value::from(DEFAULT_PROTOCOL),
                vendor_product: Value::Null,
                direction: Value::from(DEFAULT_DIRECTION),
                ids_type: Value::Null,
                severity: Value::Null,
                signature: Value::Null,
                app: Value::Null,
                extra: BTreeMap::new(),
                src_geo: None,
                dest_geo: None,
            },
        }
    }

    pub fn src_ip(mut self, value: impl Into<Value>) -> Self {
        self.msg.src_ip = value.into();
        self
    }

    pub fn dest_ip(mut self, value: impl Into<Value>) -> Self {
        self.msg.dest_ip = value.into();
        self
    }

    pub fn src_port(mut self, value: impl Into<Value>) -> Self {
        self.msg.src_port = value.into();
        self
    }

    pub fn dest_port(mut self, value: impl Into<Value>) -> Self {
        self.msg.dest_port = value.into();
        self
    }

    pub fn transport(mut self, value: impl Into<Value>) -> Self {
        self.msg.transport = value.into();
        self
    }

    pub fn protocol(mut self, value: impl Into<Value>) -> Self {
        self.msg.protocol = value.into();
        self
    }

    pub fn vendor_product(mut self, value: impl Into<Value>) -> Self {
        self.msg.vendor_product = value.into();
        self
    }

    pub fn direction(mut self, value: impl Into<Value>) -> Self {
        self.msg.direction = value.into();
        self
    }

    pub fn ids_type(mut self, value: impl Into<Value>) -> Self {
        self.msg.ids_type = value.into();
        self
    }

    pub fn severity(mut self, value: impl Into<Value>) -> Self {
        self.msg.severity = value.into();
        self
    }

    pub fn signature(mut self, value: impl Into<Value>) -> Self {
        self.msg.signature = value.into();
        self
    }

    pub fn app(mut self, value: impl Into<Value>) -> Self {
        self.msg.app = value.into();
        self
    }

    /// Add an extension field
    pub fn ext(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.msg.extra.insert(key.into(), value.into());
        self
    }

    /// Add several extension fields at once
    pub fn extend_ext<I, K>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        self.msg
            .extra
            .extend(fields.into_iter().map(|(key, value)| (key.into(), value)));
        self
    }

    pub fn build(self) -> CanonicalMessage {
        self.msg
    }
}
