//! Per-device property store.
//!
//! Devices are keyed by short address and optional endpoint. Entries are
//! created on first write and never removed; later writes replace earlier
//! values.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::properties::{FromPropertyValue, PropertyValue};

/// Property recording the time of the latest attribute report.
pub const LAST_SEEN: &str = "last_seen";

/// Identifies a device (and optionally one of its endpoints) on the network.
///
/// Only stable until the device is reset and gets a new short address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeviceKey {
    pub short_addr: u16,
    pub endpoint: Option<u8>,
}

impl DeviceKey {
    pub fn new(short_addr: u16, endpoint: Option<u8>) -> Self {
        Self {
            short_addr,
            endpoint,
        }
    }

    /// Key of a device as a whole.
    pub fn device(short_addr: u16) -> Self {
        Self::new(short_addr, None)
    }

    /// Key of one endpoint of a device.
    pub fn endpoint(short_addr: u16, endpoint: u8) -> Self {
        Self::new(short_addr, Some(endpoint))
    }
}

impl fmt::Display for DeviceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.endpoint {
            Some(endpoint) => write!(f, "{:04x}_{:02x}", self.short_addr, endpoint),
            None => write!(f, "{:04x}_x", self.short_addr),
        }
    }
}

/// Properties recorded for one device key.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DeviceState {
    properties: BTreeMap<String, PropertyValue>,
}

impl DeviceState {
    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }

    /// Typed lookup; `None` when missing or of another type.
    pub fn get_as<T: FromPropertyValue>(&self, name: &str) -> Option<T> {
        self.get(name).and_then(T::from_property_value)
    }

    /// Time of the latest attribute report, if any.
    pub fn last_seen(&self) -> Option<DateTime<Utc>> {
        self.get_as(LAST_SEEN)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.properties
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

/// Mapping from device key to its last-known properties.
#[derive(Debug, Clone, Default)]
pub struct DeviceStore {
    devices: BTreeMap<DeviceKey, DeviceState>,
}

impl DeviceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a property, creating the device entry if needed.
    ///
    /// Returns `true` when the device key was not known before.
    pub fn set_property(
        &mut self,
        key: DeviceKey,
        name: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> bool {
        let is_new = !self.devices.contains_key(&key);
        self.devices
            .entry(key)
            .or_default()
            .properties
            .insert(name.into(), value.into());
        is_new
    }

    /// Advance `last_seen` to `now`, never moving it backwards.
    ///
    /// Returns `true` when the device key was not known before.
    pub fn touch(&mut self, key: DeviceKey, now: DateTime<Utc>) -> bool {
        let seen = match self.devices.get(&key).and_then(DeviceState::last_seen) {
            Some(previous) if previous > now => previous,
            _ => now,
        };
        self.set_property(key, LAST_SEEN, seen)
    }

    pub fn get(&self, key: &DeviceKey) -> Option<&DeviceState> {
        self.devices.get(key)
    }

    /// Look up a single property.
    pub fn property(&self, key: &DeviceKey, name: &str) -> Option<&PropertyValue> {
        self.get(key).and_then(|state| state.get(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&DeviceKey, &DeviceState)> {
        self.devices.iter()
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Serializable copy keyed by the display form of each device key.
    pub fn snapshot(&self) -> BTreeMap<String, DeviceState> {
        self.devices
            .iter()
            .map(|(key, state)| (key.to_string(), state.clone()))
            .collect()
    }
}
