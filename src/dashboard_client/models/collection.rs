use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

use super::device::Device;

/// Device registry snapshot, keyed by id, in the order the backend sent it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeviceCollection {
    entries: Vec<(String, Device)>,
}

impl DeviceCollection {
    /// Inserts or replaces a device; replacing keeps the original position.
    fn insert(&mut self, id: String, device: Device) {
        match self.entries.iter_mut().find(|(key, _)| *key == id) {
            Some(slot) => slot.1 = device,
            None => self.entries.push((id, device)),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Device> {
        self.entries
            .iter()
            .find(|(key, _)| key == id)
            .map(|(_, device)| device)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(id, _)| id.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Device)> {
        self.entries
            .iter()
            .map(|(id, device)| (id.as_str(), device))
    }

    /// Devices whose id, name or status contains `term` (case-insensitive).
    /// An empty term matches everything.
    pub fn filter(&self, term: &str) -> Vec<&Device> {
        let needle = term.trim().to_lowercase();
        self.entries
            .iter()
            .map(|(_, device)| device)
            .filter(|device| {
                needle.is_empty()
                    || device.id.to_lowercase().contains(&needle)
                    || device
                        .name
                        .as_deref()
                        .map(|name| name.to_lowercase().contains(&needle))
                        .unwrap_or(false)
                    || device.status.as_str().to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Devices ordered by a display field; devices lacking the field sort first.
    pub fn sorted_by(&self, field: &str, reverse: bool) -> Vec<&Device> {
        let mut devices: Vec<&Device> = self.entries.iter().map(|(_, device)| device).collect();
        devices.sort_by(|a, b| a.field_text(field).cmp(&b.field_text(field)));
        if reverse {
            devices.reverse();
        }
        devices
    }
}

impl<'de> Deserialize<'de> for DeviceCollection {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(CollectionVisitor)
    }
}

struct CollectionVisitor;

impl<'de> Visitor<'de> for CollectionVisitor {
    type Value = DeviceCollection;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map of device id to device")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut collection = DeviceCollection::default();
        while let Some((id, mut device)) = access.next_entry::<String, Device>()? {
            if device.id.is_empty() {
                device.id = id.clone();
            }
            collection.insert(id, device);
        }
        Ok(collection)
    }
}
