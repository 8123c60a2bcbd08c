//! Device registry contract and in-memory implementation
//!
//! The gateway core never talks to the mesh driver directly; it reads device
//! metadata and raw cluster attributes through the [`DeviceRegistry`] trait.
//! [`MemoryRegistry`] backs tests and the demo binary.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::device::{DeviceAddress, DeviceInfo};
use crate::error::Result;

/// Read-side contract implemented by the mesh driver
///
/// Enumeration and lookup are cheap metadata reads. `cluster_attribute`
/// returns the driver's cached raw value for a cluster/attribute pair as a
/// string, or `None` when the device has never reported it.
pub trait DeviceRegistry: Send + Sync {
    /// All devices currently known to the mesh
    fn devices(&self) -> Result<Vec<DeviceInfo>>;

    /// Metadata for one device, `None` when unknown
    fn device(&self, address: &DeviceAddress) -> Result<Option<DeviceInfo>>;

    /// Raw cached attribute read, e.g. `("genOnOff", "onOff")`
    fn cluster_attribute(
        &self,
        address: &DeviceAddress,
        cluster: &str,
        attribute: &str,
    ) -> Result<Option<String>>;
}

/// In-memory registry for tests and the demo binary
///
/// Thread-safe via interior mutability; the write side mirrors what a real
/// driver does on join/leave/report.
#[derive(Default)]
pub struct MemoryRegistry {
    devices: RwLock<HashMap<DeviceAddress, DeviceInfo>>,
    attributes: RwLock<HashMap<(DeviceAddress, String, String), String>>,
}

impl MemoryRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a device
    pub fn insert(&self, device: DeviceInfo) {
        let mut devices = self.devices.write();
        devices.insert(device.address.clone(), device);
    }

    /// Remove a device and its cached attributes
    pub fn remove(&self, address: &DeviceAddress) -> Option<DeviceInfo> {
        let removed = self.devices.write().remove(address);
        if removed.is_some() {
            let mut attrs = self.attributes.write();
            attrs.retain(|(addr, _, _), _| addr != address);
        }
        removed
    }

    /// Set a raw cluster attribute value
    pub fn set_cluster_attribute(
        &self,
        address: &DeviceAddress,
        cluster: &str,
        attribute: &str,
        value: impl Into<String>,
    ) {
        let mut attrs = self.attributes.write();
        attrs.insert(
            (address.clone(), cluster.to_string(), attribute.to_string()),
            value.into(),
        );
    }

    /// Update the liveness timestamp for a device
    pub fn touch(&self, address: &DeviceAddress, last_seen: u64) {
        let mut devices = self.devices.write();
        if let Some(device) = devices.get_mut(address) {
            device.last_seen = Some(last_seen);
        }
    }
}

impl DeviceRegistry for MemoryRegistry {
    fn devices(&self) -> Result<Vec<DeviceInfo>> {
        let devices = self.devices.read();
        Ok(devices.values().cloned().collect())
    }

    fn device(&self, address: &DeviceAddress) -> Result<Option<DeviceInfo>> {
        let devices = self.devices.read();
        Ok(devices.get(address).cloned())
    }

    fn cluster_attribute(
        &self,
        address: &DeviceAddress,
        cluster: &str,
        attribute: &str,
    ) -> Result<Option<String>> {
        let attrs = self.attributes.read();
        Ok(attrs
            .get(&(address.clone(), cluster.to_string(), attribute.to_string()))
            .cloned())
    }
}
