//! Device identity and metadata types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable hardware address of a mesh node
///
/// This is the IEEE address reported by the mesh driver, normalized to
/// lowercase so lookups are insensitive to the driver's hex casing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeviceAddress(String);

impl DeviceAddress {
    /// Creates a new DeviceAddress, normalizing the format
    pub fn new(addr: impl Into<String>) -> Self {
        Self(addr.into().to_lowercase())
    }

    /// Get the address as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for DeviceAddress {
    fn from(s: &str) -> Self {
        DeviceAddress::new(s)
    }
}

impl From<String> for DeviceAddress {
    fn from(s: String) -> Self {
        DeviceAddress::new(s)
    }
}

/// Function of a node within the mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MeshRole {
    /// Network coordinator (the gateway radio itself)
    Coordinator,
    /// Routing node, participates in mesh forwarding
    Router,
    /// Sleepy end device, does not route
    EndDevice,
}

/// Power source reported by the device's basic cluster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerSource {
    /// Mains powered, single phase
    MainsSinglePhase,
    /// Mains powered, three phase
    MainsThreePhase,
    /// Battery powered
    Battery,
    /// DC source
    Dc,
    /// Emergency mains
    EmergencyMains,
    /// Not reported or unrecognized
    Unknown,
}

/// Metadata for one device known to the registry
///
/// Immutable once the device has joined; removed entirely on leave.
/// `last_seen` is the driver's liveness timestamp in epoch milliseconds;
/// `availability_timeout` is the optional per-device override in minutes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceInfo {
    pub address: DeviceAddress,
    pub name: String,
    pub friendly_name: String,
    pub vendor: String,
    pub model: String,
    pub mesh_role: MeshRole,
    pub power_source: PowerSource,
    pub last_seen: Option<u64>,
    pub availability_timeout: Option<u64>,
}

impl DeviceInfo {
    /// Minimal constructor for a device with no liveness data yet
    pub fn new(address: impl Into<DeviceAddress>, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            address: address.into(),
            friendly_name: name.clone(),
            name,
            vendor: "Unknown".to_string(),
            model: "Unknown".to_string(),
            mesh_role: MeshRole::EndDevice,
            power_source: PowerSource::Unknown,
            last_seen: None,
            availability_timeout: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_normalizes_case() {
        let addr = DeviceAddress::new("0x00158D0001ABCD12");
        assert_eq!(addr.as_str(), "0x00158d0001abcd12");
    }

    #[test]
    fn test_address_equality() {
        let a = DeviceAddress::new("0x00158D0001ABCD12");
        let b = DeviceAddress::new("0x00158d0001abcd12");
        assert_eq!(a, b);
    }

    #[test]
    fn test_address_display() {
        let addr = DeviceAddress::new("0xdeadbeef");
        assert_eq!(format!("{}", addr), "0xdeadbeef");
    }

    #[test]
    fn test_device_info_defaults() {
        let device = DeviceInfo::new("0x01", "plug");
        assert_eq!(device.friendly_name, "plug");
        assert_eq!(device.vendor, "Unknown");
        assert_eq!(device.mesh_role, MeshRole::EndDevice);
        assert!(device.last_seen.is_none());
    }
}
