//! Settings data model
//!
//! The tracked-property list is configuration data, not a fixed type: the
//! feedback store defaults and projects records generically over it. Three
//! keys are mandatory and always kept first, in order: the device address,
//! the `source` tag, and the callback URL tag.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Tracked properties every feedback record must carry, in mandated order
pub const MANDATORY_PROPERTIES: [&str; 3] = ["ieeeAddr", "source", "callback_url"];

/// Default availability timeout for active (routing / mains) devices, minutes
pub const DEFAULT_ACTIVE_TIMEOUT: u64 = 10;

/// Default availability timeout for passive (battery) devices, minutes
pub const DEFAULT_PASSIVE_TIMEOUT: u64 = 1500;

/// Gateway-level notification configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewaySettings {
    /// Callback target base URLs, fanned out to on every dispatched event
    pub callbacks: Vec<String>,
    /// Tracked property names; always starts with [`MANDATORY_PROPERTIES`]
    pub tracked_properties: Vec<String>,
    /// Device models whose events are never forwarded externally
    pub alarm_models: Vec<String>,
    /// Device models whose events get structured audit logging
    pub audit_models: Vec<String>,
    /// Device models whose summaries carry on/off state and an energy reading
    pub meter_models: Vec<String>,
    /// Shared secret gating config and restart mutation
    pub auth_token: String,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            callbacks: Vec::new(),
            tracked_properties: MANDATORY_PROPERTIES
                .iter()
                .map(|p| p.to_string())
                .collect(),
            alarm_models: Vec::new(),
            audit_models: Vec::new(),
            meter_models: Vec::new(),
            auth_token: String::new(),
        }
    }
}

/// Global availability timeout policy, per device role, in minutes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AvailabilitySettings {
    /// Timeout for active devices (routers with non-battery power, mains single phase)
    pub active_timeout: u64,
    /// Timeout for passive (battery powered) devices
    pub passive_timeout: u64,
}

impl Default for AvailabilitySettings {
    fn default() -> Self {
        Self {
            active_timeout: DEFAULT_ACTIVE_TIMEOUT,
            passive_timeout: DEFAULT_PASSIVE_TIMEOUT,
        }
    }
}

/// Per-device configuration overrides, keyed by address in [`Settings::devices`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceOptions {
    /// Human-assigned friendly name override
    pub friendly_name: Option<String>,
    /// Per-device availability timeout override, minutes
    pub availability_timeout: Option<u64>,
}

/// The full persisted settings document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub gateway: GatewaySettings,
    pub availability: AvailabilitySettings,
    /// Per-device overrides keyed by device address
    pub devices: HashMap<String, DeviceOptions>,
}
