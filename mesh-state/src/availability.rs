//! Online/offline evaluation from liveness timestamps
//!
//! A device is available while `now - last_seen < timeout`. The timeout
//! resolves per device: explicit override from the per-device settings or
//! the driver, else the global policy for the device's role. Active role
//! means a routing node on non-battery power, or anything mains single
//! phase; everything else is passive. Evaluation is pure and recomputed on
//! every call.

use std::time::{SystemTime, UNIX_EPOCH};

use mesh_config::ConfigService;
use mesh_registry::{DeviceInfo, MeshRole, PowerSource};

/// Milliseconds per configured minute
fn minutes(m: u64) -> u64 {
    m * 60_000
}

/// Current wall clock in epoch milliseconds
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Computes availability for devices against the configured timeout policy
#[derive(Clone)]
pub struct AvailabilityEvaluator {
    config: ConfigService,
}

impl AvailabilityEvaluator {
    /// Create an evaluator reading policy from `config`
    pub fn new(config: ConfigService) -> Self {
        Self { config }
    }

    /// Whether the device counts as seen recently enough
    ///
    /// A missing `last_seen` is treated as now, so a fresh device is
    /// available unless its timeout is exactly zero. The boundary is
    /// exclusive: elapsed equal to the timeout means offline.
    pub fn is_available(&self, device: &DeviceInfo, now: u64) -> bool {
        let elapsed = device
            .last_seen
            .map(|seen| now.saturating_sub(seen))
            .unwrap_or(0);
        elapsed < self.timeout_ms(device)
    }

    /// Resolved availability timeout for a device, in milliseconds
    pub fn timeout_ms(&self, device: &DeviceInfo) -> u64 {
        // Policy reads fall back to defaults; evaluation has no failure mode
        let settings = self.config.get().unwrap_or_default();

        let configured_override = settings
            .devices
            .get(device.address.as_str())
            .and_then(|options| options.availability_timeout);
        if let Some(timeout) = configured_override.or(device.availability_timeout) {
            return minutes(timeout);
        }

        if is_active(device) {
            minutes(settings.availability.active_timeout)
        } else {
            minutes(settings.availability.passive_timeout)
        }
    }
}

/// Role resolution: active devices poll fast, passive ones sleep for hours
fn is_active(device: &DeviceInfo) -> bool {
    (device.mesh_role == MeshRole::Router && device.power_source != PowerSource::Battery)
        || device.power_source == PowerSource::MainsSinglePhase
}
