//! Device summary building for the listing endpoints
//!
//! Summaries combine registry metadata with on-demand availability. Devices
//! in the meter model class additionally carry an on/off state and an energy
//! reading parsed from the raw metering attribute. A device whose summary
//! cannot be built is logged and omitted; it never fails the whole listing.

use std::collections::HashMap;

use serde::Serialize;

use mesh_registry::{DeviceInfo, DeviceRegistry, RegistryError};
use mesh_state::{availability::now_ms, AvailabilityEvaluator};

/// One row of the `/devices` listing
#[derive(Debug, Clone, Serialize)]
pub struct DeviceSummary {
    pub name: String,
    #[serde(rename = "ieeeAddr")]
    pub ieee_addr: String,
    pub friendly_name: String,
    pub vendor: String,
    pub model: String,
    /// `"online"` or `"offline"`
    pub availability: String,
    /// `"ON"`/`"OFF"`, meter-class devices only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// kWh-scaled reading, meter-class devices only; -1 when unreadable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub energy: Option<f64>,
}

/// Build summaries for every known device, optionally filtered by exact name
pub fn device_summaries(
    registry: &dyn DeviceRegistry,
    availability: &AvailabilityEvaluator,
    meter_models: &[String],
    name_filter: &str,
) -> Vec<DeviceSummary> {
    let devices = match registry.devices() {
        Ok(devices) => devices,
        Err(e) => {
            tracing::warn!(error = %e, "Device enumeration failed");
            return Vec::new();
        }
    };

    let now = now_ms();
    let mut summaries = Vec::new();
    for device in devices {
        if !name_filter.is_empty() && device.name != name_filter {
            continue;
        }
        match summarize(registry, availability, meter_models, &device, now) {
            Ok(summary) => summaries.push(summary),
            Err(e) => {
                tracing::warn!(address = %device.address, error = %e, "Skipping device in listing");
            }
        }
    }
    summaries
}

/// Map device name to energy reading, from the same summaries
///
/// Devices without an energy reading are left out of the mapping.
pub fn energy_by_name(
    registry: &dyn DeviceRegistry,
    availability: &AvailabilityEvaluator,
    meter_models: &[String],
    name_filter: &str,
) -> HashMap<String, f64> {
    device_summaries(registry, availability, meter_models, name_filter)
        .into_iter()
        .filter_map(|summary| summary.energy.map(|energy| (summary.name, energy)))
        .collect()
}

fn summarize(
    registry: &dyn DeviceRegistry,
    availability: &AvailabilityEvaluator,
    meter_models: &[String],
    device: &DeviceInfo,
    now: u64,
) -> Result<DeviceSummary, RegistryError> {
    let mut summary = DeviceSummary {
        name: device.name.clone(),
        ieee_addr: device.address.to_string(),
        friendly_name: device.friendly_name.clone(),
        vendor: device.vendor.clone(),
        model: device.model.clone(),
        availability: if availability.is_available(device, now) {
            "online".to_string()
        } else {
            "offline".to_string()
        },
        state: None,
        energy: None,
    };

    if meter_models.contains(&device.model) {
        let on_off = registry.cluster_attribute(&device.address, "genOnOff", "onOff")?;
        summary.state = Some(match on_off.as_deref() {
            Some(value) if is_truthy(value) => "ON".to_string(),
            _ => "OFF".to_string(),
        });

        let raw = registry.cluster_attribute(&device.address, "seMetering", "currentSummDelivered")?;
        summary.energy = Some(raw.as_deref().map(parse_energy).unwrap_or(-1.0));
    }

    Ok(summary)
}

fn is_truthy(value: &str) -> bool {
    !value.is_empty() && value != "0" && value != "false"
}

/// Positional parse of the raw metering attribute
///
/// The attribute encoding is vendor specific: a comma-delimited pair whose
/// second field is the delivered sum in centi-units. Do not assume this
/// generalizes beyond the modeled device class.
fn parse_energy(raw: &str) -> f64 {
    raw.split(',')
        .nth(1)
        .and_then(|field| field.trim().parse::<i64>().ok())
        .map(|value| value as f64 / 100.0)
        .unwrap_or(-1.0)
}
