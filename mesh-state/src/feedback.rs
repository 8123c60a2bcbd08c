//! Feedback store: latest known state snapshot per device
//!
//! Records are plain string maps keyed by tracked property name. The tracked
//! property list is configuration data read live from the config service, so
//! the store adapts to config changes without a resync:
//!
//! - the default path fills id-like properties with `"0"`, the `source` tag
//!   with `"manual"`, everything else with `""`;
//! - the event path copies present raw fields and forces `source` to
//!   `"system"`, overwriting the record wholesale;
//! - `verify` never leaks the internal shape: absent records read as the
//!   full default, existing records are re-projected field by field onto the
//!   current tracked-property set.
//!
//! Internal storage is not re-projected on config changes; stale keys linger
//! harmlessly until the device's next full event or resync.

use std::collections::HashMap;

use parking_lot::RwLock;
use serde_json::Value;

use mesh_config::ConfigService;
use mesh_registry::{DeviceAddress, DeviceRegistry};

use crate::error::Result;

/// The latest feedback snapshot for one device
pub type FeedbackRecord = HashMap<String, String>;

/// In-memory mapping from device address to feedback record
///
/// Mutated only by lifecycle/state events, processed one at a time in
/// arrival order; reads never block writers for long since records are
/// small and write volume is low.
pub struct FeedbackStore {
    records: RwLock<HashMap<DeviceAddress, FeedbackRecord>>,
    config: ConfigService,
}

impl FeedbackStore {
    /// Create an empty store reading tracked properties from `config`
    pub fn new(config: ConfigService) -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            config,
        }
    }

    /// Clear all records and establish a default record for every device
    /// currently known to the registry
    ///
    /// Called once at startup. An individual device's failure is logged and
    /// skipped; it never aborts the sync.
    pub fn sync(&self, registry: &dyn DeviceRegistry) -> Result<()> {
        self.records.write().clear();

        let devices = registry.devices()?;
        for device in devices {
            if let Err(e) = self.on_device_joined(&device.address) {
                tracing::warn!(
                    address = %device.address,
                    error = %e,
                    "Skipping device during feedback sync"
                );
            }
        }
        tracing::info!(count = self.len(), "Feedback store synchronized");
        Ok(())
    }

    /// Establish (or re-establish) the default record for a joined device
    pub fn on_device_joined(&self, address: &DeviceAddress) -> Result<()> {
        let properties = self.config.tracked_properties()?;
        let record = default_record(&properties, address);
        self.records.write().insert(address.clone(), record);
        Ok(())
    }

    /// Remove the record for a departed device entirely
    pub fn on_device_left(&self, address: &DeviceAddress) {
        self.records.write().remove(address);
    }

    /// Overwrite the record for `address` from a genuine feedback event
    ///
    /// Copies each tracked property present in `raw_fields`; the `source`
    /// tag is forced to `"system"` to distinguish event-populated records
    /// from defaulted ones. Properties missing from the event stay absent in
    /// storage and are filled in by `verify` on read.
    pub fn on_state_event(
        &self,
        address: &DeviceAddress,
        raw_fields: &serde_json::Map<String, Value>,
    ) -> Result<()> {
        let properties = self.config.tracked_properties()?;

        let mut record = FeedbackRecord::new();
        for property in &properties {
            if property == "source" {
                record.insert(property.clone(), "system".to_string());
            } else if let Some(value) = raw_fields.get(property) {
                record.insert(property.clone(), value_to_string(value));
            }
        }
        self.records.write().insert(address.clone(), record);
        Ok(())
    }

    /// Normalized view of the record for `address`
    ///
    /// Unknown addresses read as the full default record. Existing records
    /// are re-projected onto the current tracked-property set: missing
    /// id-like properties read as `"0"`, all other missing properties as
    /// `""`. The returned key set always equals the configured set exactly.
    pub fn verify(&self, address: &DeviceAddress) -> Result<FeedbackRecord> {
        let properties = self.config.tracked_properties()?;
        let records = self.records.read();

        let Some(stored) = records.get(address) else {
            return Ok(default_record(&properties, address));
        };

        let mut verified = FeedbackRecord::new();
        for property in &properties {
            let value = stored
                .get(property)
                .cloned()
                .unwrap_or_else(|| missing_value(property));
            verified.insert(property.clone(), value);
        }
        Ok(verified)
    }

    /// Number of devices with a record
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Whether the store holds no records
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

/// Build the default record for a device
fn default_record(properties: &[String], address: &DeviceAddress) -> FeedbackRecord {
    let mut record = FeedbackRecord::new();
    for property in properties {
        let value = match property.as_str() {
            "ieeeAddr" => address.as_str().to_string(),
            "source" => "manual".to_string(),
            _ => missing_value(property),
        };
        record.insert(property.clone(), value);
    }
    record
}

/// Fill value for a property absent from a record
fn missing_value(property: &str) -> String {
    if property.ends_with("Id") {
        "0".to_string()
    } else {
        String::new()
    }
}

/// Render a raw JSON field as the stored string value
fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use mesh_config::{ConfigPatch, MemoryStore, Settings};
    use mesh_registry::{DeviceInfo, MemoryRegistry};
    use serde_json::json;

    fn config_with_properties(extra: &[&str]) -> ConfigService {
        let mut settings = Settings::default();
        settings.gateway.auth_token = "secret".to_string();
        settings
            .gateway
            .tracked_properties
            .extend(extra.iter().map(|p| p.to_string()));
        ConfigService::new(Arc::new(MemoryStore::with_settings(settings)))
    }

    fn raw_fields(pairs: &[(&str, Value)]) -> serde_json::Map<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_verify_untouched_device_returns_full_default() {
        let store = FeedbackStore::new(config_with_properties(&["branchId", "controlSource"]));

        let record = store.verify(&"0x01".into()).unwrap();

        assert_eq!(record["ieeeAddr"], "0x01");
        assert_eq!(record["source"], "manual");
        assert_eq!(record["branchId"], "0");
        assert_eq!(record["controlSource"], "");
        assert_eq!(record["callback_url"], "");
        assert_eq!(record.len(), 5);
    }

    #[test]
    fn test_state_event_overwrites_wholesale_and_marks_system() {
        let config = config_with_properties(&["branchId"]);
        let store = FeedbackStore::new(config);
        let addr = DeviceAddress::new("0x01");

        store
            .on_state_event(
                &addr,
                &raw_fields(&[
                    ("ieeeAddr", json!("0x01")),
                    ("branchId", json!("42")),
                    ("source", json!("should-be-ignored")),
                ]),
            )
            .unwrap();

        let record = store.verify(&addr).unwrap();
        assert_eq!(record["source"], "system");
        assert_eq!(record["branchId"], "42");
        assert_eq!(record["ieeeAddr"], "0x01");
    }

    #[test]
    fn test_state_event_numeric_fields_stored_as_strings() {
        let store = FeedbackStore::new(config_with_properties(&["branchId"]));
        let addr = DeviceAddress::new("0x01");

        store
            .on_state_event(&addr, &raw_fields(&[("branchId", json!(7))]))
            .unwrap();

        assert_eq!(store.verify(&addr).unwrap()["branchId"], "7");
    }

    #[test]
    fn test_verify_projects_onto_current_property_set() {
        let config = config_with_properties(&[]);
        let store = FeedbackStore::new(config.clone());
        let addr = DeviceAddress::new("0x01");

        store
            .on_state_event(&addr, &raw_fields(&[("ieeeAddr", json!("0x01"))]))
            .unwrap();

        // Config grows two properties after the record was written
        let patch = ConfigPatch {
            tracked_properties: Some(vec!["branchId".to_string(), "note".to_string()]),
            ..Default::default()
        };
        config.set("secret", &patch).unwrap();

        let record = store.verify(&addr).unwrap();
        assert_eq!(record.len(), 5);
        assert_eq!(record["branchId"], "0");
        assert_eq!(record["note"], "");
        // Event-written fields survive
        assert_eq!(record["ieeeAddr"], "0x01");
        assert_eq!(record["source"], "system");
    }

    #[test]
    fn test_verify_drops_keys_removed_from_config() {
        let config = config_with_properties(&["branchId"]);
        let store = FeedbackStore::new(config.clone());
        let addr = DeviceAddress::new("0x01");

        store
            .on_state_event(&addr, &raw_fields(&[("branchId", json!("9"))]))
            .unwrap();

        // Shrink the tracked set back to the mandatory keys plus "note"
        let patch = ConfigPatch {
            tracked_properties: Some(vec!["note".to_string()]),
            ..Default::default()
        };
        config.set("secret", &patch).unwrap();

        let record = store.verify(&addr).unwrap();
        assert!(!record.contains_key("branchId"));
        assert_eq!(record.len(), 4);
    }

    #[test]
    fn test_leave_then_join_yields_fresh_default() {
        let store = FeedbackStore::new(config_with_properties(&["branchId"]));
        let addr = DeviceAddress::new("0x01");

        store
            .on_state_event(&addr, &raw_fields(&[("branchId", json!("42"))]))
            .unwrap();
        assert_eq!(store.verify(&addr).unwrap()["source"], "system");

        store.on_device_left(&addr);
        store.on_device_joined(&addr).unwrap();

        let record = store.verify(&addr).unwrap();
        assert_eq!(record["source"], "manual");
        assert_eq!(record["branchId"], "0");
    }

    #[test]
    fn test_left_device_reads_as_default_not_stale() {
        let store = FeedbackStore::new(config_with_properties(&[]));
        let addr = DeviceAddress::new("0x01");

        store.on_device_joined(&addr).unwrap();
        store.on_device_left(&addr);

        assert!(store.is_empty());
        // Absent record still verifies to a full default
        assert_eq!(store.verify(&addr).unwrap()["source"], "manual");
    }

    #[test]
    fn test_sync_defaults_every_known_device() {
        let registry = MemoryRegistry::new();
        registry.insert(DeviceInfo::new("0x01", "plug"));
        registry.insert(DeviceInfo::new("0x02", "siren"));

        let store = FeedbackStore::new(config_with_properties(&[]));
        // Pre-existing record for a device that disappeared
        store.on_device_joined(&"0xdead".into()).unwrap();

        store.sync(&registry).unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.verify(&"0x01".into()).unwrap()["ieeeAddr"], "0x01");
    }
}
