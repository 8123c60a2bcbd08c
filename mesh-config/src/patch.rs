//! Presence-based settings patch
//!
//! Every field is optional; a field overwrites the stored value only when it
//! is supplied and non-empty. Absent or empty fields leave the stored value
//! untouched. This is an upsert-by-presence merge, never a full replace.

use serde::Deserialize;
use std::collections::HashMap;

use crate::settings::{DeviceOptions, Settings, MANDATORY_PROPERTIES};

/// Partial settings update, applied field by field
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ConfigPatch {
    pub auth_token: Option<String>,
    pub callbacks: Option<Vec<String>>,
    pub tracked_properties: Option<Vec<String>>,
    pub devices: Option<HashMap<String, DeviceOptions>>,
    pub alarm_models: Option<Vec<String>>,
    pub audit_models: Option<Vec<String>>,
    pub meter_models: Option<Vec<String>>,
}

impl ConfigPatch {
    /// Merge the present, non-empty fields of this patch into `settings`
    ///
    /// The tracked-property list is special-cased: any mandatory keys the
    /// caller supplied are stripped and the mandatory set is re-prepended,
    /// so the three keys are always present exactly once and first.
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(token) = &self.auth_token {
            if !token.is_empty() {
                settings.gateway.auth_token = token.clone();
            }
        }
        if let Some(callbacks) = &self.callbacks {
            if !callbacks.is_empty() {
                settings.gateway.callbacks = callbacks.clone();
            }
        }
        if let Some(tracked) = &self.tracked_properties {
            if !tracked.is_empty() {
                settings.gateway.tracked_properties = normalize_tracked(tracked);
            }
        }
        if let Some(devices) = &self.devices {
            if !devices.is_empty() {
                settings.devices = devices.clone();
            }
        }
        if let Some(models) = &self.alarm_models {
            if !models.is_empty() {
                settings.gateway.alarm_models = models.clone();
            }
        }
        if let Some(models) = &self.audit_models {
            if !models.is_empty() {
                settings.gateway.audit_models = models.clone();
            }
        }
        if let Some(models) = &self.meter_models {
            if !models.is_empty() {
                settings.gateway.meter_models = models.clone();
            }
        }
    }

    /// Whether the patch carries no fields at all
    pub fn is_empty(&self) -> bool {
        self.auth_token.is_none()
            && self.callbacks.is_none()
            && self.tracked_properties.is_none()
            && self.devices.is_none()
            && self.alarm_models.is_none()
            && self.audit_models.is_none()
            && self.meter_models.is_none()
    }
}

/// Force the mandatory keys to the front, exactly once
fn normalize_tracked(supplied: &[String]) -> Vec<String> {
    let mut result: Vec<String> = MANDATORY_PROPERTIES
        .iter()
        .map(|p| p.to_string())
        .collect();
    result.extend(
        supplied
            .iter()
            .filter(|p| !MANDATORY_PROPERTIES.contains(&p.as_str()))
            .cloned(),
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_patch_changes_nothing() {
        let mut settings = Settings::default();
        settings.gateway.auth_token = "secret".to_string();
        let before = settings.clone();

        ConfigPatch::default().apply(&mut settings);

        assert_eq!(settings, before);
    }

    #[test]
    fn test_only_supplied_field_is_replaced() {
        let mut settings = Settings::default();
        settings.gateway.auth_token = "secret".to_string();
        settings.gateway.alarm_models = vec!["SIREN-2".to_string()];

        let patch = ConfigPatch {
            callbacks: Some(vec!["http://a".to_string(), "http://b".to_string()]),
            ..Default::default()
        };
        patch.apply(&mut settings);

        assert_eq!(settings.gateway.callbacks, vec!["http://a", "http://b"]);
        // Untouched fields survive
        assert_eq!(settings.gateway.auth_token, "secret");
        assert_eq!(settings.gateway.alarm_models, vec!["SIREN-2"]);
        assert_eq!(
            settings.gateway.tracked_properties,
            vec!["ieeeAddr", "source", "callback_url"]
        );
    }

    #[test]
    fn test_empty_vec_does_not_clear_stored_value() {
        let mut settings = Settings::default();
        settings.gateway.callbacks = vec!["http://a".to_string()];

        let patch = ConfigPatch {
            callbacks: Some(Vec::new()),
            ..Default::default()
        };
        patch.apply(&mut settings);

        assert_eq!(settings.gateway.callbacks, vec!["http://a"]);
    }

    #[test]
    fn test_mandatory_keys_prepended_once_and_first() {
        let mut settings = Settings::default();

        // Caller duplicates two mandatory keys and adds its own
        let patch = ConfigPatch {
            tracked_properties: Some(vec![
                "transactionId".to_string(),
                "source".to_string(),
                "ieeeAddr".to_string(),
                "branchId".to_string(),
            ]),
            ..Default::default()
        };
        patch.apply(&mut settings);

        assert_eq!(
            settings.gateway.tracked_properties,
            vec![
                "ieeeAddr",
                "source",
                "callback_url",
                "transactionId",
                "branchId"
            ]
        );
    }

    #[test]
    fn test_mandatory_keys_present_when_caller_omits_them() {
        let mut settings = Settings::default();

        let patch = ConfigPatch {
            tracked_properties: Some(vec!["controlSource".to_string()]),
            ..Default::default()
        };
        patch.apply(&mut settings);

        assert_eq!(
            settings.gateway.tracked_properties,
            vec!["ieeeAddr", "source", "callback_url", "controlSource"]
        );
    }

    #[test]
    fn test_patch_deserializes_from_partial_json() {
        let patch: ConfigPatch =
            serde_json::from_str(r#"{"callbacks": ["http://x"]}"#).unwrap();
        assert_eq!(patch.callbacks, Some(vec!["http://x".to_string()]));
        assert!(patch.auth_token.is_none());
        assert!(!patch.is_empty());
    }
}
