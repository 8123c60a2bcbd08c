//! Config surface: authenticated read/update of the settings document

use std::sync::Arc;

use crate::error::Result;
use crate::patch::ConfigPatch;
use crate::settings::Settings;
use crate::store::SettingsStore;

/// Outcome of a `set` attempt
///
/// A wrong shared secret is an ordinary negative result, not a fault; the
/// caller must distinguish "rejected" from "applied" without error handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOutcome {
    /// The patch was merged and persisted
    Applied,
    /// The shared secret did not match; stored config is untouched
    Rejected,
}

/// Read/update access to the gateway settings
///
/// Reads go to the durable store on every call; the service holds no cache
/// of its own, so config changes are visible to the next event immediately.
#[derive(Clone)]
pub struct ConfigService {
    store: Arc<dyn SettingsStore>,
}

impl ConfigService {
    /// Create a service over the given store
    pub fn new(store: Arc<dyn SettingsStore>) -> Self {
        Self { store }
    }

    /// Current settings snapshot
    pub fn get(&self) -> Result<Settings> {
        self.store.get()
    }

    /// The current tracked-property list
    pub fn tracked_properties(&self) -> Result<Vec<String>> {
        Ok(self.get()?.gateway.tracked_properties)
    }

    /// Validate `token` and merge `patch` into the stored settings
    pub fn set(&self, token: &str, patch: &ConfigPatch) -> Result<SetOutcome> {
        let mut settings = self.store.get()?;
        if token != settings.gateway.auth_token {
            tracing::warn!("Config update rejected: invalid credential");
            return Ok(SetOutcome::Rejected);
        }

        patch.apply(&mut settings);
        self.store.set(&settings)?;
        tracing::info!("Config updated");
        Ok(SetOutcome::Applied)
    }
}
