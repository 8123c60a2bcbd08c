//! Durable settings storage
//!
//! The gateway treats configuration as externally persisted data with
//! get/set semantics. [`MemoryStore`] backs tests; [`JsonFileStore`] keeps a
//! single JSON document on disk and is what the binary uses.

use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;

use crate::error::{ConfigError, Result};
use crate::settings::Settings;

/// Durable get/set storage for the settings document
pub trait SettingsStore: Send + Sync {
    /// Read the current settings
    fn get(&self) -> Result<Settings>;

    /// Replace the stored settings
    fn set(&self, settings: &Settings) -> Result<()>;
}

/// In-memory settings store for tests
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Settings>,
}

impl MemoryStore {
    /// Create a store holding default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with the given settings
    pub fn with_settings(settings: Settings) -> Self {
        Self {
            inner: RwLock::new(settings),
        }
    }
}

impl SettingsStore for MemoryStore {
    fn get(&self) -> Result<Settings> {
        Ok(self.inner.read().clone())
    }

    fn set(&self, settings: &Settings) -> Result<()> {
        *self.inner.write() = settings.clone();
        Ok(())
    }
}

/// JSON-file-backed settings store
///
/// A missing file reads as default settings; the first `set` creates it.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Create a store backed by the given file path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the platform default location (`<config dir>/meshgw/settings.json`)
    pub fn at_default_location() -> Self {
        let base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::new(base.join("meshgw").join("settings.json"))
    }

    /// The backing file path
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for JsonFileStore {
    fn get(&self) -> Result<Settings> {
        if !self.path.exists() {
            return Ok(Settings::default());
        }
        let raw = fs::read_to_string(&self.path)
            .map_err(|e| ConfigError::Storage(format!("read {}: {}", self.path.display(), e)))?;
        Ok(serde_json::from_str(&raw)?)
    }

    fn set(&self, settings: &Settings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ConfigError::Storage(format!("mkdir {}: {}", parent.display(), e)))?;
        }
        let encoded = serde_json::to_string_pretty(settings)?;
        fs::write(&self.path, encoded)
            .map_err(|e| ConfigError::Storage(format!("write {}: {}", self.path.display(), e)))?;
        Ok(())
    }
}
