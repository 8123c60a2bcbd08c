//! Settings model and config surface for meshgw.
//!
//! Configuration is plain data persisted in a durable key-value style store
//! behind the [`SettingsStore`] trait. The [`ConfigService`] is the only
//! mutation path: it validates the shared secret and applies a
//! presence-based [`ConfigPatch`] merge, so partially-supplied input can
//! never clobber fields the caller did not send.

pub mod error;
pub mod patch;
pub mod service;
pub mod settings;
pub mod store;

pub use error::{ConfigError, Result};
pub use patch::ConfigPatch;
pub use service::{ConfigService, SetOutcome};
pub use settings::{
    AvailabilitySettings, DeviceOptions, GatewaySettings, Settings, MANDATORY_PROPERTIES,
};
pub use store::{JsonFileStore, MemoryStore, SettingsStore};
