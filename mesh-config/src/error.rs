//! Error types for the config crate.

/// Errors from settings persistence.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The backing store could not be read or written
    #[error("Settings storage error: {0}")]
    Storage(String),

    /// The stored settings document could not be parsed or encoded
    #[error("Settings serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience type alias for Results using ConfigError.
pub type Result<T> = std::result::Result<T, ConfigError>;
