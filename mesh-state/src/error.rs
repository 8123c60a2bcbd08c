//! Error types for the state crate.

/// Errors from feedback store operations.
///
/// These are collaborator failures only; store reads and writes themselves
/// cannot fail, and an unknown address on `verify` is not an error.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    /// The device registry could not be read
    #[error("Registry error: {0}")]
    Registry(#[from] mesh_registry::RegistryError),

    /// The tracked-property configuration could not be read
    #[error("Config error: {0}")]
    Config(#[from] mesh_config::ConfigError),
}

/// Convenience type alias for Results using StateError.
pub type Result<T> = std::result::Result<T, StateError>;
