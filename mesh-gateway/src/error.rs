//! Error types for the gateway crate.

/// Errors from gateway startup and wiring.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Feedback store or registry failure during startup
    #[error("State error: {0}")]
    State(#[from] mesh_state::StateError),

    /// Settings could not be read or written
    #[error("Config error: {0}")]
    Config(#[from] mesh_config::ConfigError),

    /// The dispatcher could not be constructed
    #[error("Notify error: {0}")]
    Notify(#[from] mesh_notify::NotifyError),

    /// The mesh driver could not be reached
    #[error("Registry error: {0}")]
    Registry(#[from] mesh_registry::RegistryError),
}

/// Convenience type alias for Results using GatewayError.
pub type Result<T> = std::result::Result<T, GatewayError>;
