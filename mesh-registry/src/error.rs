//! Error types for registry access.

/// Errors surfaced by a [`crate::DeviceRegistry`] implementation.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// The mesh driver could not be reached or returned a failure
    #[error("Mesh transport error: {0}")]
    Transport(String),

    /// A raw attribute read failed for one device
    #[error("Attribute read failed for {address}: {reason}")]
    AttributeRead {
        /// The device address
        address: String,
        /// The driver's failure reason
        reason: String,
    },
}

/// Convenience type alias for Results using RegistryError.
pub type Result<T> = std::result::Result<T, RegistryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = RegistryError::Transport("serial port closed".to_string());
        assert_eq!(error.to_string(), "Mesh transport error: serial port closed");

        let error = RegistryError::AttributeRead {
            address: "0x01".to_string(),
            reason: "timeout".to_string(),
        };
        assert!(error.to_string().contains("0x01"));
        assert!(error.to_string().contains("timeout"));
    }
}
