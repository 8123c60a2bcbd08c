//! Error types for the notify crate.

/// Errors from dispatcher construction.
///
/// Delivery and config-read failures are deliberately not represented here:
/// `dispatch` logs and swallows them, never surfacing them to the caller.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// The HTTP client could not be built
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

/// Convenience type alias for Results using NotifyError.
pub type Result<T> = std::result::Result<T, NotifyError>;
