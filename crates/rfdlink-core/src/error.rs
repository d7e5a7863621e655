use thiserror::Error;

/// Result type alias for rfdlink operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the driver boundary and the session core.
///
/// The taxonomy mirrors the two failure categories the vendor driver
/// reports (caller misuse vs. device/transport fault) plus the discovery
/// channel's own failure mode. Discovery errors abort the current probe
/// and may be retried; usage errors abort the operation and are not
/// retried; operation failures carry a human-readable status description
/// that is surfaced to the observer.
#[derive(Debug, Error)]
pub enum Error {
    /// Discovery channel invalid or unavailable.
    #[error("discovery failed: {message}")]
    Discovery { message: String },

    /// An operation was invoked in an invalid state.
    #[error("invalid usage: {message}")]
    Usage { message: String },

    /// Device or transport level fault.
    #[error("operation failed: {description}")]
    OperationFailure { description: String },

    /// A state-machine transition that the lifecycle does not allow.
    #[error("invalid state transition from {from} to {to}")]
    InvalidStateTransition { from: String, to: String },

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a new discovery error.
    pub fn discovery(message: impl Into<String>) -> Self {
        Self::Discovery {
            message: message.into(),
        }
    }

    /// Create a new usage error.
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage {
            message: message.into(),
        }
    }

    /// Create a new operation-failure error.
    pub fn operation_failure(description: impl Into<String>) -> Self {
        Self::OperationFailure {
            description: description.into(),
        }
    }

    /// The human-readable description to surface to an observer.
    ///
    /// Operation failures report the driver's status description alone,
    /// matching what the original driver exposes; every other variant
    /// reports its full display form.
    pub fn status_description(&self) -> String {
        match self {
            Self::OperationFailure { description } => description.clone(),
            other => other.to_string(),
        }
    }
}
