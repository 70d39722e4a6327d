//! Error types for reader operations.
//!
//! Ordinary hardware trouble (a reader that does not answer, an out-of-range
//! setting) is absorbed by the readers themselves. The variants below are
//! what remains: contract violations by the caller and failures of a live
//! session.

/// Result type alias for reader operations.
pub type Result<T> = std::result::Result<T, HardwareError>;

/// Errors that can occur during reader operations.
#[derive(Debug, thiserror::Error)]
pub enum HardwareError {
    /// Operation needs a connected session.
    #[error("Reader not connected: {operation}")]
    NotConnected { operation: String },

    /// Connection address rejected before reaching the driver.
    #[error("Invalid address: {reason}")]
    InvalidAddress { reason: String },

    /// Operation or reader kind is not supported.
    #[error("Unsupported operation: {operation}")]
    Unsupported { operation: String },

    /// Driver communication error.
    #[error("Communication error: {message}")]
    CommunicationError { message: String },

    /// Invalid data received from, or destined to, the device.
    #[error("Invalid data: {message}")]
    InvalidData { message: String },

    /// Generic error with custom message.
    #[error("{0}")]
    Other(String),
}

impl HardwareError {
    /// Create a new not-connected error.
    pub fn not_connected(operation: impl Into<String>) -> Self {
        Self::NotConnected {
            operation: operation.into(),
        }
    }

    /// Create a new invalid address error.
    pub fn invalid_address(reason: impl Into<String>) -> Self {
        Self::InvalidAddress {
            reason: reason.into(),
        }
    }

    /// Create a new unsupported operation error.
    pub fn unsupported(operation: impl Into<String>) -> Self {
        Self::Unsupported {
            operation: operation.into(),
        }
    }

    /// Create a new communication error.
    pub fn communication(message: impl Into<String>) -> Self {
        Self::CommunicationError {
            message: message.into(),
        }
    }

    /// Create a new invalid data error.
    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidData {
            message: message.into(),
        }
    }

    /// Create a generic error with custom message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }
}
