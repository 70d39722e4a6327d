//! Error types for transport scanning.
//!
//! None of these reach the registry's callers: a failed enumeration is
//! logged by the scanner and retried on the next cycle.

/// Result type alias for scanning operations.
pub type Result<T> = std::result::Result<T, ScanError>;

/// Errors raised while observing a transport.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// The OS or library enumeration call failed.
    #[error("{transport} transport unavailable: {message}")]
    TransportUnavailable {
        transport: &'static str,
        message: String,
    },

    /// Generic error with custom message.
    #[error("{0}")]
    Other(String),
}

impl ScanError {
    /// Create a new transport-unavailable error.
    pub fn unavailable(transport: &'static str, message: impl Into<String>) -> Self {
        Self::TransportUnavailable {
            transport,
            message: message.into(),
        }
    }

    /// Create a generic error with custom message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_error() {
        let error = ScanError::unavailable("PC/SC", "service not running");
        assert!(matches!(error, ScanError::TransportUnavailable { .. }));
        assert_eq!(
            error.to_string(),
            "PC/SC transport unavailable: service not running"
        );
    }

    #[test]
    fn test_other_error() {
        assert_eq!(ScanError::other("boom").to_string(), "boom");
    }
}
