//! Error types for the reading shelf.

use thiserror::Error;

/// A shared error type for the entire shelf workspace.
///
/// Variants follow the failure taxonomy of the collaborators: transport
/// failures, quota exhaustion on the completion side, rejected record-store
/// mutations, and local validation failures that never reach the network.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ShelfError {
    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// A collaborator could not be reached, or answered with a transport-level error.
    #[error("Connection failed: {0}")]
    Network(String),

    /// The completion collaborator refused the request because of quota or rate limits.
    #[error("Quota exceeded: {0}")]
    QuotaExceeded(String),

    /// The completion collaborator returned an error response.
    #[error("Completion error: {message}")]
    Completion {
        status_code: Option<u16>,
        message: String,
    },

    /// The record store answered `success: false`.
    #[error("Rejected by record store: {0}")]
    Rejected(String),

    /// Local validation failed; no request was made.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ShelfError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a Network error
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    /// Check if this is a Validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this error signals quota or rate-limit exhaustion.
    ///
    /// Returns true for:
    /// - `QuotaExceeded` errors
    /// - `Completion` errors with status 429
    /// - any other non-network error whose detail mentions "429" or "quota"
    ///
    /// Network errors never count: their text carries URLs and ports.
    pub fn is_quota(&self) -> bool {
        match self {
            Self::QuotaExceeded(_) => true,
            Self::Network(_) => false,
            Self::Completion {
                status_code: Some(429),
                ..
            } => true,
            other => {
                let detail = other.to_string().to_lowercase();
                detail.contains("429") || detail.contains("quota")
            }
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for ShelfError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for ShelfError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for ShelfError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// Conversion from anyhow::Error (transitional, should be removed eventually)
impl From<anyhow::Error> for ShelfError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Conversion from String (for error messages)
impl From<String> for ShelfError {
    fn from(err: String) -> Self {
        Self::Internal(err)
    }
}

/// A type alias for `Result<T, ShelfError>`.
pub type Result<T> = std::result::Result<T, ShelfError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quota_detection() {
        assert!(ShelfError::QuotaExceeded("daily limit".into()).is_quota());
        assert!(
            ShelfError::Completion {
                status_code: Some(429),
                message: "Too many requests".into(),
            }
            .is_quota()
        );
        assert!(
            ShelfError::Completion {
                status_code: Some(400),
                message: "You exceeded your current Quota".into(),
            }
            .is_quota()
        );
        assert!(ShelfError::internal("status 429 from upstream").is_quota());
        assert!(!ShelfError::network("dns failure").is_quota());
    }

    #[test]
    fn test_network_error_mentioning_429_is_not_quota() {
        let err = ShelfError::network(
            "Gemini API request failed: error sending request for url (http://proxy.local:4290/v1beta)",
        );
        assert!(!err.is_quota());
        assert!(!ShelfError::network("quota proxy unreachable").is_quota());
    }

    #[test]
    fn test_io_conversion_keeps_kind() {
        let err: ShelfError =
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing").into();
        match err {
            ShelfError::Io { message } => assert!(message.contains("NotFound")),
            other => panic!("Expected Io error, got {other:?}"),
        }
    }
}
