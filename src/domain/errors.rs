//! Domain error types
//!
//! The workflow layer raises typed domain failures; the HTTP boundary maps
//! them to status codes. Storage faults are wrapped so third-party types
//! never cross the domain boundary.

use thiserror::Error;

/// Main error type for the service
#[derive(Debug, Error)]
pub enum LaudoError {
    /// Missing, malformed or expired token, or token subject not found
    #[error("invalid or expired token")]
    Unauthorized,

    /// Credentials rejected on login
    #[error("incorrect e-mail or password")]
    Forbidden,

    /// Domain guard violation (exam not found, already finalized, ...)
    #[error("unprocessable: {0}")]
    Unprocessable(String),

    /// Malformed persisted or submitted data
    #[error("validation error: {0}")]
    Validation(String),

    /// Storage collaborator fault
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Any unanticipated fault; logged, never exposed to callers
    #[error("internal error: {0}")]
    Internal(String),
}

/// Errors raised by storage backends
///
/// `ConditionFailed` is distinguishable from transport faults so workflows
/// can retry-with-reselect on a lost compare-and-swap.
#[derive(Debug, Error)]
pub enum StorageError {
    /// A conditional write found the condition no longer true
    #[error("conditional write failed")]
    ConditionFailed,

    /// The record to replace does not exist
    #[error("item not found: {0}")]
    ItemNotFound(String),

    /// Backend transport or protocol fault
    #[error("storage backend error: {0}")]
    Backend(String),
}

impl From<serde_json::Error> for LaudoError {
    fn from(err: serde_json::Error) -> Self {
        LaudoError::Validation(err.to_string())
    }
}

impl From<toml::de::Error> for LaudoError {
    fn from(err: toml::de::Error) -> Self {
        LaudoError::Configuration(format!("TOML parse error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LaudoError::Unprocessable("exam not found".to_string());
        assert_eq!(err.to_string(), "unprocessable: exam not found");
    }

    #[test]
    fn test_storage_error_conversion() {
        let err: LaudoError = StorageError::ConditionFailed.into();
        assert!(matches!(
            err,
            LaudoError::Storage(StorageError::ConditionFailed)
        ));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: LaudoError = toml_err.into();
        assert!(matches!(err, LaudoError::Configuration(_)));
    }

    #[test]
    fn test_implements_std_error() {
        let err = LaudoError::Unauthorized;
        let _: &dyn std::error::Error = &err;
    }
}
