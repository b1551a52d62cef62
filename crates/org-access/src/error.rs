//! Error types for permission evaluation
//!
//! Evaluation itself is total over well-formed input. The only failures are
//! caller contract violations on the request shape and problems building a
//! registry from external role definitions.

use thiserror::Error;

use crate::config::ConfigError;

/// Access evaluation error types.
#[derive(Debug, Error)]
pub enum AccessError {
    /// Request supplied both the legacy `permission` and the current
    /// `permissions` field.
    #[error("Ambiguous permission request: both `permission` and `permissions` were supplied")]
    AmbiguousRequest,

    /// Request supplied neither `permission` nor `permissions`.
    #[error("Missing permission request: one of `permission` or `permissions` is required")]
    MissingRequest,

    /// Role definitions could not be parsed.
    #[error("Invalid role definitions: {0}")]
    InvalidRoleDefinitions(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type for access operations.
pub type AccessResult<T> = Result<T, AccessError>;

impl AccessError {
    /// Check if this error is a caller contract violation on the request shape.
    ///
    /// Contract violations are programming errors in the caller and are never
    /// the same thing as "permission denied".
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, AccessError::AmbiguousRequest | AccessError::MissingRequest)
    }

    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            AccessError::AmbiguousRequest => "AMBIGUOUS_PERMISSION_REQUEST",
            AccessError::MissingRequest => "MISSING_PERMISSION_REQUEST",
            AccessError::InvalidRoleDefinitions(_) => "INVALID_ROLE_DEFINITIONS",
            AccessError::Config(_) => "CONFIG_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contract_violations() {
        assert!(AccessError::AmbiguousRequest.is_contract_violation());
        assert!(AccessError::MissingRequest.is_contract_violation());

        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(!AccessError::from(parse_err).is_contract_violation());
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            AccessError::AmbiguousRequest.error_code(),
            "AMBIGUOUS_PERMISSION_REQUEST"
        );
        assert_eq!(
            AccessError::MissingRequest.error_code(),
            "MISSING_PERMISSION_REQUEST"
        );
    }
}
