//! Unified error types for Cadence social services
//!
//! Every public operation of the social graph and feed engine returns
//! [`SocialResult`]. The taxonomy is intentionally small:
//!
//! 1. **Validation**: bad input, rejected before any write is attempted
//! 2. **NotFound**: missing account, content entity or comment
//! 3. **Forbidden**: the caller is not allowed to mutate the record
//! 4. **StorageUnavailable**: propagated unchanged from the storage layer
//!
//! Duplicate follows and unfollows of a missing edge are *not* errors. They
//! collapse to a no-op returning the current state.

use std::fmt;
use thiserror::Error;
use tonic::Status;

pub mod validation;

pub use validation::{sanitize_limit, validate_char_length, validate_page};

/// Core error type shared by social-service and feed-service
#[derive(Debug, Error)]
pub enum SocialError {
    /// Input failed validation
    #[error("Validation failed for {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// Resource not found
    #[error("Resource not found: {resource}")]
    NotFound { resource: &'static str, id: String },

    /// Caller may not perform the action
    #[error("Permission denied: {action}")]
    Forbidden { action: String },

    /// Storage layer failed; no implicit retries happen in this core
    #[error("Storage unavailable")]
    StorageUnavailable {
        #[source]
        source: anyhow::Error,
    },
}

impl SocialError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &'static str, id: impl fmt::Display) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    pub fn forbidden(action: impl Into<String>) -> Self {
        Self::Forbidden {
            action: action.into(),
        }
    }

    /// Wrap any storage failure
    pub fn storage<E: Into<anyhow::Error>>(error: E) -> Self {
        Self::StorageUnavailable {
            source: error.into(),
        }
    }

    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Forbidden { .. } => "FORBIDDEN",
            Self::StorageUnavailable { .. } => "STORAGE_UNAVAILABLE",
        }
    }

    /// Only storage failures are worth retrying, and only by the caller
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::StorageUnavailable { .. })
    }

    /// Convert to gRPC Status for service boundaries
    pub fn to_status(&self) -> Status {
        match self {
            Self::Validation { field, message } => {
                Status::invalid_argument(format!("{}: {}", field, message))
            }
            Self::NotFound { resource, .. } => Status::not_found(format!("{} not found", resource)),
            Self::Forbidden { action } => {
                Status::permission_denied(format!("Not allowed to {}", action))
            }
            Self::StorageUnavailable { .. } => {
                // Don't expose storage details to clients
                Status::unavailable("Storage temporarily unavailable")
            }
        }
    }

    /// Log error with appropriate level and context
    pub fn log(&self) {
        match self {
            Self::Validation { .. } | Self::NotFound { .. } => {
                tracing::debug!(error = ?self, code = self.code(), "Client error");
            }
            Self::Forbidden { .. } => {
                tracing::warn!(error = ?self, code = self.code(), "Authorization failure");
            }
            Self::StorageUnavailable { source } => {
                tracing::error!(error = %source, code = self.code(), "Storage failure");
            }
        }
    }
}

impl From<sqlx::Error> for SocialError {
    fn from(err: sqlx::Error) -> Self {
        Self::storage(err)
    }
}

impl From<SocialError> for Status {
    fn from(err: SocialError) -> Self {
        err.to_status()
    }
}

/// Result type alias for social operations
pub type SocialResult<T> = Result<T, SocialError>;

/// Error context extension trait for storage calls
pub trait ErrorContext<T> {
    /// Wrap the error as `StorageUnavailable` with context
    fn context<C>(self, context: C) -> SocialResult<T>
    where
        C: fmt::Display + Send + Sync + 'static;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context<C>(self, context: C) -> SocialResult<T>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|e| SocialError::storage(anyhow::Error::new(e).context(context)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tonic::Code;

    #[test]
    fn test_error_to_status_conversion() {
        let error = SocialError::not_found("account", "123");
        let status = error.to_status();
        assert_eq!(status.code(), Code::NotFound);
        assert_eq!(status.message(), "account not found");

        let status: Status = SocialError::forbidden("remove comment").into();
        assert_eq!(status.code(), Code::PermissionDenied);

        let status = SocialError::validation("body", "too long").to_status();
        assert_eq!(status.code(), Code::InvalidArgument);
        assert_eq!(status.message(), "body: too long");
    }

    #[test]
    fn test_ids_not_in_display() {
        let error = SocialError::not_found("account", "listener@example.com");
        let message = error.to_string();
        assert!(!message.contains("listener@example.com"));
        assert_eq!(message, "Resource not found: account");
    }

    #[test]
    fn test_only_storage_is_retryable() {
        assert!(SocialError::storage(anyhow::anyhow!("connection reset")).is_retryable());
        assert!(!SocialError::validation("target_id", "self").is_retryable());
        assert!(!SocialError::forbidden("delete").is_retryable());
    }

    #[test]
    fn test_error_context() {
        fn failing_operation() -> Result<(), std::io::Error> {
            Err(std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset"))
        }

        let result: SocialResult<()> = failing_operation().context("Failed to load edges");
        let error = result.unwrap_err();
        assert!(error.is_retryable());
        match error {
            SocialError::StorageUnavailable { source } => {
                assert_eq!(source.to_string(), "Failed to load edges");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_storage_details_hidden_from_status() {
        let status = SocialError::storage(anyhow::anyhow!("password authentication failed"))
            .to_status();
        assert_eq!(status.code(), Code::Unavailable);
        assert!(!status.message().contains("password"));
    }
}
