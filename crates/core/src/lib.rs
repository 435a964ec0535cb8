//! Shared primitives for all Rust crates in Coursely.

#![forbid(unsafe_code)]

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type used across Coursely crates.
pub type AppResult<T> = Result<T, AppError>;

/// A validated non-empty UTF-8 string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Creates a validated non-empty string.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(AppError::Validation(
                "value must not be empty or whitespace".to_owned(),
            ));
        }

        Ok(Self(value))
    }

    /// Returns the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<NonEmptyString> for String {
    fn from(value: NonEmptyString) -> Self {
        value.0
    }
}

/// Profile store operation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreOperation {
    /// Reading a profile by external id.
    Lookup,
    /// Atomic insert-or-update of a profile.
    Upsert,
    /// Changing a profile role.
    UpdateRole,
    /// Removing a profile.
    Delete,
}

impl StoreOperation {
    /// Returns a stable name used in logs and error details.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lookup => "lookup",
            Self::Upsert => "upsert",
            Self::UpdateRole => "update_role",
            Self::Delete => "delete",
        }
    }
}

impl Display for StoreOperation {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Common application error categories.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid input or violated invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// Requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Write operation conflicts with existing state.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Caller is not authenticated.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Caller is authenticated but blocked by authorization policy.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// A signed delivery arrived without its signature headers.
    #[error("missing signature headers: {0}")]
    MissingHeaders(String),

    /// A signed delivery failed verification.
    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    /// The profile store rejected or failed an operation.
    #[error("failed to {operation} profile '{external_id}': {message}")]
    Persistence {
        /// Operation that failed.
        operation: StoreOperation,
        /// External identity id the operation targeted.
        external_id: String,
        /// Driver-level detail. Logged, never returned to callers.
        message: String,
    },

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Builds a persistence error for one profile operation.
    #[must_use]
    pub fn persistence(
        operation: StoreOperation,
        external_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Persistence {
            operation,
            external_id: external_id.into(),
            message: message.into(),
        }
    }

    /// Returns a detail string that is safe to hand back to callers.
    #[must_use]
    pub fn public_detail(&self) -> String {
        match self {
            Self::Persistence { operation, .. } => {
                format!("profile store {operation} failed")
            }
            Self::Internal(_) => "unexpected server error".to_owned(),
            other => other.to_string(),
        }
    }
}
