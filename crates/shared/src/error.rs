//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error taxonomy.
///
/// Every fallible operation in the HTTP surface ultimately maps onto one of
/// these variants. Ownership failures are reported as `NotFound` so that a
/// record owned by someone else is indistinguishable from an absent one.
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing, invalid, or expired credential or capability token.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Resource absent or not owned by the caller.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed or missing input.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Operation blocked by current state (e.g. folder not empty).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Blob store failure.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Unauthorized(_) => 401,
            Self::NotFound(_) => 404,
            Self::Validation(_) => 400,
            Self::Conflict(_) => 409,
            Self::Storage(_) | Self::Database(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::Storage(_) => "STORAGE_ERROR",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}
