//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or malformed input, rejected before any storage access.
    #[error("Validation error: {0}")]
    Validation(String),

    /// No credential was supplied.
    #[error("Authentication required: {0}")]
    Unauthenticated(String),

    /// A credential was supplied but could not be verified.
    #[error("Invalid credential: {0}")]
    InvalidCredential(String),

    /// Username, email, or phone number collides with an existing account.
    #[error("Duplicate identity: {0}")]
    DuplicateIdentity(String),

    /// Referenced account does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The wager is not covered by the account balance.
    #[error("Insufficient funds: {0}")]
    InsufficientFunds(String),

    /// Underlying store unreachable or errored.
    #[error("Storage error: {0}")]
    Storage(String),

    /// The atomic settlement commit could not complete.
    #[error("Settlement error: {0}")]
    Settlement(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::Unauthenticated(_) | Self::InvalidCredential(_) => 401,
            Self::NotFound(_) => 404,
            Self::DuplicateIdentity(_) => 409,
            Self::InsufficientFunds(_) => 422,
            Self::Storage(_) | Self::Settlement(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Unauthenticated(_) => "UNAUTHENTICATED",
            Self::InvalidCredential(_) => "INVALID_CREDENTIAL",
            Self::DuplicateIdentity(_) => "DUPLICATE_IDENTITY",
            Self::NotFound(_) => "NOT_FOUND",
            Self::InsufficientFunds(_) => "INSUFFICIENT_FUNDS",
            Self::Storage(_) => "STORAGE_ERROR",
            Self::Settlement(_) => "SETTLEMENT_ERROR",
        }
    }
}
