//! Error handling module for the FitTrack core.
//!
//! Provides a single error type shared by the store, the repositories and the session manager.

use thiserror::Error;

/// Error codes as constants to avoid stringly-typed errors.
pub mod codes {
    pub const AUTH_ERROR: &str = "AUTH_ERROR";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
    pub const SERIALIZATION_ERROR: &str = "SERIALIZATION_ERROR";
    pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
}

/// Application error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Unknown email at login, or duplicate email at signup
    #[error("AUTH_ERROR: {0}")]
    Auth(String),
    /// Operation addressed an id that does not exist
    #[error("NOT_FOUND: {0}")]
    NotFound(String),
    /// Payload rejected before it reached storage
    #[error("VALIDATION_ERROR: {0}")]
    Validation(String),
    /// Backend read or write failure
    #[error("STORAGE_ERROR: {0}")]
    Storage(String),
    /// Stored value could not be encoded or decoded
    #[error("SERIALIZATION_ERROR: {0}")]
    Serialization(String),
    /// Invalid environment configuration
    #[error("CONFIG_ERROR: {0}")]
    Config(String),
}

impl AppError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Auth(_) => codes::AUTH_ERROR,
            AppError::NotFound(_) => codes::NOT_FOUND,
            AppError::Validation(_) => codes::VALIDATION_ERROR,
            AppError::Storage(_) => codes::STORAGE_ERROR,
            AppError::Serialization(_) => codes::SERIALIZATION_ERROR,
            AppError::Config(_) => codes::CONFIG_ERROR,
        }
    }

    /// Get the error message.
    pub fn message(&self) -> &str {
        match self {
            AppError::Auth(msg)
            | AppError::NotFound(msg)
            | AppError::Validation(msg)
            | AppError::Storage(msg)
            | AppError::Serialization(msg)
            | AppError::Config(msg) => msg,
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!("Database error: {:?}", err);
        AppError::Storage(format!("Database error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!("JSON error: {:?}", err);
        AppError::Serialization(format!("JSON error: {}", err))
    }
}
