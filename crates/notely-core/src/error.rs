//! Error types for notely.

use thiserror::Error;

/// Result type alias using notely's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for notely operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Note not found
    #[error("Note not found: {0}")]
    NoteNotFound(i64),

    /// Invalid input (missing or malformed client data)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The model provider cannot be reached or is not configured.
    #[error("Gateway unavailable: {0}")]
    GatewayUnavailable(String),

    /// Inference/generation failed
    #[error("Inference error: {0}")]
    Inference(String),

    /// Model output did not match the expected structure
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Whether this error means the requested entity does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_) | Error::NoteNotFound(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
