//! OpenAI-specific error handling.

use notely_core::Error;

/// OpenAI-specific error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenAIErrorCode {
    /// Missing, invalid or unauthorized credentials.
    AuthenticationError,
    /// Rate limit exceeded.
    RateLimitExceeded,
    /// Model or endpoint not found.
    ModelNotFound,
    /// Request too large.
    ContextLengthExceeded,
    /// Server error.
    ServerError,
    /// Unknown error.
    Unknown,
}

impl OpenAIErrorCode {
    /// Determine error code from HTTP status and error type.
    pub fn from_response(status: u16, error_type: &str) -> Self {
        match (status, error_type) {
            (401, _) | (403, _) => Self::AuthenticationError,
            (429, _) => Self::RateLimitExceeded,
            (404, _) | (_, "model_not_found") => Self::ModelNotFound,
            (400, _) if error_type.contains("context_length") => Self::ContextLengthExceeded,
            (500..=599, _) => Self::ServerError,
            _ => Self::Unknown,
        }
    }

    /// Check if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimitExceeded | Self::ServerError)
    }
}

/// Convert an OpenAI error code to a notely Error.
///
/// Codes that mean the provider cannot serve us at all become
/// `GatewayUnavailable`; everything else is an `Inference` failure.
pub fn to_notely_error(code: OpenAIErrorCode, message: &str) -> Error {
    match code {
        OpenAIErrorCode::AuthenticationError => {
            Error::GatewayUnavailable(format!("Authentication failed: {}", message))
        }
        OpenAIErrorCode::ModelNotFound => {
            Error::GatewayUnavailable(format!("Model not found: {}", message))
        }
        OpenAIErrorCode::RateLimitExceeded => {
            Error::Inference(format!("Rate limit exceeded: {}", message))
        }
        OpenAIErrorCode::ContextLengthExceeded => {
            Error::Inference(format!("Context too long: {}", message))
        }
        OpenAIErrorCode::ServerError => Error::Inference(format!("Server error: {}", message)),
        OpenAIErrorCode::Unknown => Error::Inference(message.to_string()),
    }
}

/// Outcome of a single failed attempt against the provider.
#[derive(Debug, thiserror::Error)]
pub enum GatewayFailure {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("provider returned {status}: {message}")]
    Status {
        status: u16,
        code: OpenAIErrorCode,
        message: String,
    },

    #[error("request failed: {0}")]
    Transport(String),

    #[error("malformed provider response: {0}")]
    Malformed(String),
}

impl GatewayFailure {
    /// Whether another attempt could succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout | Self::Connect(_) => true,
            Self::Status { code, .. } => code.is_retryable(),
            Self::Transport(_) | Self::Malformed(_) => false,
        }
    }

    /// Map a failure with no retries left to a notely Error.
    pub fn into_error(self, attempts: u32) -> Error {
        if self.is_retryable() {
            return Error::GatewayUnavailable(format!(
                "Model provider unavailable after {} attempt(s): {}",
                attempts, self
            ));
        }
        match self {
            Self::Status { code, message, .. } => to_notely_error(code, &message),
            other => Error::Inference(other.to_string()),
        }
    }
}

impl From<reqwest::Error> for GatewayFailure {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_connect() {
            Self::Connect(e.to_string())
        } else if e.is_decode() {
            Self::Malformed(e.to_string())
        } else {
            Self::Transport(e.to_string())
        }
    }
}
