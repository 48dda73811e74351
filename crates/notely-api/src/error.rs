//! HTTP error mapping.

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{debug, error, warn};

/// Error returned by every handler.
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    PayloadTooLarge(String),
    ServiceUnavailable(String),
    Internal(notely_core::Error),
}

impl From<notely_core::Error> for ApiError {
    fn from(err: notely_core::Error) -> Self {
        match err {
            notely_core::Error::NotFound(_) | notely_core::Error::NoteNotFound(_) => {
                ApiError::NotFound(err.to_string())
            }
            notely_core::Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            notely_core::Error::GatewayUnavailable(msg) => ApiError::ServiceUnavailable(msg),
            other => ApiError::Internal(other),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge(rejection.body_text())
        } else {
            ApiError::BadRequest(rejection.body_text())
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            ApiError::NotFound(msg)
            | ApiError::BadRequest(msg)
            | ApiError::PayloadTooLarge(msg) => {
                debug!(status = status.as_u16(), error = %msg, "Request rejected");
                msg
            }
            ApiError::ServiceUnavailable(msg) => {
                warn!(status = status.as_u16(), error = %msg, "Model gateway unavailable");
                msg
            }
            ApiError::Internal(err) => {
                error!(status = status.as_u16(), error = %err, "Request failed");
                err.to_string()
            }
        };

        let body = Json(serde_json::json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}
