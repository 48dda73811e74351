//! HTTP request handlers.

pub mod assist;
pub mod notes;
pub mod system;

use crate::ApiError;

/// JSON 404 for unmatched routes.
pub async fn route_not_found() -> ApiError {
    ApiError::NotFound("Route not found".to_string())
}
