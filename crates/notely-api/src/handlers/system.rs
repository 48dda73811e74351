//! Service info and health endpoints.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use tracing::error;

use crate::AppState;

/// Service name and version.
pub async fn service_info(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "service": "notely",
        "version": env!("CARGO_PKG_VERSION"),
        "model": state.assistant.model_name(),
    }))
}

/// Liveness plus a database round trip.
///
/// # Returns
/// - 200 OK with `status: "healthy"`
/// - 503 Service Unavailable with `status: "unhealthy"` if the database is unreachable
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    match state.db.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "status": "healthy",
                "version": env!("CARGO_PKG_VERSION"),
                "database": "ok",
            })),
        ),
        Err(e) => {
            error!(subsystem = "api", component = "health", error = %e, "Database health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(serde_json::json!({
                    "status": "unhealthy",
                    "version": env!("CARGO_PKG_VERSION"),
                    "database": "unreachable",
                })),
            )
        }
    }
}
