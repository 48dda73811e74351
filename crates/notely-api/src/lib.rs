//! notely-api - HTTP API server for notely
//!
//! The binary in `main.rs` wires configuration, logging and lifecycle; this
//! library holds the router so it can be driven in-process by tests.

pub mod config;
pub mod error;
pub mod handlers;

use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, Method},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use uuid::Uuid;

use notely_db::Database;
use notely_inference::NoteAssistant;

pub use config::ServerConfig;
pub use error::ApiError;

// =============================================================================
// REQUEST ID (UUIDv7)
// =============================================================================

/// Generates time-ordered UUIDv7 request correlation IDs.
#[derive(Clone, Default)]
pub struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

// =============================================================================
// STATE
// =============================================================================

/// Shared handler state. Cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub assistant: NoteAssistant,
}

impl AppState {
    pub fn new(db: Database, assistant: NoteAssistant) -> Self {
        Self { db, assistant }
    }
}

// =============================================================================
// ROUTER
// =============================================================================

/// Note routes, relative to the configured prefix.
fn note_routes() -> Router<AppState> {
    use handlers::assist::{generate_note, translate_note};
    use handlers::notes::{
        create_note, delete_note, get_note, list_notes, search_notes, update_note,
    };

    Router::new()
        .route("/notes", get(list_notes).post(create_note))
        // Static segments take priority over `:id`.
        .route("/notes/search", get(search_notes))
        .route("/notes/generate", post(generate_note))
        .route(
            "/notes/:id",
            get(get_note).put(update_note).delete(delete_note),
        )
        .route("/notes/:id/translate", post(translate_note))
}

fn cors_layer(allowed_origins: Option<&[axum::http::HeaderValue]>) -> CorsLayer {
    match allowed_origins {
        Some(origins) => CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins.iter().cloned()))
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
            .max_age(Duration::from_secs(3600)),
        None => CorsLayer::permissive(),
    }
}

/// Build the application router with all middleware applied.
pub fn router(state: AppState, config: &ServerConfig) -> Router {
    let notes = if config.api_prefix.is_empty() {
        note_routes()
    } else {
        Router::new().nest(&config.api_prefix, note_routes())
    };

    Router::new()
        .route("/", get(handlers::system::service_info))
        .route("/health", get(handlers::system::health_check))
        .merge(notes)
        .fallback(handlers::route_not_found)
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .layer(cors_layer(config.allowed_origins.as_deref()))
        // Enforced by the body extractors, so oversize requests get a JSON 413.
        .layer(DefaultBodyLimit::max(config.body_limit_bytes))
        .with_state(state)
}
