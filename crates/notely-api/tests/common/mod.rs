//! Shared helpers for driving the router in-process.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use notely_api::{router, AppState, ServerConfig};
use notely_db::Database;
use notely_inference::{mock::MockGenerationBackend, NoteAssistant};

pub struct TestApp {
    pub router: Router,
    pub db: Database,
    pub backend: MockGenerationBackend,
}

pub async fn spawn_app(backend: MockGenerationBackend) -> TestApp {
    spawn_app_with_config(backend, ServerConfig::default()).await
}

pub async fn spawn_app_with_config(
    backend: MockGenerationBackend,
    config: ServerConfig,
) -> TestApp {
    let db = Database::connect_in_memory()
        .await
        .expect("Failed to open in-memory database");
    let assistant = NoteAssistant::new(Arc::new(backend.clone()));
    let router = router(AppState::new(db.clone(), assistant), &config);
    TestApp {
        router,
        db,
        backend,
    }
}

impl TestApp {
    /// Send a request and return the status and parsed JSON body
    /// (`Value::Null` for an empty body, `Value::String` for non-JSON).
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .expect("request"),
            None => builder.body(Body::empty()).expect("request"),
        };
        self.send(request).await
    }

    /// Send a prebuilt request.
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("response");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, None).await
    }

    /// Create a note through the API and return its JSON.
    pub async fn create_note(&self, title: &str, content: &str) -> Value {
        let (status, body) = self
            .post(
                "/notes",
                serde_json::json!({"title": title, "content": content}),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create failed: {}", body);
        body
    }
}
