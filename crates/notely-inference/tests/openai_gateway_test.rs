//! Integration tests for the OpenAI-compatible gateway against a mock server.
//!
//! Verifies the request shape, response decoding, retry behaviour and the
//! mapping of provider failures onto notely errors.

use std::sync::Arc;

use notely_core::{ChatMessage, Error, GenerationBackend, SamplingParams};
use notely_inference::openai::{OpenAIBackend, OpenAIConfig};
use notely_inference::{NoteAssistant, FALLBACK_TITLE};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn completion(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-123",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
    })
}

fn backend_for(server: &MockServer, max_retries: u32) -> OpenAIBackend {
    let config = OpenAIConfig {
        base_url: server.uri(),
        api_key: Some("test-key".to_string()),
        gen_model: "test-gen".to_string(),
        timeout_seconds: 5,
        max_retries,
        retry_backoff_ms: 1,
    };
    OpenAIBackend::new(config).expect("Failed to create backend")
}

async fn say_hello(backend: &OpenAIBackend) -> notely_core::Result<String> {
    backend
        .call_model(&[ChatMessage::user("Hello")], SamplingParams::default())
        .await
}

#[tokio::test]
async fn test_call_model_sends_chat_completion_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("Authorization", "Bearer test-key"))
        .and(body_partial_json(json!({
            "model": "test-gen",
            "temperature": 0.5,
            "top_p": 0.75,
            "messages": [
                {"role": "system", "content": "Be brief."},
                {"role": "user", "content": "Hello"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("Hi there!")))
        .expect(1)
        .mount(&server)
        .await;

    let backend = backend_for(&server, 0);
    let reply = backend
        .call_model(
            &[ChatMessage::system("Be brief."), ChatMessage::user("Hello")],
            SamplingParams {
                temperature: 0.5,
                top_p: 0.75,
            },
        )
        .await
        .unwrap();

    assert_eq!(reply, "Hi there!");
}

#[tokio::test]
async fn test_transient_failure_is_retried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("recovered")))
        .expect(1)
        .mount(&server)
        .await;

    let backend = backend_for(&server, 2);
    assert_eq!(say_hello(&backend).await.unwrap(), "recovered");
}

#[tokio::test]
async fn test_rate_limit_exhausting_retries_is_unavailable() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": {"message": "Too many requests", "type": "rate_limit_exceeded"}
        })))
        .expect(3)
        .mount(&server)
        .await;

    let backend = backend_for(&server, 2);
    let err = say_hello(&backend).await.unwrap_err();
    assert!(matches!(err, Error::GatewayUnavailable(_)));
    assert!(err.to_string().contains("3 attempt(s)"));
}

#[tokio::test]
async fn test_unauthorized_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {"message": "Bad credentials", "type": "invalid_request_error"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let backend = backend_for(&server, 2);
    let err = say_hello(&backend).await.unwrap_err();
    assert!(matches!(err, Error::GatewayUnavailable(_)));
    assert!(err.to_string().contains("Bad credentials"));
}

#[tokio::test]
async fn test_bad_request_is_inference_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(400).set_body_string("unsupported parameter"))
        .expect(1)
        .mount(&server)
        .await;

    let backend = backend_for(&server, 2);
    let err = say_hello(&backend).await.unwrap_err();
    assert!(matches!(err, Error::Inference(_)));
    assert!(err.to_string().contains("unsupported parameter"));
}

#[tokio::test]
async fn test_malformed_envelope_is_inference_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .expect(1)
        .mount(&server)
        .await;

    let backend = backend_for(&server, 2);
    assert!(matches!(
        say_hello(&backend).await.unwrap_err(),
        Error::Inference(_)
    ));
}

#[tokio::test]
async fn test_empty_choices_is_inference_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let backend = backend_for(&server, 0);
    let err = say_hello(&backend).await.unwrap_err();
    assert!(matches!(err, Error::Inference(_)));
    assert!(err.to_string().contains("no choices"));
}

#[tokio::test]
async fn test_unreachable_provider_is_unavailable() {
    let config = OpenAIConfig {
        // Discard port; nothing listens here.
        base_url: "http://127.0.0.1:9".to_string(),
        api_key: Some("test-key".to_string()),
        max_retries: 0,
        ..Default::default()
    };
    let backend = OpenAIBackend::new(config).unwrap();

    assert!(matches!(
        say_hello(&backend).await.unwrap_err(),
        Error::GatewayUnavailable(_)
    ));
}

#[tokio::test]
async fn test_assistant_draft_note_end_to_end() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(
            r#"{"Title":"Badminton at PolyU","Notes":"Remember to play badminton at 5pm tomorrow at PolyU.","Tags":["badminton","sports"]}"#,
        )))
        .mount(&server)
        .await;

    let assistant = NoteAssistant::new(Arc::new(backend_for(&server, 0)));
    let draft = assistant
        .draft_note("Badminton tmr 5pm @polyu", "English")
        .await
        .unwrap();

    assert!(draft.structured);
    assert_eq!(draft.title, "Badminton at PolyU");
    assert_eq!(draft.tags, vec!["badminton", "sports"]);
}

#[tokio::test]
async fn test_assistant_falls_back_on_prose() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(
            "Sure! You have badminton tomorrow at 5pm.",
        )))
        .mount(&server)
        .await;

    let assistant = NoteAssistant::new(Arc::new(backend_for(&server, 0)));
    let draft = assistant.draft_note("Badminton tmr", "English").await.unwrap();

    assert!(!draft.structured);
    assert_eq!(draft.title, FALLBACK_TITLE);
    assert_eq!(draft.content, "Sure! You have badminton tomorrow at 5pm.");
}
