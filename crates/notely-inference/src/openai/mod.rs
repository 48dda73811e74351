//! OpenAI-compatible inference backend.
//!
//! Works with any endpoint that speaks the chat-completions protocol:
//!
//! - GitHub Models (default)
//! - OpenAI cloud API
//! - Azure OpenAI
//! - Ollama (in OpenAI compatibility mode)
//! - vLLM / LM Studio
//!
//! # Example
//!
//! ```rust,no_run
//! use notely_inference::openai::{OpenAIBackend, OpenAIConfig};
//! use notely_core::{ChatMessage, GenerationBackend, SamplingParams};
//!
//! #[tokio::main]
//! async fn main() {
//!     // From environment variables
//!     let backend = OpenAIBackend::from_env().unwrap();
//!
//!     // Or with custom config
//!     let config = OpenAIConfig {
//!         base_url: "http://localhost:11434/v1".to_string(), // Ollama
//!         api_key: Some("ollama".to_string()),
//!         gen_model: "llama3".to_string(),
//!         ..Default::default()
//!     };
//!     let backend = OpenAIBackend::new(config).unwrap();
//!
//!     let reply = backend
//!         .call_model(&[ChatMessage::user("Hello")], SamplingParams::default())
//!         .await
//!         .unwrap();
//!     println!("{}", reply);
//! }
//! ```

mod backend;
mod error;
mod types;

pub use backend::{
    OpenAIBackend, OpenAIConfig, DEFAULT_GEN_MODEL, DEFAULT_MAX_RETRIES, DEFAULT_OPENAI_URL,
    DEFAULT_RETRY_BACKOFF_MS, DEFAULT_TIMEOUT_SECS,
};
pub use error::{to_notely_error, GatewayFailure, OpenAIErrorCode};
pub use types::*;
