//! # notely-inference
//!
//! LLM gateway and note assistant for notely.
//!
//! This crate provides:
//! - An OpenAI-compatible [`GenerationBackend`] with timeouts and retries
//! - Prompt templates for extraction and translation
//! - Strict parsing of structured-note output, with an unstructured fallback
//! - [`NoteAssistant`], the entry point the HTTP layer uses
//!
//! # Feature Flags
//!
//! - `mock`: Expose [`mock::MockGenerationBackend`] to dependent crates' tests
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use notely_inference::{NoteAssistant, OpenAIBackend, DEFAULT_LANGUAGE};
//!
//! #[tokio::main]
//! async fn main() {
//!     let backend = OpenAIBackend::from_env().unwrap();
//!     let assistant = NoteAssistant::new(Arc::new(backend));
//!     let draft = assistant
//!         .draft_note("Badminton tmr 5pm @polyu", DEFAULT_LANGUAGE)
//!         .await
//!         .unwrap();
//!     println!("{}: {}", draft.title, draft.content);
//! }
//! ```

pub mod assistant;
pub mod extraction;
pub mod openai;
pub mod prompts;

// Mock generation backend for testing
#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export core types
pub use notely_core::*;

pub use assistant::NoteAssistant;
pub use extraction::{parse_structured_note, DraftNote, StructuredNote, FALLBACK_TITLE, MAX_TAGS};
pub use openai::{OpenAIBackend, OpenAIConfig};
pub use prompts::DEFAULT_LANGUAGE;
