//! Core traits for notely abstractions.
//!
//! These traits define the interfaces that concrete implementations
//! must satisfy, enabling pluggable backends and testability.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::*;

// =============================================================================
// NOTE REPOSITORY TRAITS
// =============================================================================

/// Repository for note CRUD and search operations.
///
/// Every mutating call is atomic: it either commits fully or leaves the
/// stored state unchanged.
#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// All notes, most recently updated first.
    async fn list_all(&self) -> Result<Vec<Note>>;

    /// Fetch a note by id.
    async fn fetch(&self, id: i64) -> Result<Note>;

    /// Insert a new note and return it with its assigned id and timestamps.
    async fn insert(&self, req: CreateNoteRequest) -> Result<Note>;

    /// Apply a partial update and refresh `updated_at`.
    async fn update(&self, id: i64, req: UpdateNoteRequest) -> Result<Note>;

    /// Permanently delete a note.
    async fn delete(&self, id: i64) -> Result<()>;

    /// Case-insensitive substring search over title and content.
    async fn search(&self, query: &str) -> Result<Vec<Note>>;

    /// Number of stored notes.
    async fn count(&self) -> Result<i64>;
}

// =============================================================================
// INFERENCE TRAITS
// =============================================================================

/// Backend for chat-completion text generation.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Send `messages` to the model and return the raw text of its reply.
    async fn call_model(&self, messages: &[ChatMessage], params: SamplingParams)
        -> Result<String>;

    /// Get the model name being used.
    fn model_name(&self) -> &str;
}
