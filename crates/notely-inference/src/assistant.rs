//! Note-taking operations built on a generation backend.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use notely_core::{Error, GenerationBackend, Result, SamplingParams};

use crate::extraction::DraftNote;
use crate::prompts::{extraction_messages, translation_messages};

/// Extraction and translation on top of any [`GenerationBackend`].
///
/// Cheap to clone; clones share the backend.
#[derive(Clone)]
pub struct NoteAssistant {
    backend: Arc<dyn GenerationBackend>,
    params: SamplingParams,
}

impl NoteAssistant {
    /// Create an assistant with default sampling parameters.
    pub fn new(backend: Arc<dyn GenerationBackend>) -> Self {
        Self {
            backend,
            params: SamplingParams::default(),
        }
    }

    /// Override the sampling parameters used for every call.
    pub fn with_sampling(mut self, params: SamplingParams) -> Self {
        self.params = params;
        self
    }

    /// Name of the model behind this assistant.
    pub fn model_name(&self) -> &str {
        self.backend.model_name()
    }

    /// Ask the model to structure `text` and return its raw reply.
    pub async fn extract_structured_notes(&self, text: &str, language: &str) -> Result<String> {
        let start = Instant::now();
        let messages = extraction_messages(text, language);
        let raw = self.backend.call_model(&messages, self.params).await?;

        debug!(
            subsystem = "inference",
            component = "assistant",
            op = "extract",
            model = %self.model_name(),
            language = %language,
            input_len = text.len(),
            response_len = raw.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Extraction complete"
        );
        Ok(raw)
    }

    /// Translate `text` into `target_language`.
    ///
    /// Returns the trimmed translation. An empty reply is an error.
    pub async fn translate(&self, text: &str, target_language: &str) -> Result<String> {
        let start = Instant::now();
        let messages = translation_messages(text, target_language);
        let raw = self.backend.call_model(&messages, self.params).await?;

        let translated = raw.trim();
        if translated.is_empty() {
            return Err(Error::Inference(
                "Model returned an empty translation".to_string(),
            ));
        }

        debug!(
            subsystem = "inference",
            component = "assistant",
            op = "translate",
            model = %self.model_name(),
            target_language = %target_language,
            input_len = text.len(),
            response_len = translated.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Translation complete"
        );
        Ok(translated.to_string())
    }

    /// Extract a storable note from free text.
    pub async fn draft_note(&self, text: &str, language: &str) -> Result<DraftNote> {
        let raw = self.extract_structured_notes(text, language).await?;
        let draft = DraftNote::from_model_output(&raw)?;

        info!(
            subsystem = "inference",
            component = "assistant",
            op = "draft_note",
            structured = draft.structured,
            tag_count = draft.tags.len(),
            "Drafted note from text"
        );
        Ok(draft)
    }
}
