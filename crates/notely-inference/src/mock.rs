//! Mock generation backend for deterministic testing.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use notely_inference::{mock::MockGenerationBackend, NoteAssistant};
//!
//! #[tokio::test]
//! async fn test_with_mock_backend() {
//!     let backend = MockGenerationBackend::new().with_fixed_response("Bonjour");
//!     let assistant = NoteAssistant::new(Arc::new(backend.clone()));
//!
//!     assert_eq!(assistant.translate("Hello", "French").await.unwrap(), "Bonjour");
//!     assert_eq!(backend.call_count(), 1);
//! }
//! ```

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use notely_core::{ChatMessage, Error, GenerationBackend, Result, SamplingParams};

/// Failure modes the mock can simulate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockFailure {
    /// Behave like a provider with no credential or no connectivity.
    Unavailable,
    /// Behave like a provider that answered with an error.
    Inference,
}

impl MockFailure {
    fn to_error(self) -> Error {
        match self {
            Self::Unavailable => Error::GatewayUnavailable("Mock gateway unavailable".to_string()),
            Self::Inference => Error::Inference("Mock inference failure".to_string()),
        }
    }
}

/// A call received by the mock.
#[derive(Debug, Clone)]
pub struct MockCall {
    pub messages: Vec<ChatMessage>,
    pub params: SamplingParams,
}

#[derive(Debug, Clone)]
struct MockConfig {
    default_response: String,
    response_mapping: HashMap<String, String>,
    failure: Option<MockFailure>,
    model: String,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            default_response: "Mock response".to_string(),
            response_mapping: HashMap::new(),
            failure: None,
            model: "mock-model".to_string(),
        }
    }
}

/// Mock generation backend for testing.
///
/// Reply resolution order: queued replies, then the mapping keyed by the
/// last user message, then the default reply.
#[derive(Clone, Default)]
pub struct MockGenerationBackend {
    config: Arc<MockConfig>,
    queued: Arc<Mutex<VecDeque<String>>>,
    call_log: Arc<Mutex<Vec<MockCall>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockGenerationBackend {
    /// Create a new mock backend with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the reply used when nothing more specific matches.
    pub fn with_fixed_response(mut self, response: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.config).default_response = response.into();
        self
    }

    /// Reply with `output` whenever the last user message equals `input`.
    pub fn with_response_mapping(
        mut self,
        input: impl Into<String>,
        output: impl Into<String>,
    ) -> Self {
        Arc::make_mut(&mut self.config)
            .response_mapping
            .insert(input.into(), output.into());
        self
    }

    /// Queue one-shot replies, consumed in order before any other rule.
    pub fn with_queued_responses<I, S>(self, responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        lock(&self.queued).extend(responses.into_iter().map(Into::into));
        self
    }

    /// Fail every call with `failure`.
    pub fn with_failure(mut self, failure: MockFailure) -> Self {
        Arc::make_mut(&mut self.config).failure = Some(failure);
        self
    }

    /// Fail every call as if the provider were unreachable.
    pub fn unavailable(self) -> Self {
        self.with_failure(MockFailure::Unavailable)
    }

    /// Set the reported model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.config).model = model.into();
        self
    }

    /// Get all logged calls for assertion.
    pub fn calls(&self) -> Vec<MockCall> {
        lock(&self.call_log).clone()
    }

    /// Number of calls received, including failed ones.
    pub fn call_count(&self) -> usize {
        lock(&self.call_log).len()
    }

    /// Clear the call log.
    pub fn clear_calls(&self) {
        lock(&self.call_log).clear()
    }

    fn resolve(&self, messages: &[ChatMessage]) -> String {
        if let Some(reply) = lock(&self.queued).pop_front() {
            return reply;
        }
        let last_user = messages
            .iter()
            .rev()
            .find(|m| m.role == "user")
            .map(|m| m.content.as_str());
        if let Some(reply) = last_user.and_then(|input| self.config.response_mapping.get(input)) {
            return reply.clone();
        }
        self.config.default_response.clone()
    }
}

#[async_trait]
impl GenerationBackend for MockGenerationBackend {
    async fn call_model(&self, messages: &[ChatMessage], params: SamplingParams) -> Result<String> {
        lock(&self.call_log).push(MockCall {
            messages: messages.to_vec(),
            params,
        });

        if let Some(failure) = self.config.failure {
            return Err(failure.to_error());
        }
        Ok(self.resolve(messages))
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}
