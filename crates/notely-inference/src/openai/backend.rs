//! OpenAI-compatible inference backend implementation.

use async_trait::async_trait;
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use notely_core::{ChatMessage, Error, GenerationBackend, Result, SamplingParams};

use super::error::{GatewayFailure, OpenAIErrorCode};
use super::types::*;

/// Default OpenAI-compatible API endpoint (GitHub Models).
pub const DEFAULT_OPENAI_URL: &str = "https://models.github.ai/inference";

/// Default generation model.
pub const DEFAULT_GEN_MODEL: &str = "openai/gpt-4.1-mini";

/// Default timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Default number of retries after the first attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// Default delay before the first retry, in milliseconds.
pub const DEFAULT_RETRY_BACKOFF_MS: u64 = 500;

/// Upper bound on a single backoff delay.
const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Configuration for OpenAI-compatible backend.
#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    /// Base URL for the API endpoint.
    pub base_url: String,
    /// API key for authentication. Calls fail fast when unset.
    pub api_key: Option<String>,
    /// Model to use for generation.
    pub gen_model: String,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
    /// Retries after the first attempt for transient failures.
    pub max_retries: u32,
    /// Delay before the first retry; doubles on each subsequent retry.
    pub retry_backoff_ms: u64,
}

impl Default for OpenAIConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_OPENAI_URL.to_string(),
            api_key: None,
            gen_model: DEFAULT_GEN_MODEL.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_backoff_ms: DEFAULT_RETRY_BACKOFF_MS,
        }
    }
}

impl OpenAIConfig {
    /// Read configuration from environment variables.
    ///
    /// The key comes from `OPENAI_API_KEY`, falling back to `GITHUB_TOKEN`.
    /// Blank values count as unset.
    pub fn from_env() -> Self {
        let non_blank = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());

        Self {
            base_url: non_blank("OPENAI_BASE_URL").unwrap_or_else(|| DEFAULT_OPENAI_URL.to_string()),
            api_key: non_blank("OPENAI_API_KEY").or_else(|| non_blank("GITHUB_TOKEN")),
            gen_model: non_blank("OPENAI_GEN_MODEL")
                .unwrap_or_else(|| DEFAULT_GEN_MODEL.to_string()),
            timeout_seconds: non_blank("OPENAI_TIMEOUT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
            max_retries: non_blank("OPENAI_MAX_RETRIES")
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_MAX_RETRIES),
            retry_backoff_ms: non_blank("OPENAI_RETRY_BACKOFF_MS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_RETRY_BACKOFF_MS),
        }
    }

    /// Delay before retry number `attempt` (zero-based).
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let factor = 1u64 << attempt.min(16);
        Duration::from_millis(self.retry_backoff_ms.saturating_mul(factor)).min(MAX_BACKOFF)
    }
}

/// OpenAI-compatible inference backend.
pub struct OpenAIBackend {
    client: Client,
    config: OpenAIConfig,
}

impl OpenAIBackend {
    /// Create a new OpenAI backend with the given configuration.
    pub fn new(config: OpenAIConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            subsystem = "inference",
            component = "openai",
            base_url = %config.base_url,
            model = %config.gen_model,
            timeout_secs = config.timeout_seconds,
            max_retries = config.max_retries,
            has_api_key = config.api_key.is_some(),
            "Initializing OpenAI backend"
        );
        if config.api_key.is_none() {
            warn!(
                subsystem = "inference",
                component = "openai",
                "No API key configured; generate and translate will be unavailable"
            );
        }

        Ok(Self { client, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(OpenAIConfig::from_env())
    }

    /// Get the current configuration.
    pub fn config(&self) -> &OpenAIConfig {
        &self.config
    }

    /// Build an authenticated POST request.
    fn build_request(&self, endpoint: &str, api_key: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), endpoint);
        self.client
            .post(&url)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
    }

    /// One round trip to the provider, without retries.
    async fn send_once(
        &self,
        api_key: &str,
        request: &ChatCompletionRequest<'_>,
    ) -> std::result::Result<String, GatewayFailure> {
        let response = self
            .build_request("/chat/completions", api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let (message, error_type) = match serde_json::from_str::<OpenAIErrorResponse>(&body) {
                Ok(parsed) => (
                    parsed.error.message,
                    parsed.error.error_type.unwrap_or_default(),
                ),
                Err(_) if !body.trim().is_empty() => (body, String::new()),
                Err(_) => (
                    status.canonical_reason().unwrap_or("Unknown error").to_string(),
                    String::new(),
                ),
            };
            return Err(GatewayFailure::Status {
                status: status.as_u16(),
                code: OpenAIErrorCode::from_response(status.as_u16(), &error_type),
                message,
            });
        }

        let body = response.text().await?;
        let result: ChatCompletionResponse = serde_json::from_str(&body)
            .map_err(|e| GatewayFailure::Malformed(e.to_string()))?;

        let choice = result
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| GatewayFailure::Malformed("response contained no choices".to_string()))?;

        Ok(choice.message.content.unwrap_or_default())
    }
}

#[async_trait]
impl GenerationBackend for OpenAIBackend {
    async fn call_model(&self, messages: &[ChatMessage], params: SamplingParams) -> Result<String> {
        let api_key = self.config.api_key.as_deref().ok_or_else(|| {
            Error::GatewayUnavailable(
                "No model API key configured (set OPENAI_API_KEY or GITHUB_TOKEN)".to_string(),
            )
        })?;

        let request = ChatCompletionRequest {
            model: &self.config.gen_model,
            messages,
            temperature: Some(params.temperature),
            top_p: Some(params.top_p),
            max_tokens: None,
            stream: false,
        };

        let start = Instant::now();
        let mut attempt: u32 = 0;
        loop {
            match self.send_once(api_key, &request).await {
                Ok(content) => {
                    debug!(
                        subsystem = "inference",
                        component = "openai",
                        op = "call_model",
                        model = %self.config.gen_model,
                        attempts = attempt + 1,
                        response_len = content.len(),
                        duration_ms = start.elapsed().as_millis() as u64,
                        "Model call complete"
                    );
                    return Ok(content);
                }
                Err(failure) if failure.is_retryable() && attempt < self.config.max_retries => {
                    let delay = self.config.backoff_delay(attempt);
                    warn!(
                        subsystem = "inference",
                        component = "openai",
                        op = "call_model",
                        model = %self.config.gen_model,
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        error = %failure,
                        "Transient model failure, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(failure) => {
                    let err = failure.into_error(attempt + 1);
                    warn!(
                        subsystem = "inference",
                        component = "openai",
                        op = "call_model",
                        model = %self.config.gen_model,
                        attempts = attempt + 1,
                        duration_ms = start.elapsed().as_millis() as u64,
                        error = %err,
                        "Model call failed"
                    );
                    return Err(err);
                }
            }
        }
    }

    fn model_name(&self) -> &str {
        &self.config.gen_model
    }
}
