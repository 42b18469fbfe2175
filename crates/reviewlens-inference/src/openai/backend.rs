//! OpenAI-compatible generation backend implementation.

use async_trait::async_trait;
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use reviewlens_core::{defaults, Error, FailureKind, GenerationBackend, Result};

use super::error::{classify_transport, to_generation_error, OpenAIErrorCode};
use super::types::*;

/// Configuration for one OpenAI-compatible model endpoint.
#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    /// Base URL for the API endpoint.
    pub base_url: String,
    /// API key for authentication (optional for local endpoints).
    pub api_key: Option<String>,
    /// Model to use for generation.
    pub model: String,
    /// Client-wide request timeout in seconds; per-call timeouts override it.
    pub timeout_seconds: u64,
    /// Skip TLS verification (for self-signed certs in local environments).
    pub skip_tls_verify: bool,
}

impl Default for OpenAIConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::GROQ_URL.to_string(),
            api_key: None,
            model: defaults::PRIMARY_MODEL.to_string(),
            timeout_seconds: defaults::GEN_TIMEOUT_SECS,
            skip_tls_verify: false,
        }
    }
}

/// Chat-completions backend bound to a single model.
pub struct OpenAIBackend {
    client: Client,
    config: OpenAIConfig,
}

impl OpenAIBackend {
    /// Create a new backend with the given configuration.
    pub fn new(config: OpenAIConfig) -> Result<Self> {
        let mut client_builder =
            Client::builder().timeout(Duration::from_secs(config.timeout_seconds));

        if config.skip_tls_verify {
            client_builder = client_builder.danger_accept_invalid_certs(true);
        }

        let client = client_builder
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            base_url = %config.base_url,
            model = %config.model,
            "Initializing OpenAI-compatible backend"
        );

        Ok(Self { client, config })
    }

    /// Get the current configuration.
    pub fn config(&self) -> &OpenAIConfig {
        &self.config
    }

    /// Build a request with authentication if configured.
    fn build_request(&self, endpoint: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), endpoint);
        let mut req = self.client.post(&url);

        if let Some(ref api_key) = self.config.api_key {
            req = req.header("Authorization", format!("Bearer {}", api_key));
        }

        req.header("Content-Type", "application/json")
    }

    fn fail(&self, kind: FailureKind, message: impl Into<String>) -> Error {
        Error::generation(&self.config.model, kind, message)
    }
}

#[async_trait]
impl GenerationBackend for OpenAIBackend {
    async fn generate(&self, prompt: &str, timeout: Option<Duration>) -> Result<String> {
        let started = Instant::now();
        debug!(
            model = %self.config.model,
            prompt_len = prompt.len(),
            "Generating completion"
        );

        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage::user(prompt)],
            temperature: None,
            max_tokens: None,
            stream: false,
        };

        let mut builder = self.build_request("/chat/completions").json(&request);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await.map_err(|e| {
            self.fail(classify_transport(&e), format!("Request failed: {}", e))
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let (error_type, code, message) =
                match serde_json::from_str::<OpenAIErrorResponse>(&body) {
                    Ok(parsed) => (
                        parsed.error.error_type.unwrap_or_default(),
                        parsed.error.code,
                        parsed.error.message,
                    ),
                    Err(_) => (String::new(), None, body),
                };
            let code_kind = OpenAIErrorCode::from_response(status.as_u16(), &error_type, code.as_deref());
            return Err(to_generation_error(
                &self.config.model,
                code_kind,
                &format!("API returned {}: {}", status, message),
            ));
        }

        let result: ChatCompletionResponse = response.json().await.map_err(|e| {
            let kind = match classify_transport(&e) {
                FailureKind::Timeout => FailureKind::Timeout,
                _ => FailureKind::MalformedResponse,
            };
            self.fail(kind, format!("Failed to parse response: {}", e))
        })?;

        let content = result
            .first_content()
            .map(str::to_string)
            .ok_or_else(|| {
                self.fail(
                    FailureKind::MalformedResponse,
                    "Response contained no completion content",
                )
            })?;

        debug!(
            model = %self.config.model,
            response_len = content.len(),
            duration_ms = started.elapsed().as_millis() as u64,
            "Generation complete"
        );
        Ok(content)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}
