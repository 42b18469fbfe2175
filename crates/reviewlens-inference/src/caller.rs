//! Model calls with an ordered fallback chain.
//!
//! A [`ModelCaller`] holds providers in priority order (primary first). Each
//! prompt is offered to each provider at most once: a failure is classified,
//! logged, and handed to the next provider with the identical prompt and
//! timeout. The last provider's failure is returned to the caller, which
//! decides whether to skip the unit of work or abort.

use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, warn};

use reviewlens_core::{Error, FailureKind, GenerationBackend, Result};

/// A successful completion and the model that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Generation {
    pub text: String,
    pub model_used: String,
    /// Earlier providers that failed before `model_used` answered.
    pub failed_attempts: Vec<AttemptFailure>,
}

impl Generation {
    /// Whether a provider other than the primary produced the text.
    pub fn used_fallback(&self) -> bool {
        !self.failed_attempts.is_empty()
    }
}

/// One provider attempt that failed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttemptFailure {
    pub model: String,
    pub kind: FailureKind,
    pub message: String,
}

impl AttemptFailure {
    fn from_error(model: &str, err: &Error) -> Self {
        match err {
            Error::Generation {
                model,
                kind,
                message,
            } => Self {
                model: model.clone(),
                kind: *kind,
                message: message.clone(),
            },
            other => Self {
                model: model.to_string(),
                kind: FailureKind::Unknown,
                message: other.to_string(),
            },
        }
    }
}

/// Invokes generation providers in priority order.
pub struct ModelCaller {
    providers: Vec<Box<dyn GenerationBackend>>,
    timeout: Option<Duration>,
}

impl ModelCaller {
    /// Primary model with a single fallback.
    pub fn new(primary: Box<dyn GenerationBackend>, fallback: Box<dyn GenerationBackend>) -> Self {
        Self {
            providers: vec![primary, fallback],
            timeout: None,
        }
    }

    /// Arbitrary provider chain, tried front to back.
    pub fn from_providers(providers: Vec<Box<dyn GenerationBackend>>) -> Result<Self> {
        if providers.is_empty() {
            return Err(Error::Config(
                "model caller needs at least one provider".to_string(),
            ));
        }
        Ok(Self {
            providers,
            timeout: None,
        })
    }

    /// Default timeout applied to every attempt.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Model identifiers in the order they are tried.
    pub fn models(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.model_name()).collect()
    }

    /// Generate with the configured default timeout.
    pub async fn call(&self, prompt: &str) -> Result<Generation> {
        self.call_with_timeout(prompt, self.timeout).await
    }

    /// Generate, falling through the chain on failure.
    pub async fn call_with_timeout(
        &self,
        prompt: &str,
        timeout: Option<Duration>,
    ) -> Result<Generation> {
        let mut failed_attempts = Vec::new();
        let last = self.providers.len().saturating_sub(1);

        for (position, provider) in self.providers.iter().enumerate() {
            let model = provider.model_name();
            let started = Instant::now();

            match provider.generate(prompt, timeout).await {
                Ok(text) => {
                    debug!(
                        model = %model,
                        attempt = position + 1,
                        duration_ms = started.elapsed().as_millis() as u64,
                        response_len = text.len(),
                        "Model call succeeded"
                    );
                    return Ok(Generation {
                        text,
                        model_used: model.to_string(),
                        failed_attempts,
                    });
                }
                Err(err) if position < last => {
                    let failure = AttemptFailure::from_error(model, &err);
                    let next = self.providers[position + 1].model_name();
                    warn!(
                        model = %model,
                        fallback_model = %next,
                        failure_kind = %failure.kind,
                        transient = failure.kind.is_transient(),
                        error = %failure.message,
                        "Model call failed, switching to fallback"
                    );
                    failed_attempts.push(failure);
                }
                Err(err) => return Err(err),
            }
        }

        // from_providers guarantees a non-empty chain
        Err(Error::Internal("model caller has no providers".to_string()))
    }
}
