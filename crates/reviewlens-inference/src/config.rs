//! Generation configuration.
//!
//! Configuration is read from environment variables (a `.env` file is loaded
//! by the binary before this runs):
//!
//! | Variable | Default |
//! |----------|---------|
//! | `GROQ_API_KEY` | required |
//! | `GROQ_BASE_URL` | `https://api.groq.com/openai/v1` |
//! | `REVIEWLENS_PRIMARY_MODEL` | `meta-llama/llama-4-maverick-17b-128e-instruct` |
//! | `REVIEWLENS_FALLBACK_MODEL` | `moonshotai/kimi-k2-instruct` |
//! | `REVIEWLENS_TIMEOUT_SECS` | `120` |
//! | `REVIEWLENS_SKIP_TLS_VERIFY` | `false` |

use std::env;
use std::time::Duration;

use thiserror::Error;
use tracing::info;

use reviewlens_core::{defaults, Error};

use crate::caller::ModelCaller;
use crate::openai::{OpenAIBackend, OpenAIConfig};

pub const API_KEY_VAR: &str = "GROQ_API_KEY";
pub const BASE_URL_VAR: &str = "GROQ_BASE_URL";
pub const PRIMARY_MODEL_VAR: &str = "REVIEWLENS_PRIMARY_MODEL";
pub const FALLBACK_MODEL_VAR: &str = "REVIEWLENS_FALLBACK_MODEL";
pub const TIMEOUT_VAR: &str = "REVIEWLENS_TIMEOUT_SECS";
pub const SKIP_TLS_VAR: &str = "REVIEWLENS_SKIP_TLS_VERIFY";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    MissingApiKey(&'static str),

    #[error("Invalid value for {var}: {value}")]
    InvalidValue { var: &'static str, value: String },

    #[error("Validation error: {0}")]
    Validation(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e.to_string())
    }
}

/// Settings for the primary/fallback model pair.
#[derive(Debug, Clone)]
pub struct InferenceConfig {
    pub base_url: String,
    pub api_key: String,
    pub primary_model: String,
    pub fallback_model: String,
    pub timeout_secs: u64,
    pub skip_tls_verify: bool,
}

impl InferenceConfig {
    /// Config with defaults for everything but the key.
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            base_url: defaults::GROQ_URL.to_string(),
            api_key: api_key.into(),
            primary_model: defaults::PRIMARY_MODEL.to_string(),
            fallback_model: defaults::FALLBACK_MODEL.to_string(),
            timeout_secs: defaults::GEN_TIMEOUT_SECS,
            skip_tls_verify: false,
        }
    }

    /// Load from process environment variables.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load using an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let api_key = get(API_KEY_VAR).ok_or(ConfigError::MissingApiKey(API_KEY_VAR))?;
        let mut config = Self::with_api_key(api_key.trim());

        if let Some(url) = get(BASE_URL_VAR) {
            config.base_url = url;
        }
        if let Some(model) = get(PRIMARY_MODEL_VAR) {
            config.primary_model = model;
        }
        if let Some(model) = get(FALLBACK_MODEL_VAR) {
            config.fallback_model = model;
        }
        if let Some(raw) = get(TIMEOUT_VAR) {
            config.timeout_secs = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                var: TIMEOUT_VAR,
                value: raw.clone(),
            })?;
        }
        if let Some(raw) = get(SKIP_TLS_VAR) {
            config.skip_tls_verify = matches!(raw.trim(), "1" | "true" | "yes");
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ConfigError::Validation(format!(
                "base_url must start with http:// or https://, got: {}",
                self.base_url
            )));
        }
        if self.primary_model.is_empty() || self.fallback_model.is_empty() {
            return Err(ConfigError::Validation(
                "model identifiers cannot be empty".to_string(),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "timeout must be at least one second".to_string(),
            ));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    fn backend_config(&self, model: &str) -> OpenAIConfig {
        OpenAIConfig {
            base_url: self.base_url.clone(),
            api_key: Some(self.api_key.clone()),
            model: model.to_string(),
            timeout_seconds: self.timeout_secs,
            skip_tls_verify: self.skip_tls_verify,
        }
    }

    /// Build the primary -> fallback caller.
    pub fn build_caller(&self) -> reviewlens_core::Result<ModelCaller> {
        self.validate()?;
        let primary = OpenAIBackend::new(self.backend_config(&self.primary_model))?;
        let fallback = OpenAIBackend::new(self.backend_config(&self.fallback_model))?;

        info!(
            primary_model = %self.primary_model,
            fallback_model = %self.fallback_model,
            timeout_secs = self.timeout_secs,
            "Model caller configured"
        );

        Ok(ModelCaller::new(Box::new(primary), Box::new(fallback)).with_timeout(self.timeout()))
    }
}
