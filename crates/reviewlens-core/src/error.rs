//! Error types for reviewlens.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using reviewlens's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Classified reason a generation attempt failed.
///
/// Backends map transport and API failures onto these kinds so callers can
/// log and reason about *why* a model call failed instead of catching every
/// failure uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// HTTP 429 or provider-specific rate limiting.
    RateLimited,
    /// The request exceeded its timeout.
    Timeout,
    /// Connection refused, DNS failure, reset, or similar transport error.
    Network,
    /// The response body could not be decoded or carried no completion.
    MalformedResponse,
    /// The prompt exceeded the model's context window.
    ContextTooLong,
    /// The request was rejected as invalid (HTTP 400 without a more specific cause).
    InvalidRequest,
    /// Credentials were missing or rejected.
    Authentication,
    /// The requested model does not exist or is not available.
    ModelNotFound,
    /// The provider returned a 5xx response.
    Server,
    /// Anything that could not be classified.
    Unknown,
}

impl FailureKind {
    /// Whether a repeat of the same request could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::RateLimited | Self::Timeout | Self::Network | Self::Server
        )
    }

    /// Stable snake_case name, used as a structured log field value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RateLimited => "rate_limited",
            Self::Timeout => "timeout",
            Self::Network => "network",
            Self::MalformedResponse => "malformed_response",
            Self::ContextTooLong => "context_too_long",
            Self::InvalidRequest => "invalid_request",
            Self::Authentication => "authentication",
            Self::ModelNotFound => "model_not_found",
            Self::Server => "server",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Core error type for reviewlens operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// A model call failed
    #[error("Generation failed on {model} ({kind}): {message}")]
    Generation {
        model: String,
        kind: FailureKind,
        message: String,
    },

    /// Dataset could not be read or written
    #[error("Dataset error: {0}")]
    Dataset(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// HTTP/network request failed
    #[error("Request error: {0}")]
    Request(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Build a generation failure for `model`.
    pub fn generation(
        model: impl Into<String>,
        kind: FailureKind,
        message: impl Into<String>,
    ) -> Self {
        Error::Generation {
            model: model.into(),
            kind,
            message: message.into(),
        }
    }

    /// The failure classification, if this is a generation error.
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            Error::Generation { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<csv::Error> for Error {
    fn from(e: csv::Error) -> Self {
        Error::Dataset(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Request(e.to_string())
    }
}
