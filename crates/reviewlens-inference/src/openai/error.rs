//! OpenAI-compatible error classification.

use reviewlens_core::{Error, FailureKind};

/// Error codes reported by OpenAI-compatible APIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenAIErrorCode {
    /// Invalid authentication credentials.
    AuthenticationError,
    /// Rate limit exceeded.
    RateLimitExceeded,
    /// Model not found or not available.
    ModelNotFound,
    /// Request too large.
    ContextLengthExceeded,
    /// Request rejected as malformed.
    BadRequest,
    /// Server error.
    ServerError,
    /// Unknown error.
    Unknown,
}

impl OpenAIErrorCode {
    /// Determine error code from HTTP status and the error body's type/code.
    pub fn from_response(status: u16, error_type: &str, code: Option<&str>) -> Self {
        let code = code.unwrap_or("");
        let mentions = |needle: &str| error_type.contains(needle) || code.contains(needle);

        match status {
            401 | 403 => Self::AuthenticationError,
            429 => Self::RateLimitExceeded,
            404 => Self::ModelNotFound,
            413 => Self::ContextLengthExceeded,
            _ if mentions("model_not_found") => Self::ModelNotFound,
            _ if mentions("rate_limit") => Self::RateLimitExceeded,
            400 if mentions("context_length") => Self::ContextLengthExceeded,
            400 | 422 => Self::BadRequest,
            500..=599 => Self::ServerError,
            _ => Self::Unknown,
        }
    }

    /// Provider-neutral classification.
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            Self::AuthenticationError => FailureKind::Authentication,
            Self::RateLimitExceeded => FailureKind::RateLimited,
            Self::ModelNotFound => FailureKind::ModelNotFound,
            Self::ContextLengthExceeded => FailureKind::ContextTooLong,
            Self::BadRequest => FailureKind::InvalidRequest,
            Self::ServerError => FailureKind::Server,
            Self::Unknown => FailureKind::Unknown,
        }
    }
}

/// Convert an API error response into a reviewlens generation error.
pub fn to_generation_error(model: &str, code: OpenAIErrorCode, message: &str) -> Error {
    Error::generation(model, code.failure_kind(), message)
}

/// Classify a transport-level failure from reqwest.
pub fn classify_transport(err: &reqwest::Error) -> FailureKind {
    if err.is_timeout() {
        FailureKind::Timeout
    } else if err.is_decode() {
        FailureKind::MalformedResponse
    } else if err.is_builder() {
        FailureKind::InvalidRequest
    } else {
        FailureKind::Network
    }
}
