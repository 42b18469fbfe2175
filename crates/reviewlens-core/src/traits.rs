//! Core trait definitions for reviewlens.
//!
//! These traits define the seams between the report pipeline and the
//! services it depends on, so tests can substitute scripted backends.

use std::time::Duration;

use async_trait::async_trait;

use crate::Result;

// =============================================================================
// GENERATION TRAITS
// =============================================================================

/// Backend for text generation against a single model.
///
/// Implementations must classify failures as [`crate::Error::Generation`]
/// so that callers can see why an attempt failed.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Generate a completion for `prompt`, giving up after `timeout` when set.
    async fn generate(&self, prompt: &str, timeout: Option<Duration>) -> Result<String>;

    /// Model identifier this backend sends requests to.
    fn model_name(&self) -> &str;
}
