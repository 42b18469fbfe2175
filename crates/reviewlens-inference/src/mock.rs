//! Scripted generation backend for deterministic testing.
//!
//! ## Usage
//!
//! ```rust
//! use reviewlens_core::{FailureKind, GenerationBackend};
//! use reviewlens_inference::mock::ScriptedBackend;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let backend = ScriptedBackend::new("primary").always_failing(FailureKind::RateLimited);
//! assert!(backend.generate("prompt", None).await.is_err());
//! assert_eq!(backend.call_count(), 1);
//! # }
//! ```

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use reviewlens_core::{Error, FailureKind, GenerationBackend, Result};

/// What the backend returns when no scripted reply is queued.
#[derive(Debug, Clone)]
enum Mode {
    Fixed(String),
    Echo,
    Fail(FailureKind),
}

/// A logged `generate` call.
#[derive(Debug, Clone)]
pub struct MockCall {
    pub prompt: String,
    pub timeout: Option<Duration>,
}

/// Mock backend whose replies are fully scripted.
///
/// Clones share the call log and reply queue, so a test can keep a handle
/// after boxing one into a [`crate::ModelCaller`].
#[derive(Clone)]
pub struct ScriptedBackend {
    model: String,
    mode: Mode,
    fail_when_contains: Vec<(String, FailureKind)>,
    script: Arc<Mutex<VecDeque<Result<String>>>>,
    call_log: Arc<Mutex<Vec<MockCall>>>,
}

impl ScriptedBackend {
    /// Backend that answers every prompt with "Mock response".
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            mode: Mode::Fixed("Mock response".to_string()),
            fail_when_contains: Vec::new(),
            script: Arc::new(Mutex::new(VecDeque::new())),
            call_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Answer every prompt with `response`.
    pub fn with_response(mut self, response: impl Into<String>) -> Self {
        self.mode = Mode::Fixed(response.into());
        self
    }

    /// Answer every prompt with `"<model>: <prompt>"`.
    pub fn echoing(mut self) -> Self {
        self.mode = Mode::Echo;
        self
    }

    /// Fail every call with `kind`.
    pub fn always_failing(mut self, kind: FailureKind) -> Self {
        self.mode = Mode::Fail(kind);
        self
    }

    /// Fail calls whose prompt contains `needle`.
    pub fn failing_when_contains(mut self, needle: impl Into<String>, kind: FailureKind) -> Self {
        self.fail_when_contains.push((needle.into(), kind));
        self
    }

    /// Queue a one-shot reply consumed before the default mode applies.
    pub fn push_reply(&self, reply: Result<String>) {
        self.script.lock().unwrap().push_back(reply);
    }

    pub fn call_count(&self) -> usize {
        self.call_log.lock().unwrap().len()
    }

    pub fn calls(&self) -> Vec<MockCall> {
        self.call_log.lock().unwrap().clone()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.prompt).collect()
    }

    pub fn timeouts(&self) -> Vec<Option<Duration>> {
        self.calls().into_iter().map(|c| c.timeout).collect()
    }

    pub fn clear_calls(&self) {
        self.call_log.lock().unwrap().clear()
    }

    fn failure(&self, kind: FailureKind) -> Error {
        Error::generation(&self.model, kind, "scripted failure")
    }
}

#[async_trait]
impl GenerationBackend for ScriptedBackend {
    async fn generate(&self, prompt: &str, timeout: Option<Duration>) -> Result<String> {
        self.call_log.lock().unwrap().push(MockCall {
            prompt: prompt.to_string(),
            timeout,
        });

        if let Some(reply) = self.script.lock().unwrap().pop_front() {
            return reply;
        }

        if let Some((_, kind)) = self
            .fail_when_contains
            .iter()
            .find(|(needle, _)| prompt.contains(needle.as_str()))
        {
            return Err(self.failure(*kind));
        }

        match &self.mode {
            Mode::Fixed(text) => Ok(text.clone()),
            Mode::Echo => Ok(format!("{}: {}", self.model, prompt)),
            Mode::Fail(kind) => Err(self.failure(*kind)),
        }
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_default_response() {
        let backend = ScriptedBackend::new("m");
        assert_eq!(backend.generate("x", None).await.unwrap(), "Mock response");
        assert_eq!(backend.model_name(), "m");
    }

    #[tokio::test]
    async fn test_echo_mode() {
        let backend = ScriptedBackend::new("m").echoing();
        assert_eq!(backend.generate("hello", None).await.unwrap(), "m: hello");
    }

    #[tokio::test]
    async fn test_script_consumed_before_mode() {
        let backend = ScriptedBackend::new("m").with_response("steady");
        backend.push_reply(Ok("first".to_string()));
        backend.push_reply(Err(Error::generation("m", FailureKind::Timeout, "late")));

        assert_eq!(backend.generate("a", None).await.unwrap(), "first");
        assert_eq!(
            backend.generate("b", None).await.unwrap_err().failure_kind(),
            Some(FailureKind::Timeout)
        );
        assert_eq!(backend.generate("c", None).await.unwrap(), "steady");
        assert_eq!(backend.prompts(), vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_fail_when_contains() {
        let backend =
            ScriptedBackend::new("m").failing_when_contains("poison", FailureKind::Server);
        assert!(backend.generate("fine", None).await.is_ok());
        let err = backend.generate("a poison pill", None).await.unwrap_err();
        assert_eq!(err.failure_kind(), Some(FailureKind::Server));
    }

    #[tokio::test]
    async fn test_clones_share_log() {
        let backend = ScriptedBackend::new("m");
        let handle = backend.clone();
        backend.generate("x", Some(Duration::from_secs(3))).await.unwrap();
        assert_eq!(handle.call_count(), 1);
        assert_eq!(handle.timeouts(), vec![Some(Duration::from_secs(3))]);
        handle.clear_calls();
        assert_eq!(backend.call_count(), 0);
    }
}
