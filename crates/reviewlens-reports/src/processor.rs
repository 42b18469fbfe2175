//! Resumable per-unit report processing.
//!
//! A unit is `Pending` until its artifact exists and `Done` afterwards.
//! Done units are skipped without a model call; pending units are generated
//! and persisted, and only a durable write moves them to done. A crash
//! between the call and the write leaves the unit pending, so it is redone
//! on the next run.

use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, info, warn};

use reviewlens_core::{defaults, Result};
use reviewlens_inference::{Generation, ModelCaller};

use crate::artifact::{ArtifactKey, CompletionStore};
use crate::kinds::topic_prompt;

/// What happened to one unit of work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TaskOutcome {
    /// Artifact already existed.
    Skipped,
    /// Artifact written from `calls` successful model calls.
    Completed {
        calls: usize,
        failed_calls: usize,
        fallback_calls: usize,
    },
    /// Every model call failed; nothing was written.
    Abandoned { failed_calls: usize },
}

/// Runs units of report work against a store, pacing model calls.
pub struct ResumableProcessor<'a, S: CompletionStore> {
    caller: &'a ModelCaller,
    store: &'a S,
    pacing: Duration,
}

impl<'a, S: CompletionStore> ResumableProcessor<'a, S> {
    pub fn new(caller: &'a ModelCaller, store: &'a S) -> Self {
        Self {
            caller,
            store,
            pacing: Duration::from_millis(defaults::PACING_MS),
        }
    }

    /// Delay after each successful model call.
    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    async fn generate(&self, key: &ArtifactKey, prompt: &str) -> Result<Generation> {
        let started = Instant::now();
        let generation = self.caller.call(prompt).await?;
        info!(
            report_kind = %key.kind(),
            chunk_index = key.number(),
            model = %generation.model_used,
            duration_ms = started.elapsed().as_millis() as u64,
            "Generated"
        );
        if !self.pacing.is_zero() {
            tokio::time::sleep(self.pacing).await;
        }
        Ok(generation)
    }

    fn already_done(&self, key: &ArtifactKey) -> Result<bool> {
        let done = self.store.is_complete(key)?;
        if done {
            debug!(
                report_kind = %key.kind(),
                chunk_index = key.number(),
                artifact = %key.file_name(),
                "Skipping, already done"
            );
        }
        Ok(done)
    }

    /// One prompt, one artifact. A model failure is returned to the caller.
    pub async fn process_chunk(&self, key: &ArtifactKey, prompt: &str) -> Result<TaskOutcome> {
        if self.already_done(key)? {
            return Ok(TaskOutcome::Skipped);
        }

        let generation = self.generate(key, prompt).await?;
        self.store.complete(key, &generation.text)?;

        Ok(TaskOutcome::Completed {
            calls: 1,
            failed_calls: 0,
            fallback_calls: usize::from(generation.used_fallback()),
        })
    }

    /// One prompt per sub-chunk, joined into a single topic artifact.
    ///
    /// Failed sub-chunks are logged and left out. If all of them fail, no
    /// artifact is written and the topic stays pending.
    pub async fn process_topic(
        &self,
        key: &ArtifactKey,
        topic: &str,
        sub_chunks: &[String],
    ) -> Result<TaskOutcome> {
        if self.already_done(key)? {
            return Ok(TaskOutcome::Skipped);
        }

        let mut insights = Vec::with_capacity(sub_chunks.len());
        let mut failed_calls = 0;
        let mut fallback_calls = 0;

        for (index, reviews_text) in sub_chunks.iter().enumerate() {
            match self.generate(key, &topic_prompt(topic, reviews_text)).await {
                Ok(generation) => {
                    if generation.used_fallback() {
                        fallback_calls += 1;
                    }
                    insights.push(generation.text);
                }
                Err(e) => {
                    failed_calls += 1;
                    warn!(
                        report_kind = %key.kind(),
                        topic,
                        chunk_index = index + 1,
                        failure_kind = e.failure_kind().map(|k| k.as_str()).unwrap_or("other"),
                        error = %e,
                        "Topic sub-chunk failed, omitting"
                    );
                }
            }
        }

        if insights.is_empty() && failed_calls > 0 {
            warn!(
                report_kind = %key.kind(),
                topic,
                artifact = %key.file_name(),
                "Every sub-chunk failed, topic left pending"
            );
            return Ok(TaskOutcome::Abandoned { failed_calls });
        }

        let calls = insights.len();
        self.store
            .complete(key, &insights.join(defaults::INSIGHT_JOIN_SEPARATOR))?;

        Ok(TaskOutcome::Completed {
            calls,
            failed_calls,
            fallback_calls,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reviewlens_core::{Error, FailureKind};
    use reviewlens_inference::mock::ScriptedBackend;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory store for exercising the processor without a filesystem.
    #[derive(Default)]
    struct MemoryStore {
        bodies: Mutex<HashMap<ArtifactKey, String>>,
    }

    impl CompletionStore for MemoryStore {
        fn is_complete(&self, key: &ArtifactKey) -> Result<bool> {
            Ok(self.bodies.lock().unwrap().contains_key(key))
        }

        fn complete(&self, key: &ArtifactKey, body: &str) -> Result<()> {
            self.bodies
                .lock()
                .unwrap()
                .insert(key.clone(), body.to_string());
            Ok(())
        }

        fn load(&self, key: &ArtifactKey) -> Result<Option<String>> {
            Ok(self.bodies.lock().unwrap().get(key).cloned())
        }
    }

    fn caller(primary: &ScriptedBackend, fallback: &ScriptedBackend) -> ModelCaller {
        ModelCaller::new(Box::new(primary.clone()), Box::new(fallback.clone()))
    }

    fn topic_key() -> ArtifactKey {
        ArtifactKey::Topic {
            number: 1,
            label: "4".to_string(),
        }
    }

    #[tokio::test]
    async fn test_chunk_completes_then_skips() {
        let primary = ScriptedBackend::new("p").with_response("summary");
        let fallback = ScriptedBackend::new("f");
        let caller = caller(&primary, &fallback);
        let store = MemoryStore::default();
        let processor = ResumableProcessor::new(&caller, &store).with_pacing(Duration::ZERO);
        let key = ArtifactKey::ExecutiveChunk { number: 1 };

        let first = processor.process_chunk(&key, "prompt").await.unwrap();
        let second = processor.process_chunk(&key, "prompt").await.unwrap();

        assert_eq!(
            first,
            TaskOutcome::Completed {
                calls: 1,
                failed_calls: 0,
                fallback_calls: 0
            }
        );
        assert_eq!(second, TaskOutcome::Skipped);
        assert_eq!(primary.call_count(), 1);
        assert_eq!(store.load(&key).unwrap().as_deref(), Some("summary"));
    }

    #[tokio::test]
    async fn test_chunk_failure_leaves_pending() {
        let primary = ScriptedBackend::new("p").always_failing(FailureKind::RateLimited);
        let fallback = ScriptedBackend::new("f").always_failing(FailureKind::Timeout);
        let caller = caller(&primary, &fallback);
        let store = MemoryStore::default();
        let processor = ResumableProcessor::new(&caller, &store).with_pacing(Duration::ZERO);
        let key = ArtifactKey::RecommendationChunk { number: 2 };

        let err = processor.process_chunk(&key, "prompt").await.unwrap_err();

        assert!(matches!(err, Error::Generation { .. }));
        assert!(!store.is_complete(&key).unwrap());
    }

    #[tokio::test]
    async fn test_chunk_counts_fallback() {
        let primary = ScriptedBackend::new("p").always_failing(FailureKind::Server);
        let fallback = ScriptedBackend::new("f").with_response("from fallback");
        let caller = caller(&primary, &fallback);
        let store = MemoryStore::default();
        let processor = ResumableProcessor::new(&caller, &store).with_pacing(Duration::ZERO);
        let key = ArtifactKey::ExecutiveChunk { number: 1 };

        let outcome = processor.process_chunk(&key, "prompt").await.unwrap();

        assert_eq!(
            outcome,
            TaskOutcome::Completed {
                calls: 1,
                failed_calls: 0,
                fallback_calls: 1
            }
        );
        assert_eq!(store.load(&key).unwrap().as_deref(), Some("from fallback"));
    }

    #[tokio::test]
    async fn test_topic_omits_failed_sub_chunk() {
        let primary = ScriptedBackend::new("p")
            .echoing()
            .failing_when_contains("broken", FailureKind::ContextTooLong);
        let fallback = ScriptedBackend::new("f")
            .echoing()
            .failing_when_contains("broken", FailureKind::ContextTooLong);
        let caller = caller(&primary, &fallback);
        let store = MemoryStore::default();
        let processor = ResumableProcessor::new(&caller, &store).with_pacing(Duration::ZERO);
        let chunks = vec![
            "first".to_string(),
            "broken".to_string(),
            "third".to_string(),
        ];

        let outcome = processor
            .process_topic(&topic_key(), "4", &chunks)
            .await
            .unwrap();

        assert_eq!(
            outcome,
            TaskOutcome::Completed {
                calls: 2,
                failed_calls: 1,
                fallback_calls: 0
            }
        );
        let body = store.load(&topic_key()).unwrap().unwrap();
        assert_eq!(
            body,
            format!(
                "p: {}\n\np: {}",
                topic_prompt("4", "first"),
                topic_prompt("4", "third")
            )
        );
    }

    #[tokio::test]
    async fn test_topic_all_failed_writes_nothing() {
        let primary = ScriptedBackend::new("p").always_failing(FailureKind::Network);
        let fallback = ScriptedBackend::new("f").always_failing(FailureKind::Network);
        let caller = caller(&primary, &fallback);
        let store = MemoryStore::default();
        let processor = ResumableProcessor::new(&caller, &store).with_pacing(Duration::ZERO);
        let chunks = vec!["a".to_string(), "b".to_string()];

        let outcome = processor
            .process_topic(&topic_key(), "4", &chunks)
            .await
            .unwrap();

        assert_eq!(outcome, TaskOutcome::Abandoned { failed_calls: 2 });
        assert!(!store.is_complete(&topic_key()).unwrap());
        assert_eq!(primary.call_count(), 2);
        assert_eq!(fallback.call_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pacing_after_each_success() {
        let primary = ScriptedBackend::new("p");
        let fallback = ScriptedBackend::new("f");
        let caller = caller(&primary, &fallback);
        let store = MemoryStore::default();
        let processor =
            ResumableProcessor::new(&caller, &store).with_pacing(Duration::from_secs(1));

        let started = tokio::time::Instant::now();
        for number in 1..=3 {
            processor
                .process_chunk(&ArtifactKey::ExecutiveChunk { number }, "prompt")
                .await
                .unwrap();
        }
        processor
            .process_chunk(&ArtifactKey::ExecutiveChunk { number: 1 }, "prompt")
            .await
            .unwrap();

        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(3));
        assert!(elapsed < Duration::from_secs(4));
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_pacing_after_failure() {
        let primary = ScriptedBackend::new("p").always_failing(FailureKind::Server);
        let fallback = ScriptedBackend::new("f").always_failing(FailureKind::Server);
        let caller = caller(&primary, &fallback);
        let store = MemoryStore::default();
        let processor =
            ResumableProcessor::new(&caller, &store).with_pacing(Duration::from_secs(1));

        let started = tokio::time::Instant::now();
        let _ = processor
            .process_chunk(&ArtifactKey::ExecutiveChunk { number: 1 }, "prompt")
            .await;

        assert_eq!(started.elapsed(), Duration::ZERO);
    }
}
