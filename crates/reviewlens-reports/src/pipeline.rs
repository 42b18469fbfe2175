//! The full report run: executive summary, topic insights,
//! recommendations, then merge.

use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::info;

use reviewlens_core::{chunk_items, defaults, LabeledText, Result};
use reviewlens_inference::ModelCaller;

use crate::artifact::{ArtifactKey, FsArtifactStore};
use crate::kinds::{executive_prompt, recommendation_prompt, ReportKind};
use crate::merge::{merge_reports, MergeOrder, MergeSummary};
use crate::processor::{ResumableProcessor, TaskOutcome};
use crate::topics::group_by_topic;

/// Knobs for a report run.
#[derive(Debug, Clone)]
pub struct ReportSettings {
    pub reports_dir: PathBuf,
    pub executive_chunk_size: NonZeroUsize,
    pub recommendation_chunk_size: NonZeroUsize,
    pub topic_chunk_size: NonZeroUsize,
    pub pacing: Duration,
    pub merge_order: MergeOrder,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            reports_dir: PathBuf::from(defaults::REPORTS_DIR),
            executive_chunk_size: ReportKind::Executive.default_chunk_size(),
            recommendation_chunk_size: ReportKind::Recommendation.default_chunk_size(),
            topic_chunk_size: ReportKind::Topic.default_chunk_size(),
            pacing: Duration::from_millis(defaults::PACING_MS),
            merge_order: MergeOrder::default(),
        }
    }
}

/// Tally for one report pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PassSummary {
    pub units: usize,
    pub completed: usize,
    pub skipped: usize,
    pub abandoned: usize,
    pub model_calls: usize,
    pub failed_calls: usize,
    pub fallback_calls: usize,
}

impl PassSummary {
    fn record(&mut self, outcome: &TaskOutcome) {
        self.units += 1;
        match outcome {
            TaskOutcome::Skipped => self.skipped += 1,
            TaskOutcome::Completed {
                calls,
                failed_calls,
                fallback_calls,
            } => {
                self.completed += 1;
                self.model_calls += calls;
                self.failed_calls += failed_calls;
                self.fallback_calls += fallback_calls;
            }
            TaskOutcome::Abandoned { failed_calls } => {
                self.abandoned += 1;
                self.failed_calls += failed_calls;
            }
        }
    }
}

/// Everything a report run did.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub input_count: usize,
    pub executive: PassSummary,
    pub topics: PassSummary,
    pub recommendations: PassSummary,
    pub aggregates: Vec<MergeSummary>,
    pub duration_ms: u64,
}

/// Generates and merges all reports into one directory.
pub struct ReportPipeline {
    caller: ModelCaller,
    store: FsArtifactStore,
    settings: ReportSettings,
}

impl ReportPipeline {
    pub fn new(caller: ModelCaller, settings: ReportSettings) -> Result<Self> {
        let store = FsArtifactStore::open(&settings.reports_dir)?;
        Ok(Self {
            caller,
            store,
            settings,
        })
    }

    pub fn settings(&self) -> &ReportSettings {
        &self.settings
    }

    fn processor(&self) -> ResumableProcessor<'_, FsArtifactStore> {
        ResumableProcessor::new(&self.caller, &self.store).with_pacing(self.settings.pacing)
    }

    /// Run every pass, then merge. Executive and recommendation failures abort.
    pub async fn run(&self, inputs: &[LabeledText]) -> Result<RunSummary> {
        let started = Instant::now();
        info!(
            record_count = inputs.len(),
            reports_dir = %self.settings.reports_dir.display(),
            "Starting report run"
        );

        let texts: Vec<&str> = inputs.iter().map(|i| i.text.as_str()).collect();
        let executive = self.run_executive(&texts).await?;
        let topics = self.run_topics(inputs).await?;
        let recommendations = self.run_recommendations(&texts).await?;
        let aggregates = self.merge()?;

        let summary = RunSummary {
            input_count: inputs.len(),
            executive,
            topics,
            recommendations,
            aggregates,
            duration_ms: started.elapsed().as_millis() as u64,
        };
        info!(
            duration_ms = summary.duration_ms,
            model_calls = summary.executive.model_calls
                + summary.topics.model_calls
                + summary.recommendations.model_calls,
            "Report run complete"
        );
        Ok(summary)
    }

    /// Executive summary chunks.
    pub async fn run_executive(&self, texts: &[&str]) -> Result<PassSummary> {
        self.run_global(ReportKind::Executive, texts).await
    }

    /// Recommendation chunks.
    pub async fn run_recommendations(&self, texts: &[&str]) -> Result<PassSummary> {
        self.run_global(ReportKind::Recommendation, texts).await
    }

    async fn run_global(&self, kind: ReportKind, texts: &[&str]) -> Result<PassSummary> {
        let size = match kind {
            ReportKind::Recommendation => self.settings.recommendation_chunk_size,
            _ => self.settings.executive_chunk_size,
        };
        let chunks = chunk_items(texts, size);
        info!(report_kind = %kind, chunks = chunks.len(), "Starting pass");

        let processor = self.processor();
        let mut summary = PassSummary::default();
        for chunk in &chunks {
            let number = chunk.number();
            let (key, prompt) = match kind {
                ReportKind::Recommendation => (
                    ArtifactKey::RecommendationChunk { number },
                    recommendation_prompt(&chunk.join(defaults::REVIEW_JOIN_SEPARATOR)),
                ),
                _ => (
                    ArtifactKey::ExecutiveChunk { number },
                    executive_prompt(&chunk.join(defaults::REVIEW_JOIN_SEPARATOR)),
                ),
            };
            let outcome = processor.process_chunk(&key, &prompt).await?;
            summary.record(&outcome);
        }
        Ok(summary)
    }

    /// Topic insights, one artifact per retained topic.
    pub async fn run_topics(&self, inputs: &[LabeledText]) -> Result<PassSummary> {
        let groups = group_by_topic(inputs);
        info!(
            report_kind = %ReportKind::Topic,
            topics = groups.len(),
            "Starting pass"
        );

        let processor = self.processor();
        let mut summary = PassSummary::default();
        for group in &groups {
            let sub_chunks: Vec<String> = chunk_items(&group.texts, self.settings.topic_chunk_size)
                .iter()
                .map(|c| c.join(defaults::REVIEW_JOIN_SEPARATOR))
                .collect();
            let label = group.label.to_string();
            let outcome = processor
                .process_topic(&group.key(), &label, &sub_chunks)
                .await?;
            summary.record(&outcome);
        }
        Ok(summary)
    }

    /// Rebuild the three aggregates from whatever artifacts exist.
    pub fn merge(&self) -> Result<Vec<MergeSummary>> {
        merge_reports(&self.settings.reports_dir, self.settings.merge_order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = ReportSettings::default();
        assert_eq!(settings.reports_dir, PathBuf::from("reports"));
        assert_eq!(settings.executive_chunk_size.get(), 25);
        assert_eq!(settings.recommendation_chunk_size.get(), 25);
        assert_eq!(settings.topic_chunk_size.get(), 20);
        assert_eq!(settings.pacing, Duration::from_secs(1));
        assert_eq!(settings.merge_order, MergeOrder::Lexical);
    }

    #[test]
    fn test_pass_summary_tally() {
        let mut summary = PassSummary::default();
        summary.record(&TaskOutcome::Skipped);
        summary.record(&TaskOutcome::Completed {
            calls: 3,
            failed_calls: 1,
            fallback_calls: 2,
        });
        summary.record(&TaskOutcome::Abandoned { failed_calls: 2 });

        assert_eq!(
            summary,
            PassSummary {
                units: 3,
                completed: 1,
                skipped: 1,
                abandoned: 1,
                model_calls: 3,
                failed_calls: 3,
                fallback_calls: 2,
            }
        );
    }
}
