//! # reviewlens-reports
//!
//! Resumable LLM report generation over a topic-labeled review dataset.
//!
//! Three passes share one pattern: split the reviews into chunks, skip any
//! chunk whose artifact already exists, otherwise prompt the model (with
//! fallback) and persist the answer. A final merge concatenates artifacts
//! into `executive_summary.txt`, `topic_insights.txt` and
//! `recommendations.txt`.
//!
//! | Pass | Unit | Artifact |
//! |------|------|----------|
//! | executive | 25 reviews | `executive_chunk_<n>.txt` |
//! | topic | one topic, 20-review sub-chunks | `topic_<n>_<label>.txt` |
//! | recommendation | 25 reviews | `reco_chunk_<n>.txt` |

pub mod artifact;
pub mod kinds;
pub mod merge;
pub mod pipeline;
pub mod processor;
pub mod topics;

pub use artifact::{sanitize_topic_label, ArtifactKey, CompletionStore, FsArtifactStore};
pub use kinds::{executive_prompt, recommendation_prompt, topic_prompt, ReportKind};
pub use merge::{merge_artifacts, merge_reports, MergeOrder, MergeSummary};
pub use pipeline::{PassSummary, ReportPipeline, ReportSettings, RunSummary};
pub use processor::{ResumableProcessor, TaskOutcome};
pub use topics::{group_by_topic, TopicGroup};
