//! Report kinds, their prompts, and their file naming.

use std::fmt;
use std::num::NonZeroUsize;

use serde::Serialize;

use reviewlens_core::defaults;

/// The three report passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    Executive,
    Topic,
    Recommendation,
}

impl ReportKind {
    /// Passes in run order.
    pub const ALL: [ReportKind; 3] = [Self::Executive, Self::Topic, Self::Recommendation];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Executive => "executive",
            Self::Topic => "topic",
            Self::Recommendation => "recommendation",
        }
    }

    /// Glob selecting this kind's per-unit artifacts.
    pub fn artifact_pattern(&self) -> &'static str {
        match self {
            Self::Executive => "executive_chunk_*.txt",
            Self::Topic => "topic_*.txt",
            Self::Recommendation => "reco_chunk_*.txt",
        }
    }

    /// File name of the merged aggregate.
    pub fn aggregate_name(&self) -> &'static str {
        match self {
            Self::Executive => "executive_summary.txt",
            Self::Topic => "topic_insights.txt",
            Self::Recommendation => "recommendations.txt",
        }
    }

    pub fn default_chunk_size(&self) -> NonZeroUsize {
        let size = match self {
            Self::Executive => defaults::EXECUTIVE_CHUNK_SIZE,
            Self::Topic => defaults::TOPIC_CHUNK_SIZE,
            Self::Recommendation => defaults::RECOMMENDATION_CHUNK_SIZE,
        };
        NonZeroUsize::new(size).unwrap_or(NonZeroUsize::MIN)
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Prompt for one executive-summary chunk.
pub fn executive_prompt(chunk_text: &str) -> String {
    format!(
        "\nYou are an expert business analyst. Summarize the following customer feedback \
         reviews into a clear executive summary. Focus on:\n\n\
         - Main customer feelings (positive/negative)\n\
         - Overall satisfaction level\n\
         - Key recurring themes\n\n\
         Reviews:\n{chunk_text}\n"
    )
}

/// Prompt for one sub-chunk of a topic's reviews.
pub fn topic_prompt(topic: &str, reviews_text: &str) -> String {
    format!(
        "\nBased on the customer reviews below, explain clearly what this topic represents \
         in bullet points:\n\n\
         Topic: {topic}\n\
         Reviews: {reviews_text}\n"
    )
}

/// Prompt for one recommendations chunk.
pub fn recommendation_prompt(chunk_text: &str) -> String {
    format!(
        "\nBased on the customer feedback trends, generate practical business improvement \
         recommendations.\n\n\
         Focus on:\n\
         - Service quality\n\
         - Staff behavior\n\
         - Facilities\n\
         - Wait time\n\
         - Value for money\n\
         - Digital experience\n\n\
         Reviews:\n{chunk_text}\n"
    )
}
