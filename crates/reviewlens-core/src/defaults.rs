//! Centralized default constants for reviewlens.
//!
//! Every crate and the CLI reference these values instead of defining their
//! own magic numbers. Organized by pipeline stage.

// =============================================================================
// REPORT CHUNKING
// =============================================================================

/// Reviews per chunk for the executive summary pass.
pub const EXECUTIVE_CHUNK_SIZE: usize = 25;

/// Reviews per chunk for the recommendations pass.
pub const RECOMMENDATION_CHUNK_SIZE: usize = 25;

/// Reviews per sub-chunk within a single topic.
pub const TOPIC_CHUNK_SIZE: usize = 20;

/// Separator placed between review texts when building a prompt.
pub const REVIEW_JOIN_SEPARATOR: &str = " ";

/// Separator placed between sub-chunk insights inside one topic artifact.
pub const INSIGHT_JOIN_SEPARATOR: &str = "\n\n";

// =============================================================================
// GENERATION
// =============================================================================

/// Default OpenAI-compatible endpoint (Groq).
pub const GROQ_URL: &str = "https://api.groq.com/openai/v1";

/// Model tried first for every prompt.
pub const PRIMARY_MODEL: &str = "meta-llama/llama-4-maverick-17b-128e-instruct";

/// Model tried once after the primary fails.
pub const FALLBACK_MODEL: &str = "moonshotai/kimi-k2-instruct";

/// Per-call generation timeout in seconds.
pub const GEN_TIMEOUT_SECS: u64 = 120;

/// Delay after each successful model call, in milliseconds.
pub const PACING_MS: u64 = 1000;

// =============================================================================
// PATHS
// =============================================================================

/// Directory holding report artifacts and aggregates.
pub const REPORTS_DIR: &str = "reports";

/// Topic-labeled dataset consumed by report generation.
pub const TOPIC_DATASET_PATH: &str = "data/final_topic_labeled_dataset.csv";

/// Directory for raw fetched reviews.
pub const RAW_DIR: &str = "data/raw";

/// Directory for cleaned per-business datasets.
pub const CLEANED_DIR: &str = "data/cleaned";

/// Suffix identifying cleaned per-business CSV files.
pub const CLEANED_SUFFIX: &str = "_cleaned.csv";

/// Merged cleaned dataset (CSV); a JSON twin is written next to it.
pub const MERGED_DATASET_PATH: &str = "data/final_cleaned_dataset.csv";

// =============================================================================
// REVIEW FETCHING
// =============================================================================

/// SerpAPI search endpoint.
pub const SERPAPI_URL: &str = "https://serpapi.com/search.json";

/// SerpAPI engine serving Google Maps reviews.
pub const SERPAPI_ENGINE: &str = "google_maps_reviews";

/// Reviews per SerpAPI page; the `start` offset advances by this much.
pub const FETCH_PAGE_SIZE: u32 = 10;

/// Hard page cap to bound API usage.
pub const FETCH_MAX_PAGES: u32 = 100;

/// Delay between page requests, in milliseconds.
pub const FETCH_DELAY_MS: u64 = 2000;

/// HTTP timeout for one page request, in seconds.
pub const FETCH_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// SENTIMENT
// =============================================================================

/// Compound score at or above which a review is Positive.
pub const SENTIMENT_POSITIVE_THRESHOLD: f64 = 0.05;

/// Compound score at or below which a review is Negative.
pub const SENTIMENT_NEGATIVE_THRESHOLD: f64 = -0.05;

// =============================================================================
// TOPICS
// =============================================================================

/// Topic label the topic model assigns to outliers.
pub const OUTLIER_TOPIC: i64 = -1;
