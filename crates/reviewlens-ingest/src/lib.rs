//! # reviewlens-ingest
//!
//! The dataset-building stages that run before report generation:
//!
//! - [`serpapi`]: paginated Google Maps review fetching
//! - [`normalize`]: raw review objects to cleaned records
//! - [`merge`]: per-business cleaned datasets into one table

pub mod merge;
pub mod normalize;
pub mod serpapi;

pub use merge::{find_cleaned_files, merge_cleaned_datasets, source_name, DatasetMergeSummary};
pub use normalize::{clean_raw_file, normalize_reviews, CleanSummary};
pub use serpapi::{save_raw, SerpApiClient, SerpApiConfig};
