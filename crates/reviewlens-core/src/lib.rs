//! # reviewlens-core
//!
//! Core types, traits, and pure transforms for the reviewlens pipeline.
//!
//! This crate provides the record model shared by every stage, the
//! order-preserving chunker, review-date resolution, text cleaning, dataset
//! I/O, and the [`GenerationBackend`] trait implemented by inference
//! backends.

pub mod chunking;
pub mod cleaning;
pub mod dataset;
pub mod defaults;
pub mod error;
pub mod models;
pub mod stats;
pub mod temporal;
pub mod traits;

// Re-export commonly used types at crate root
pub use chunking::{chunk_items, chunk_size, Chunk};
pub use cleaning::clean_review_text;
pub use dataset::{read_records, write_records, DatasetFormat};
pub use error::{Error, FailureKind, Result};
pub use models::*;
pub use stats::{Overview, SentimentBreakdown, TrendPoint};
pub use temporal::{parse_review_date, resolve_review_date, RelativeDate, RelativeUnit};
pub use traits::*;
