//! Raw review objects to cleaned [`ReviewRecord`]s.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, info};

use reviewlens_core::{clean_review_text, defaults, write_records, Error, Result, ReviewRecord};

fn string_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Clean raw reviews, dropping any whose text is empty afterwards.
///
/// Reads `user.name`, `snippet`, `date` and `rating`; fields with an
/// unexpected shape are treated as absent.
pub fn normalize_reviews(raw: &[Value]) -> Vec<ReviewRecord> {
    raw.iter()
        .filter_map(|review| {
            let text = clean_review_text(review.get("snippet").and_then(Value::as_str).unwrap_or(""));
            if text.is_empty() {
                return None;
            }
            Some(ReviewRecord {
                reviewer_name: review.get("user").and_then(|u| string_field(u, "name")),
                review_date: string_field(review, "date"),
                rating: review.get("rating").and_then(Value::as_f64),
                review_text: text,
                ..Default::default()
            })
        })
        .collect()
}

/// Outcome of cleaning one raw file.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanSummary {
    pub output: PathBuf,
    pub raw_count: usize,
    pub kept_count: usize,
}

/// Clean `<raw_dir>/<name>.json` into `<cleaned_dir>/<name>_cleaned.csv`.
pub fn clean_raw_file(raw_dir: &Path, cleaned_dir: &Path, name: &str) -> Result<CleanSummary> {
    let input = raw_dir.join(format!("{}.json", name));
    if !input.exists() {
        return Err(Error::NotFound(format!("raw reviews {}", input.display())));
    }

    let raw: Vec<Value> = serde_json::from_str(&fs::read_to_string(&input)?)?;
    let records = normalize_reviews(&raw);
    debug!(
        dropped = raw.len() - records.len(),
        "Dropped reviews with empty text"
    );

    let output = cleaned_dir.join(format!("{}{}", name, defaults::CLEANED_SUFFIX));
    write_records(&output, &records)?;

    info!(
        path = %output.display(),
        record_count = records.len(),
        "Cleaning complete"
    );
    Ok(CleanSummary {
        output,
        raw_count: raw.len(),
        kept_count: records.len(),
    })
}
