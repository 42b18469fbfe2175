//! Dataset files passed between pipeline stages.
//!
//! Stages exchange [`ReviewRecord`] tables as CSV (the primary format) or as
//! a JSON array of records. The format is chosen by file extension.

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::models::ReviewRecord;
use crate::{Error, Result};

/// On-disk encoding of a record table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetFormat {
    Csv,
    Json,
}

impl DatasetFormat {
    /// Infer the format from a path's extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("csv") => Ok(Self::Csv),
            Some("json") => Ok(Self::Json),
            other => Err(Error::InvalidInput(format!(
                "unsupported dataset extension {:?} for {}",
                other.unwrap_or(""),
                path.display()
            ))),
        }
    }
}

/// Read all records from a CSV or JSON dataset.
pub fn read_records(path: &Path) -> Result<Vec<ReviewRecord>> {
    if !path.exists() {
        return Err(Error::NotFound(format!("dataset {}", path.display())));
    }

    let mut records = match DatasetFormat::from_path(path)? {
        DatasetFormat::Csv => {
            let mut reader = csv::Reader::from_path(path)?;
            reader
                .deserialize::<ReviewRecord>()
                .collect::<std::result::Result<Vec<_>, _>>()?
        }
        DatasetFormat::Json => {
            let raw = fs::read_to_string(path)?;
            serde_json::from_str::<Vec<ReviewRecord>>(&raw)?
        }
    };

    for record in &mut records {
        if record.sentiment_label.is_none() {
            record.sentiment_label = record.effective_sentiment();
        }
    }

    info!(
        path = %path.display(),
        record_count = records.len(),
        "Loaded dataset"
    );
    Ok(records)
}

/// Write records as CSV or pretty JSON, creating parent directories.
pub fn write_records(path: &Path, records: &[ReviewRecord]) -> Result<()> {
    let format = DatasetFormat::from_path(path)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    match format {
        DatasetFormat::Csv => {
            let mut writer = csv::Writer::from_path(path)?;
            for record in records {
                writer.serialize(record)?;
            }
            writer.flush()?;
        }
        DatasetFormat::Json => {
            let json = serde_json::to_string_pretty(records)?;
            fs::write(path, json)?;
        }
    }

    debug!(
        path = %path.display(),
        record_count = records.len(),
        "Wrote dataset"
    );
    Ok(())
}
