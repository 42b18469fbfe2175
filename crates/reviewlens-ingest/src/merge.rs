//! Merge per-business cleaned datasets into one table.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use reviewlens_core::{defaults, read_records, write_records, Error, Result, ReviewRecord};

/// Files written by a dataset merge.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetMergeSummary {
    pub csv_path: PathBuf,
    pub json_path: PathBuf,
    pub sources: Vec<String>,
    pub record_count: usize,
}

/// Cleaned dataset files in `dir`, sorted by filename.
pub fn find_cleaned_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let pattern = format!(
        "{}/*{}",
        glob::Pattern::escape(&dir.to_string_lossy()),
        defaults::CLEANED_SUFFIX
    );
    let entries = glob::glob(&pattern)
        .map_err(|e| Error::InvalidInput(format!("bad pattern {}: {}", pattern, e)))?;

    let mut files = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) if path.is_file() => files.push(path),
            Ok(_) => {}
            Err(e) => warn!(error = %e, "Glob iteration error"),
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Business name encoded in a cleaned dataset filename.
pub fn source_name(path: &Path) -> String {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    file_name
        .strip_suffix(defaults::CLEANED_SUFFIX)
        .unwrap_or(&file_name)
        .to_string()
}

/// Concatenate every `*_cleaned.csv` in `dir`, tagging rows with their source.
///
/// Writes `csv_path` and a JSON twin next to it. Fails when `dir` holds no
/// cleaned datasets.
pub fn merge_cleaned_datasets(dir: &Path, csv_path: &Path) -> Result<DatasetMergeSummary> {
    let files = find_cleaned_files(dir)?;
    if files.is_empty() {
        return Err(Error::NotFound(format!(
            "no *{} files in {}",
            defaults::CLEANED_SUFFIX,
            dir.display()
        )));
    }

    let mut merged: Vec<ReviewRecord> = Vec::new();
    let mut sources = Vec::with_capacity(files.len());
    for file in &files {
        let source = source_name(file);
        let records = read_records(file)?;
        debug!(source = %source, record_count = records.len(), "Adding cleaned dataset");
        merged.extend(records.into_iter().map(|mut r| {
            r.source = Some(source.clone());
            r
        }));
        sources.push(source);
    }

    let json_path = csv_path.with_extension("json");
    write_records(csv_path, &merged)?;
    write_records(&json_path, &merged)?;

    info!(
        csv = %csv_path.display(),
        json = %json_path.display(),
        sources = sources.len(),
        record_count = merged.len(),
        "Merged cleaned datasets"
    );

    Ok(DatasetMergeSummary {
        csv_path: csv_path.to_path_buf(),
        json_path,
        sources,
        record_count: merged.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_cleaned(dir: &Path, name: &str, texts: &[&str]) {
        let records: Vec<ReviewRecord> = texts
            .iter()
            .map(|t| ReviewRecord {
                review_text: t.to_string(),
                ..Default::default()
            })
            .collect();
        write_records(&dir.join(format!("{}_cleaned.csv", name)), &records).unwrap();
    }

    #[test]
    fn test_source_name_strips_suffix() {
        assert_eq!(source_name(Path::new("data/cleaned/city_cafe_cleaned.csv")), "city_cafe");
        assert_eq!(source_name(Path::new("other.csv")), "other.csv");
    }

    #[test]
    fn test_merge_tags_and_orders() {
        let dir = TempDir::new().unwrap();
        let cleaned = dir.path().join("cleaned");
        fs::create_dir_all(&cleaned).unwrap();
        write_cleaned(&cleaned, "zoo", &["z1"]);
        write_cleaned(&cleaned, "bakery", &["b1", "b2"]);
        fs::write(cleaned.join("notes.csv"), "review_text\nignored\n").unwrap();

        let out = dir.path().join("final.csv");
        let summary = merge_cleaned_datasets(&cleaned, &out).unwrap();

        assert_eq!(summary.sources, vec!["bakery", "zoo"]);
        assert_eq!(summary.record_count, 3);
        assert_eq!(summary.json_path, dir.path().join("final.json"));

        for path in [&summary.csv_path, &summary.json_path] {
            let records = read_records(path).unwrap();
            let tagged: Vec<(&str, &str)> = records
                .iter()
                .map(|r| (r.review_text.as_str(), r.source.as_deref().unwrap_or("")))
                .collect();
            assert_eq!(tagged, vec![("b1", "bakery"), ("b2", "bakery"), ("z1", "zoo")]);
        }
    }

    #[test]
    fn test_merge_without_inputs_fails() {
        let dir = TempDir::new().unwrap();
        let err = merge_cleaned_datasets(dir.path(), &dir.path().join("out.csv")).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }
}
