//! Assemble per-unit artifacts into aggregate reports.

use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, warn};

use reviewlens_core::{Error, Result};

use crate::artifact::write_durable;
use crate::kinds::ReportKind;

/// Separator written after every merged artifact.
pub const MERGE_SEPARATOR: &str = "\n\n";

/// How matched artifacts are ordered before concatenation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeOrder {
    /// Byte-wise filename order: `a_1`, `a_10`, `a_2`.
    #[default]
    Lexical,
    /// Digit runs compared as numbers: `a_1`, `a_2`, `a_10`.
    Natural,
}

impl MergeOrder {
    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        match self {
            Self::Lexical => a.cmp(b),
            Self::Natural => natural_cmp(a, b).then_with(|| a.cmp(b)),
        }
    }
}

/// Result of building one aggregate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergeSummary {
    pub output: PathBuf,
    pub sources: Vec<PathBuf>,
}

/// Files in `dir` matching `pattern`, ordered, never including `output`.
pub fn collect_sources(
    dir: &Path,
    pattern: &str,
    output: &Path,
    order: MergeOrder,
) -> Result<Vec<PathBuf>> {
    let full = format!("{}/{}", glob::Pattern::escape(&dir.to_string_lossy()), pattern);
    let entries = glob::glob(&full)
        .map_err(|e| Error::InvalidInput(format!("bad pattern {}: {}", full, e)))?;

    let output_name = output.file_name();
    let mut sources = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) if path.is_file() && path.file_name() != output_name => sources.push(path),
            Ok(_) => {}
            Err(e) => warn!(error = %e, "Glob iteration error"),
        }
    }

    sources.sort_by(|a, b| order.compare(&file_name_of(a), &file_name_of(b)));
    Ok(sources)
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Concatenate matches of `pattern` into `output`, each followed by a blank line.
///
/// No matches produce an empty `output`.
pub fn merge_artifacts(
    dir: &Path,
    pattern: &str,
    output: &Path,
    order: MergeOrder,
) -> Result<MergeSummary> {
    let sources = collect_sources(dir, pattern, output, order)?;

    let mut merged = String::new();
    for source in &sources {
        merged.push_str(&fs::read_to_string(source)?);
        merged.push_str(MERGE_SEPARATOR);
    }
    write_durable(output, &merged)?;

    info!(
        artifact = %output.display(),
        sources = sources.len(),
        "Aggregate written"
    );
    Ok(MergeSummary {
        output: output.to_path_buf(),
        sources,
    })
}

/// Build all three aggregates in `dir`.
pub fn merge_reports(dir: &Path, order: MergeOrder) -> Result<Vec<MergeSummary>> {
    fs::create_dir_all(dir)?;
    ReportKind::ALL
        .iter()
        .map(|kind| {
            merge_artifacts(
                dir,
                kind.artifact_pattern(),
                &dir.join(kind.aggregate_name()),
                order,
            )
        })
        .collect()
}

/// Compare strings treating runs of ASCII digits as numbers.
fn natural_cmp(a: &str, b: &str) -> Ordering {
    let (mut a, mut b) = (a, b);
    loop {
        match (a.chars().next(), b.chars().next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let (na, rest_a) = split_digits(a);
                let (nb, rest_b) = split_digits(b);
                let ord = compare_digit_runs(na, nb);
                if ord != Ordering::Equal {
                    return ord;
                }
                a = rest_a;
                b = rest_b;
            }
            (Some(x), Some(y)) => {
                if x != y {
                    return x.cmp(&y);
                }
                a = &a[x.len_utf8()..];
                b = &b[y.len_utf8()..];
            }
        }
    }
}

fn split_digits(s: &str) -> (&str, &str) {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    s.split_at(end)
}

fn compare_digit_runs(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}
