//! Tracing subscriber setup.
//!
//! Environment variables:
//!
//! - `LOG_FORMAT`: `json` or `text` (default `text`)
//! - `LOG_FILE`: path to a log file, rotated daily (optional)
//! - `LOG_ANSI`: `true`/`false` to force ANSI colors on or off
//! - `RUST_LOG`: standard env filter (default `reviewlens=info`)
//!
//! Console output goes to stderr so command results on stdout stay clean.
//!
//! # Levels
//!
//! | Level | Used for |
//! |-------|----------|
//! | WARN | fallback model applied, topic sub-chunk skipped, topic left pending, fetch stopped early |
//! | INFO | run and pass lifecycle, each generated unit, aggregates written, datasets loaded/saved |
//! | DEBUG | resume skips, artifact writes, per-call timings |
//!
//! Structured fields share one vocabulary across crates: `report_kind`,
//! `chunk_index`, `topic`, `artifact`, `model`, `fallback_model`,
//! `failure_kind`, `duration_ms`, `record_count`.

use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const DEFAULT_FILTER: &str = "reviewlens=info";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Resolved logging configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct LogSettings {
    pub format: LogFormat,
    pub file: Option<PathBuf>,
    pub ansi: Option<bool>,
}

impl LogSettings {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let format = match lookup("LOG_FORMAT").as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };
        let file = lookup("LOG_FILE")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);
        let ansi = lookup("LOG_ANSI").map(|v| v == "true" || v == "1");
        Self { format, file, ansi }
    }

    /// Install the global subscriber. Keep the guard alive until exit so
    /// buffered file output is flushed.
    pub fn init(&self) -> Option<WorkerGuard> {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into());
        let registry = tracing_subscriber::registry().with(env_filter);

        if let Some(ref path) = self.file {
            let (dir, file_name) = split_log_path(path);
            let file_appender = tracing_appender::rolling::daily(dir, file_name);
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            match self.format {
                LogFormat::Json => registry
                    .with(
                        tracing_subscriber::fmt::layer()
                            .json()
                            .with_writer(non_blocking),
                    )
                    .init(),
                LogFormat::Text => registry
                    .with(
                        tracing_subscriber::fmt::layer()
                            .with_writer(non_blocking)
                            .with_ansi(self.ansi.unwrap_or(false)),
                    )
                    .init(),
            }
            Some(guard)
        } else {
            match self.format {
                LogFormat::Json => registry
                    .with(
                        tracing_subscriber::fmt::layer()
                            .json()
                            .with_writer(std::io::stderr),
                    )
                    .init(),
                LogFormat::Text => {
                    let mut layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
                    if let Some(ansi) = self.ansi {
                        layer = layer.with_ansi(ansi);
                    }
                    registry.with(layer).init();
                }
            }
            None
        }
    }
}

fn split_log_path(path: &Path) -> (PathBuf, String) {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    let file_name = path
        .file_name()
        .and_then(|f| f.to_str())
        .unwrap_or("reviewlens.log")
        .to_string();
    (dir, file_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(pairs: &[(&str, &str)]) -> LogSettings {
        let map: HashMap<&str, &str> = pairs.iter().copied().collect();
        LogSettings::from_lookup(|name| map.get(name).map(|v| v.to_string()))
    }

    #[test]
    fn test_defaults() {
        let s = settings(&[]);
        assert_eq!(s.format, LogFormat::Text);
        assert!(s.file.is_none());
        assert!(s.ansi.is_none());
    }

    #[test]
    fn test_json_file_and_ansi() {
        let s = settings(&[
            ("LOG_FORMAT", "json"),
            ("LOG_FILE", "/var/log/reviewlens/run.log"),
            ("LOG_ANSI", "false"),
        ]);
        assert_eq!(s.format, LogFormat::Json);
        assert_eq!(s.file, Some(PathBuf::from("/var/log/reviewlens/run.log")));
        assert_eq!(s.ansi, Some(false));
    }

    #[test]
    fn test_unknown_format_falls_back_to_text() {
        assert_eq!(settings(&[("LOG_FORMAT", "xml")]).format, LogFormat::Text);
    }

    #[test]
    fn test_split_log_path() {
        assert_eq!(
            split_log_path(Path::new("logs/run.log")),
            (PathBuf::from("logs"), "run.log".to_string())
        );
        assert_eq!(
            split_log_path(Path::new("run.log")),
            (PathBuf::from("."), "run.log".to_string())
        );
    }
}
