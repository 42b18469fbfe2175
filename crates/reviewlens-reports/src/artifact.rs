//! Report artifacts and the completion store.
//!
//! Each unit of model output is one text file. Its presence marks the unit
//! as done, so a rerun skips it; there is no persisted in-progress state.
//! Writes go to a hidden temporary sibling that is fsynced and renamed into
//! place, so a crash never leaves a partial artifact behind.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use reviewlens_core::{Error, Result};

use crate::kinds::ReportKind;

/// Identity of one unit of report work.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ArtifactKey {
    ExecutiveChunk { number: usize },
    RecommendationChunk { number: usize },
    Topic { number: usize, label: String },
}

impl ArtifactKey {
    pub fn kind(&self) -> ReportKind {
        match self {
            Self::ExecutiveChunk { .. } => ReportKind::Executive,
            Self::RecommendationChunk { .. } => ReportKind::Recommendation,
            Self::Topic { .. } => ReportKind::Topic,
        }
    }

    /// 1-based chunk or topic number.
    pub fn number(&self) -> usize {
        match self {
            Self::ExecutiveChunk { number }
            | Self::RecommendationChunk { number }
            | Self::Topic { number, .. } => *number,
        }
    }

    pub fn file_name(&self) -> String {
        match self {
            Self::ExecutiveChunk { number } => format!("executive_chunk_{}.txt", number),
            Self::RecommendationChunk { number } => format!("reco_chunk_{}.txt", number),
            Self::Topic { number, label } => {
                format!("topic_{}_{}.txt", number, sanitize_topic_label(label))
            }
        }
    }
}

/// Replace spaces and `/` so a topic label is safe in a file name.
pub fn sanitize_topic_label(label: &str) -> String {
    label.replace([' ', '/'], "_")
}

/// Tracks which units of work have durable output.
pub trait CompletionStore: Send + Sync {
    /// Whether `key` already has an artifact.
    fn is_complete(&self, key: &ArtifactKey) -> Result<bool>;

    /// Persist `body` for `key`, marking it complete.
    fn complete(&self, key: &ArtifactKey, body: &str) -> Result<()>;

    /// Stored body for `key`, if complete.
    fn load(&self, key: &ArtifactKey) -> Result<Option<String>>;
}

/// Artifacts as files in a reports directory.
#[derive(Debug, Clone)]
pub struct FsArtifactStore {
    dir: PathBuf,
}

impl FsArtifactStore {
    /// Open a store, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &ArtifactKey) -> PathBuf {
        self.dir.join(key.file_name())
    }
}

impl CompletionStore for FsArtifactStore {
    fn is_complete(&self, key: &ArtifactKey) -> Result<bool> {
        Ok(self.path_for(key).is_file())
    }

    fn complete(&self, key: &ArtifactKey, body: &str) -> Result<()> {
        let path = self.path_for(key);
        write_durable(&path, body)?;
        debug!(artifact = %path.display(), bytes = body.len(), "Artifact written");
        Ok(())
    }

    fn load(&self, key: &ArtifactKey) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.is_file() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }
}

/// Write `body` to `path` via temp file, fsync, and rename.
pub fn write_durable(path: &Path, body: &str) -> Result<()> {
    let file_name = path
        .file_name()
        .ok_or_else(|| Error::InvalidInput(format!("no file name in {}", path.display())))?;
    let tmp = path.with_file_name(format!(".{}.tmp", file_name.to_string_lossy()));

    let result = (|| -> std::io::Result<()> {
        let mut file = File::create(&tmp)?;
        file.write_all(body.as_bytes())?;
        file.sync_all()?;
        fs::rename(&tmp, path)
    })();

    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result.map_err(Error::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_names() {
        assert_eq!(
            ArtifactKey::ExecutiveChunk { number: 3 }.file_name(),
            "executive_chunk_3.txt"
        );
        assert_eq!(
            ArtifactKey::RecommendationChunk { number: 12 }.file_name(),
            "reco_chunk_12.txt"
        );
        assert_eq!(
            ArtifactKey::Topic {
                number: 2,
                label: "food / drink".to_string()
            }
            .file_name(),
            "topic_2_food___drink.txt"
        );
    }

    #[test]
    fn test_sanitize_label() {
        assert_eq!(sanitize_topic_label("4"), "4");
        assert_eq!(sanitize_topic_label("a b/c"), "a_b_c");
    }

    #[test]
    fn test_key_metadata() {
        let key = ArtifactKey::Topic {
            number: 5,
            label: "9".to_string(),
        };
        assert_eq!(key.kind(), ReportKind::Topic);
        assert_eq!(key.number(), 5);
    }

    #[test]
    fn test_store_lifecycle() {
        let dir = TempDir::new().unwrap();
        let store = FsArtifactStore::open(dir.path().join("reports")).unwrap();
        let key = ArtifactKey::ExecutiveChunk { number: 1 };

        assert!(!store.is_complete(&key).unwrap());
        assert_eq!(store.load(&key).unwrap(), None);

        store.complete(&key, "summary body").unwrap();

        assert!(store.is_complete(&key).unwrap());
        assert_eq!(store.load(&key).unwrap().as_deref(), Some("summary body"));
        assert_eq!(
            fs::read_to_string(store.path_for(&key)).unwrap(),
            "summary body"
        );
    }

    #[test]
    fn test_durable_write_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("reco_chunk_1.txt");

        write_durable(&path, "first").unwrap();
        write_durable(&path, "second").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
        let names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["reco_chunk_1.txt"]);
    }

    #[test]
    fn test_directory_in_place_of_artifact_is_not_complete() {
        let dir = TempDir::new().unwrap();
        let store = FsArtifactStore::open(dir.path()).unwrap();
        let key = ArtifactKey::ExecutiveChunk { number: 1 };
        fs::create_dir(store.path_for(&key)).unwrap();
        assert!(!store.is_complete(&key).unwrap());
    }
}
