//! Source loading from typed input directories

use crate::error::{FailureStage, ItemFailure, PipelineError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use synapse_domain::{SourceDocument, SourceKind};
use tracing::{debug, info, warn};

/// An input directory holding sources of one kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDir {
    /// Kind of every file in the directory
    pub kind: SourceKind,
    /// Directory path
    pub path: PathBuf,
}

impl SourceDir {
    /// Create a new source directory entry
    pub fn new(kind: SourceKind, path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            path: path.into(),
        }
    }
}

/// Documents read from disk plus per-file read failures
#[derive(Debug, Default)]
pub struct LoadedSources {
    /// Non-empty documents, in sorted path order per directory
    pub documents: Vec<SourceDocument>,
    /// Files that could not be read
    pub failures: Vec<ItemFailure>,
    /// Files skipped because they held only whitespace
    pub skipped_empty: usize,
}

impl LoadedSources {
    /// Number of documents plus read failures
    pub fn total(&self) -> usize {
        self.documents.len() + self.failures.len()
    }
}

/// Check that every configured directory exists
pub fn check_dirs(dirs: &[SourceDir]) -> Result<(), PipelineError> {
    for dir in dirs {
        if !dir.path.is_dir() {
            return Err(PipelineError::MissingInput {
                kind: dir.kind,
                path: dir.path.clone(),
            });
        }
    }
    Ok(())
}

/// Load every matching file from the given directories
///
/// Non-recursive. A directory without matching files is logged and yields
/// nothing. Unreadable files become [`FailureStage::Load`] failures; files
/// with only whitespace are skipped. Content is trimmed.
pub async fn load_sources(dirs: &[SourceDir]) -> Result<LoadedSources, PipelineError> {
    check_dirs(dirs)?;

    let mut loaded = LoadedSources::default();
    for dir in dirs {
        let paths = list_files(&dir.path, dir.kind.extension()).await?;
        if paths.is_empty() {
            warn!(kind = %dir.kind, dir = %dir.path.display(), "No source files found");
            continue;
        }

        for path in paths {
            match tokio::fs::read_to_string(&path).await {
                Ok(content) if content.trim().is_empty() => {
                    warn!(path = %path.display(), "Skipping empty source");
                    loaded.skipped_empty += 1;
                }
                Ok(content) => {
                    debug!(path = %path.display(), chars = content.len(), "Source loaded");
                    loaded
                        .documents
                        .push(SourceDocument::new(path, dir.kind, content.trim()));
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Failed to read source");
                    loaded
                        .failures
                        .push(ItemFailure::new(path, FailureStage::Load, e));
                }
            }
        }
    }

    info!(
        documents = loaded.documents.len(),
        failures = loaded.failures.len(),
        skipped_empty = loaded.skipped_empty,
        "Sources loaded"
    );
    Ok(loaded)
}

async fn list_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>, PipelineError> {
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .map_err(|e| PipelineError::io(dir, e))?;

    let mut paths = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| PipelineError::io(dir, e))?
    {
        let path = entry.path();
        let matches = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(extension));
        if matches && path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_loads_matching_files_only() {
        let temp = TempDir::new().unwrap();
        let meetings = temp.path().join("meetings");
        fs::create_dir_all(meetings.join("nested")).unwrap();
        fs::write(meetings.join("b.txt"), "\nsecond\n").unwrap();
        fs::write(meetings.join("a.TXT"), "first").unwrap();
        fs::write(meetings.join("notes.md"), "ignored").unwrap();
        fs::write(meetings.join("nested/c.txt"), "ignored").unwrap();
        fs::write(meetings.join("blank.txt"), "  \n").unwrap();

        let loaded = load_sources(&[SourceDir::new(SourceKind::Meeting, &meetings)])
            .await
            .unwrap();

        let contents: Vec<&str> = loaded.documents.iter().map(|d| d.content()).collect();
        assert_eq!(contents, vec!["first", "second"]);
        assert!(loaded.documents.iter().all(|d| d.kind() == SourceKind::Meeting));
        assert_eq!(loaded.skipped_empty, 1);
        assert!(loaded.failures.is_empty());
    }

    #[tokio::test]
    async fn test_missing_dir() {
        let temp = TempDir::new().unwrap();
        let dirs = [
            SourceDir::new(SourceKind::Meeting, temp.path()),
            SourceDir::new(SourceKind::Chat, temp.path().join("chats")),
        ];

        match load_sources(&dirs).await {
            Err(PipelineError::MissingInput { kind, path }) => {
                assert_eq!(kind, SourceKind::Chat);
                assert!(path.ends_with("chats"));
            }
            other => panic!("Expected MissingInput, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_dir_yields_nothing() {
        let temp = TempDir::new().unwrap();
        let loaded = load_sources(&[SourceDir::new(SourceKind::Chat, temp.path())])
            .await
            .unwrap();
        assert_eq!(loaded.total(), 0);
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_a_load_failure() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("bad.txt"), [0xff, 0xfe, 0x00]).unwrap();
        fs::write(temp.path().join("good.txt"), "hello").unwrap();

        let loaded = load_sources(&[SourceDir::new(SourceKind::Chat, temp.path())])
            .await
            .unwrap();
        assert_eq!(loaded.documents.len(), 1);
        assert_eq!(loaded.failures.len(), 1);
        assert_eq!(loaded.failures[0].stage, FailureStage::Load);
        assert_eq!(loaded.total(), 2);
    }
}
