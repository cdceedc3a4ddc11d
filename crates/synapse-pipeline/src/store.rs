//! Artifact persistence in the map output directory

use crate::error::PipelineError;
use chrono::NaiveDateTime;
use std::cmp::Ordering;
use std::io;
use std::path::{Path, PathBuf};
use synapse_domain::artifact::ARTIFACT_SUFFIX;
use synapse_domain::MapArtifact;
use tracing::debug;

/// Leading timestamp formats used by recorded transcripts (`2024-01-15 10_00 ...`),
/// before and after sanitizing
const TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%d %H_%M", "%Y-%m-%d_%H_%M"];
const TIMESTAMP_LEN: usize = 16;

/// Reads and writes map artifacts under one directory
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    /// Create a store rooted at `dir`; nothing is touched on disk yet
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Map output directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the directory if absent
    pub async fn ensure_dir(&self) -> Result<(), PipelineError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| PipelineError::io(&self.dir, e))
    }

    /// Write an artifact, replacing any existing file of the same name
    ///
    /// Content goes to a hidden temp file first and is renamed into place, so
    /// readers never observe a partially written artifact.
    pub async fn write(&self, artifact: &MapArtifact) -> io::Result<PathBuf> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = artifact.path_in(&self.dir);
        write_atomic(&path, &artifact.content).await?;
        debug!(path = %path.display(), bytes = artifact.content.len(), "Artifact written");
        Ok(path)
    }

    /// List every artifact in the directory, ordered for reduction
    ///
    /// Only files ending in `.map.md` are considered. A missing directory
    /// yields an empty list.
    pub async fn list(&self) -> Result<Vec<MapArtifact>, PipelineError> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(PipelineError::io(&self.dir, e)),
        };

        let mut artifacts = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| PipelineError::io(&self.dir, e))?
        {
            let file_name = entry.file_name().to_string_lossy().into_owned();
            if !file_name.ends_with(ARTIFACT_SUFFIX) {
                continue;
            }
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let content = tokio::fs::read_to_string(&path)
                .await
                .map_err(|e| PipelineError::io(&path, e))?;
            artifacts.push(MapArtifact::new(file_name, content));
        }

        artifacts.sort_by(|a, b| compare_artifact_names(&a.file_name, &b.file_name));
        Ok(artifacts)
    }
}

/// Write `content` to `path` through a sibling temp file
pub(crate) async fn write_atomic(path: &Path, content: &str) -> io::Result<()> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let tmp = path.with_file_name(format!(".{}.tmp", file_name));

    tokio::fs::write(&tmp, content).await?;
    if let Err(e) = tokio::fs::rename(&tmp, path).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(e);
    }
    Ok(())
}

fn leading_timestamp(name: &str) -> Option<NaiveDateTime> {
    let prefix = name.get(..TIMESTAMP_LEN)?;
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(prefix, format).ok())
}

/// Reduce ordering: timestamped names first in chronological order, then the
/// rest alphabetically
pub fn compare_artifact_names(a: &str, b: &str) -> Ordering {
    match (leading_timestamp(a), leading_timestamp(b)) {
        (Some(ta), Some(tb)) => ta.cmp(&tb).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}
