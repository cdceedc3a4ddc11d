//! Artifact module - persisted map-phase results

use std::path::{Path, PathBuf};

/// Suffix shared by every map artifact file name
pub const ARTIFACT_SUFFIX: &str = ".map.md";

/// A persisted per-source extraction result
///
/// Written once per successful extraction, read by the reduce phase. The file
/// name is derived from the source identity; rewriting the same source
/// replaces the artifact wholesale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapArtifact {
    /// File name within the map output directory (e.g. `standup.map.md`)
    pub file_name: String,

    /// Markdown content produced by the extractor
    pub content: String,
}

impl MapArtifact {
    /// Create a new artifact
    pub fn new(file_name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            content: content.into(),
        }
    }

    /// Artifact name without the `.map.md` suffix, used for attribution
    pub fn label(&self) -> &str {
        self.file_name
            .strip_suffix(ARTIFACT_SUFFIX)
            .unwrap_or(&self.file_name)
    }

    /// Full path of this artifact inside a map directory
    pub fn path_in(&self, dir: &Path) -> PathBuf {
        dir.join(&self.file_name)
    }

    /// Whether the artifact carries any non-whitespace content
    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }
}
