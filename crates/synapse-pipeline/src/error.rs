//! Error types for pipeline operations

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use synapse_domain::{SourceKind, SynthesisError};
use thiserror::Error;

/// Fatal errors that end a phase
///
/// Per-item failures never surface here; they are recorded in
/// [`MapReport`](crate::MapReport) instead.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Invalid configuration (bad concurrency, unusable paths)
    #[error("Configuration error: {0}")]
    Config(String),

    /// A configured source directory does not exist
    #[error("Missing input directory for {kind} sources: {}", path.display())]
    MissingInput {
        /// Kind of sources the directory should hold
        kind: SourceKind,
        /// Configured path
        path: PathBuf,
    },

    /// Reduce found no usable artifacts
    #[error("No map artifacts found in {}", dir.display())]
    EmptyMapOutput {
        /// Map output directory that was searched
        dir: PathBuf,
    },

    /// Synthesis call failed or returned malformed content
    #[error(transparent)]
    Synthesis(#[from] SynthesisError),

    /// Filesystem error on a directory or output file
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        /// Path being accessed
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// Two distinct sources could not be given distinct artifact names
    #[error("Unresolved artifact name collision: {0}")]
    UnresolvedCollision(String),
}

impl PipelineError {
    /// Attach a path to an I/O error
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        PipelineError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

/// Step at which a single item failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureStage {
    /// Reading the source file
    Load,
    /// Running the extraction function
    Extract,
    /// Writing the artifact
    Persist,
}

impl fmt::Display for FailureStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FailureStage::Load => "load",
            FailureStage::Extract => "extract",
            FailureStage::Persist => "persist",
        })
    }
}

/// A recorded per-item failure; the batch continues past it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemFailure {
    /// Source identity
    pub source: PathBuf,

    /// Step that failed
    pub stage: FailureStage,

    /// Human-readable cause
    pub reason: String,
}

impl ItemFailure {
    /// Create a failure record
    pub fn new(source: impl Into<PathBuf>, stage: FailureStage, reason: impl ToString) -> Self {
        Self {
            source: source.into(),
            stage,
            reason: reason.to_string(),
        }
    }
}

impl fmt::Display for ItemFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.source.display(), self.stage, self.reason)
    }
}
