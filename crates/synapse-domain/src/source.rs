//! Source module - loaded input documents and their kinds

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Kind of input source a document was loaded from
///
/// The kind selects the extraction function applied during the map phase:
/// - Meeting: plain-text meeting transcripts
/// - Chat: chat exports already rendered to transcript-like text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Meeting transcript
    Meeting,

    /// Chat export (Telegram and similar)
    #[serde(alias = "telegram")]
    Chat,
}

impl SourceKind {
    /// All known kinds, in loading order
    pub const ALL: [SourceKind; 2] = [SourceKind::Meeting, SourceKind::Chat];

    /// Get the kind name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Meeting => "meeting",
            SourceKind::Chat => "chat",
        }
    }

    /// File extension (without the dot) accepted for this kind
    pub fn extension(&self) -> &'static str {
        match self {
            SourceKind::Meeting | SourceKind::Chat => "txt",
        }
    }

    /// Parse a kind from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "meeting" => Some(SourceKind::Meeting),
            "chat" | "telegram" => Some(SourceKind::Chat),
            _ => None,
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid source kind: {}", s))
    }
}

/// A text document loaded from disk
///
/// Immutable once loaded. The path is the document's identity: two documents
/// are the same source exactly when their paths are equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    source: PathBuf,
    kind: SourceKind,
    content: String,
}

impl SourceDocument {
    /// Create a new document
    pub fn new(source: impl Into<PathBuf>, kind: SourceKind, content: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            kind,
            content: content.into(),
        }
    }

    /// Path the document was read from
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Kind of source
    pub fn kind(&self) -> SourceKind {
        self.kind
    }

    /// Text content
    pub fn content(&self) -> &str {
        &self.content
    }

    /// File name of the source (used to attribute extracted content)
    pub fn file_name(&self) -> String {
        self.source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.source.to_string_lossy().into_owned())
    }

    /// File stem of the source (file name without its extension)
    pub fn file_stem(&self) -> String {
        self.source
            .file_stem()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.file_name())
    }
}
