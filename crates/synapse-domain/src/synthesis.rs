//! Synthesis module - reduce-phase outputs and failure taxonomy

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors a synthesis function can report
///
/// A transport failure and a response that arrived in the wrong shape are
/// reported as different variants.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SynthesisError {
    /// The external call itself failed
    #[error("Synthesis call failed: {0}")]
    Call(String),

    /// The call succeeded but the content failed structural validation
    #[error("Malformed synthesis output: {0}")]
    Malformed(String),
}

/// Structured metadata about one identified entity (a person)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileMetadata {
    /// Canonical name, also the entity key
    pub name: String,

    /// Name variations observed in the sources
    #[serde(default)]
    pub aliases: Vec<String>,

    /// Inferred role or position
    #[serde(default)]
    pub role: String,

    /// Source files where the entity appears
    #[serde(default)]
    pub mentioned_in_sources: Vec<String>,

    /// Topics the entity discussed or was involved with
    #[serde(default)]
    pub topics: Vec<String>,
}

/// One structured entity record returned by synthesis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityProfile {
    /// Structured fields, rendered as a metadata header
    pub metadata: ProfileMetadata,

    /// Markdown body
    pub content: String,
}

impl EntityProfile {
    /// Entity key the output file name is derived from
    pub fn key(&self) -> &str {
        &self.metadata.name
    }
}

/// Result of a synthesis call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SynthesisOutput {
    /// A single markdown document, written verbatim
    Document(String),

    /// One record per identified entity, written one file each
    Entities(Vec<EntityProfile>),
}

impl SynthesisOutput {
    /// Whether the output carries nothing worth writing
    pub fn is_empty(&self) -> bool {
        match self {
            SynthesisOutput::Document(text) => text.trim().is_empty(),
            SynthesisOutput::Entities(entities) => entities.is_empty(),
        }
    }
}
