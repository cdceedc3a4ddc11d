//! Error types for the Extractor

use synapse_domain::SourceKind;
use thiserror::Error;

/// Errors that can occur during extraction
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// LLM provider error
    #[error("LLM error: {0}")]
    Llm(String),

    /// Document exceeds maximum length
    #[error("Text too long: {0} chars (max: {1})")]
    TextTooLong(usize, usize),

    /// Extraction timeout
    #[error("Extraction timed out after {0}s")]
    Timeout(u64),

    /// LLM returned nothing usable
    #[error("Empty extraction output for {0}")]
    EmptyOutput(String),

    /// LLM reported that the document holds nothing to extract
    #[error("Nothing to extract from {0}")]
    NothingFound(String),

    /// No extractor registered for a source kind
    #[error("No extractor registered for source kind '{0}'")]
    UnsupportedKind(SourceKind),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
