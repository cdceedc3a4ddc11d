//! Synapse Domain Layer
//!
//! Core data model and trait interfaces for the extract-then-synthesize pipeline.
//! Infrastructure (LLM backends, filesystem, CLI) lives in other crates and depends
//! on the types defined here.
//!
//! ## Key Concepts
//!
//! - **SourceDocument**: A loaded text file tagged with its source kind
//! - **MapArtifact**: A persisted per-source extraction result
//! - **SynthesisOutput**: The final document, either unstructured markdown or a
//!   list of structured entity profiles
//!
//! ## Architecture
//!
//! - No I/O in this crate
//! - Trait definitions for every external call (extraction, synthesis, LLM)

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod artifact;
pub mod source;
pub mod synthesis;
pub mod traits;

// Re-exports for convenience
pub use artifact::MapArtifact;
pub use source::{SourceDocument, SourceKind};
pub use synthesis::{EntityProfile, ProfileMetadata, SynthesisError, SynthesisOutput};
pub use traits::{BoxError, DocumentExtractor, LlmProvider, Synthesizer};
