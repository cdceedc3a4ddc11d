//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the pipeline and the services it
//! calls. Implementations live in other crates (synapse-llm, synapse-extractor,
//! synapse-synthesizer) or in tests.

use crate::{SourceDocument, SynthesisError, SynthesisOutput};
use async_trait::async_trait;

/// Boxed error returned by extraction functions
///
/// The map scheduler treats every extraction failure the same way, so the
/// concrete error type is erased at this seam.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Transforms one document into extracted markdown
///
/// Implemented by the application layer (synapse-extractor). Implementations
/// must be shareable across concurrently running map tasks.
#[async_trait]
pub trait DocumentExtractor: Send + Sync {
    /// Extract markdown content from a document
    async fn extract(&self, document: &SourceDocument) -> Result<String, BoxError>;
}

/// Turns the concatenated map artifacts into the final output
///
/// Implemented by the application layer (synapse-synthesizer)
#[async_trait]
pub trait Synthesizer: Send + Sync {
    /// Synthesize the final output from concatenated artifact text
    async fn synthesize(&self, input: &str) -> Result<SynthesisOutput, SynthesisError>;
}

/// Trait for LLM provider operations
///
/// Implemented by the infrastructure layer (synapse-llm)
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Error type for LLM operations
    type Error: std::error::Error + Send + Sync + 'static;

    /// Generate a completion for `prompt` under the given system instructions
    async fn generate(&self, system: &str, prompt: &str) -> Result<String, Self::Error>;

    /// Name of the model answering the calls, for logging
    fn model_name(&self) -> &str;
}

#[async_trait]
impl<T: DocumentExtractor + ?Sized> DocumentExtractor for std::sync::Arc<T> {
    async fn extract(&self, document: &SourceDocument) -> Result<String, BoxError> {
        (**self).extract(document).await
    }
}

#[async_trait]
impl<T: Synthesizer + ?Sized> Synthesizer for std::sync::Arc<T> {
    async fn synthesize(&self, input: &str) -> Result<SynthesisOutput, SynthesisError> {
        (**self).synthesize(input).await
    }
}
