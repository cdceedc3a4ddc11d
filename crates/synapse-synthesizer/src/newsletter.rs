//! Unstructured newsletter synthesis

use crate::prompt::{newsletter_prompt, NEWSLETTER_SYSTEM};
use async_trait::async_trait;
use std::sync::Arc;
use synapse_domain::{LlmProvider, SynthesisError, SynthesisOutput, Synthesizer};
use tracing::info;

/// Synthesizes a single newsletter document from all extracts
pub struct NewsletterSynthesizer<L> {
    llm_provider: Arc<L>,
}

impl<L: LlmProvider> NewsletterSynthesizer<L> {
    /// Create a new synthesizer around a shared provider
    pub fn new(llm_provider: Arc<L>) -> Self {
        Self { llm_provider }
    }
}

#[async_trait]
impl<L> Synthesizer for NewsletterSynthesizer<L>
where
    L: LlmProvider + 'static,
{
    async fn synthesize(&self, input: &str) -> Result<SynthesisOutput, SynthesisError> {
        let prompt = newsletter_prompt(input);
        let document = self
            .llm_provider
            .generate(NEWSLETTER_SYSTEM, &prompt)
            .await
            .map_err(|e| SynthesisError::Call(e.to_string()))?;

        info!(
            model = self.llm_provider.model_name(),
            output_chars = document.len(),
            "Newsletter synthesized"
        );
        Ok(SynthesisOutput::Document(document))
    }
}
