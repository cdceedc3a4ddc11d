//! LLM-backed extraction function

use crate::error::ExtractorError;
use crate::prompt::PromptTemplate;
use async_trait::async_trait;
use std::sync::Arc;
use synapse_domain::{BoxError, DocumentExtractor, LlmProvider, SourceDocument};
use tracing::{debug, info};

/// Extracts markdown from a document by prompting an LLM
pub struct PromptExtractor<L>
where
    L: LlmProvider,
{
    llm_provider: Arc<L>,
    template: PromptTemplate,
    max_text_length: usize,
}

impl<L> PromptExtractor<L>
where
    L: LlmProvider,
{
    /// Create a new extractor around a shared provider
    pub fn new(llm_provider: Arc<L>, template: PromptTemplate, max_text_length: usize) -> Self {
        Self {
            llm_provider,
            template,
            max_text_length,
        }
    }

    /// Run the extraction, keeping the concrete error type
    pub async fn run(&self, document: &SourceDocument) -> Result<String, ExtractorError> {
        let text = document.content();
        if text.len() > self.max_text_length {
            return Err(ExtractorError::TextTooLong(text.len(), self.max_text_length));
        }

        let source_name = document.file_name();
        let prompt = self.template.render(&source_name, text);
        debug!(source = %source_name, prompt_chars = prompt.len(), "Built extraction prompt");

        let output = self
            .llm_provider
            .generate(self.template.system, &prompt)
            .await
            .map_err(|e| ExtractorError::Llm(e.to_string()))?;

        if output.trim().is_empty() {
            return Err(ExtractorError::EmptyOutput(source_name));
        }
        if self.template.is_nothing_found(&output) {
            info!(source = %source_name, "No key persons identified");
            return Err(ExtractorError::NothingFound(source_name));
        }

        info!(
            source = %source_name,
            kind = %document.kind(),
            model = self.llm_provider.model_name(),
            output_chars = output.len(),
            "Extraction complete"
        );
        Ok(output)
    }
}

#[async_trait]
impl<L> DocumentExtractor for PromptExtractor<L>
where
    L: LlmProvider + 'static,
{
    async fn extract(&self, document: &SourceDocument) -> Result<String, BoxError> {
        Ok(self.run(document).await?)
    }
}
