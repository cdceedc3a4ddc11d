//! Structured person-profile synthesis

use crate::parser::parse_profiles;
use crate::prompt::{profiles_prompt, PROFILES_SYSTEM};
use async_trait::async_trait;
use std::sync::Arc;
use synapse_domain::{LlmProvider, SynthesisError, SynthesisOutput, Synthesizer};
use tracing::{info, warn};

/// Synthesizes one profile per person identified across all extracts
pub struct ProfileSynthesizer<L> {
    llm_provider: Arc<L>,
}

impl<L: LlmProvider> ProfileSynthesizer<L> {
    /// Create a new synthesizer around a shared provider
    pub fn new(llm_provider: Arc<L>) -> Self {
        Self { llm_provider }
    }
}

#[async_trait]
impl<L> Synthesizer for ProfileSynthesizer<L>
where
    L: LlmProvider + 'static,
{
    async fn synthesize(&self, input: &str) -> Result<SynthesisOutput, SynthesisError> {
        let prompt = profiles_prompt(input);
        let response = self
            .llm_provider
            .generate(PROFILES_SYSTEM, &prompt)
            .await
            .map_err(|e| SynthesisError::Call(e.to_string()))?;

        let profiles = parse_profiles(&response).inspect_err(|e| {
            warn!(response_chars = response.len(), error = %e, "Profile response failed validation");
        })?;

        info!(
            model = self.llm_provider.model_name(),
            profiles = profiles.len(),
            "Profiles synthesized"
        );
        Ok(SynthesisOutput::Entities(profiles))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use synapse_llm::MockProvider;

    #[tokio::test]
    async fn test_parses_entities() {
        let llm = MockProvider::new(
            r###"[{"metadata": {"name": "Alice", "role": "PM"}, "content": "## Alice"}]"###,
        );
        let synthesizer = ProfileSynthesizer::new(Arc::new(llm));

        match synthesizer.synthesize("notes").await.unwrap() {
            SynthesisOutput::Entities(profiles) => {
                assert_eq!(profiles.len(), 1);
                assert_eq!(profiles[0].metadata.role, "PM");
            }
            other => panic!("Expected entities, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_content_is_not_a_call_failure() {
        let llm = MockProvider::new("Sorry, I can't help with that.");
        let synthesizer = ProfileSynthesizer::new(Arc::new(llm));

        let result = synthesizer.synthesize("notes").await;
        assert!(matches!(result, Err(SynthesisError::Malformed(_))));
    }

    #[tokio::test]
    async fn test_call_failure() {
        let mut llm = MockProvider::default();
        llm.add_error("notes");
        let synthesizer = ProfileSynthesizer::new(Arc::new(llm));

        let result = synthesizer.synthesize("notes").await;
        assert!(matches!(result, Err(SynthesisError::Call(_))));
    }
}
