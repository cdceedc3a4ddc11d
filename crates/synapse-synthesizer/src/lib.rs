//! Synapse Synthesizer
//!
//! Reduce-phase synthesis functions. Each takes the concatenated map artifacts and
//! makes exactly one LLM call.
//!
//! - [`NewsletterSynthesizer`]: returns the model's markdown verbatim
//!   ([`SynthesisOutput::Document`])
//! - [`ProfileSynthesizer`]: asks for a JSON array of person profiles and parses it
//!   into [`SynthesisOutput::Entities`]; a response that does not match the schema
//!   is reported as [`SynthesisError::Malformed`], never as a call failure
//!
//! [`SynthesisOutput::Document`]: synapse_domain::SynthesisOutput::Document
//! [`SynthesisOutput::Entities`]: synapse_domain::SynthesisOutput::Entities
//! [`SynthesisError::Malformed`]: synapse_domain::SynthesisError::Malformed

#![warn(missing_docs)]

mod newsletter;
mod parser;
mod profiles;
mod prompt;

use std::sync::Arc;
use synapse_domain::{LlmProvider, Synthesizer};
use synapse_extractor::ExtractionType;

pub use newsletter::NewsletterSynthesizer;
pub use parser::parse_profiles;
pub use profiles::ProfileSynthesizer;

/// Synthesis function matching an extraction type
pub fn synthesizer_for<L>(extraction_type: ExtractionType, llm_provider: Arc<L>) -> Arc<dyn Synthesizer>
where
    L: LlmProvider + 'static,
{
    match extraction_type {
        ExtractionType::Newsletter => Arc::new(NewsletterSynthesizer::new(llm_provider)),
        ExtractionType::PersonProfiles => Arc::new(ProfileSynthesizer::new(llm_provider)),
    }
}
