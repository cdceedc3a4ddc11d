//! Synapse Extractor
//!
//! Map-phase extraction functions: turn one source document into markdown via an LLM.
//!
//! # Overview
//!
//! Every source kind (meeting transcript, chat export) has an extraction function
//! per extraction type (newsletter, person profiles). The [`ExtractorRegistry`]
//! resolves the `{kind → extractor}` table once at startup; the map scheduler then
//! looks extractors up by kind without any per-call dispatch logic.
//!
//! # Architecture
//!
//! ```text
//! SourceDocument → Registry[kind] → (Timeout) → PromptExtractor → LLM → markdown
//! ```
//!
//! # Example Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use synapse_domain::{DocumentExtractor, SourceDocument, SourceKind};
//! use synapse_extractor::{ExtractorConfig, ExtractorRegistry};
//! use synapse_llm::MockProvider;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//! let llm = Arc::new(MockProvider::new("## Key Decisions & Outcomes\n- Ship it"));
//! let registry = ExtractorRegistry::from_config(llm, &ExtractorConfig::default());
//!
//! let doc = SourceDocument::new("standup.txt", SourceKind::Meeting, "We will ship it.");
//! let markdown = registry.get(doc.kind())?.extract(&doc).await?;
//! println!("{}", markdown);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod extractor;
mod prompt;
mod registry;
mod timeout;

pub use config::{ExtractionType, ExtractorConfig};
pub use error::ExtractorError;
pub use extractor::PromptExtractor;
pub use prompt::{PromptTemplate, NO_KEY_PERSONS};
pub use registry::ExtractorRegistry;
pub use timeout::TimeoutExtractor;
