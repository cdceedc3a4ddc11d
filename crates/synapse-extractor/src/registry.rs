//! Source kind → extraction function table

use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::extractor::PromptExtractor;
use crate::prompt::PromptTemplate;
use crate::timeout::TimeoutExtractor;
use std::collections::HashMap;
use std::sync::Arc;
use synapse_domain::{DocumentExtractor, LlmProvider, SourceKind};
use tracing::debug;

/// Extraction functions indexed by source kind
///
/// Built once at startup and shared read-only by every map task.
#[derive(Clone, Default)]
pub struct ExtractorRegistry {
    extractors: HashMap<SourceKind, Arc<dyn DocumentExtractor>>,
}

impl ExtractorRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register prompt extractors for every source kind
    ///
    /// Each extractor is wrapped in a [`TimeoutExtractor`] when the configuration
    /// sets a timeout.
    pub fn from_config<L>(llm_provider: Arc<L>, config: &ExtractorConfig) -> Self
    where
        L: LlmProvider + 'static,
    {
        let mut registry = Self::new();
        for kind in SourceKind::ALL {
            let template = PromptTemplate::for_kind(config.extraction_type, kind);
            let extractor =
                PromptExtractor::new(Arc::clone(&llm_provider), template, config.max_text_length);

            match config.extraction_timeout() {
                Some(limit) => registry.register(kind, TimeoutExtractor::new(extractor, limit)),
                None => registry.register(kind, extractor),
            }
        }
        debug!(
            extraction_type = %config.extraction_type,
            kinds = registry.extractors.len(),
            "Extractor registry built"
        );
        registry
    }

    /// Register (or replace) the extractor for a kind
    pub fn register<E>(&mut self, kind: SourceKind, extractor: E)
    where
        E: DocumentExtractor + 'static,
    {
        self.extractors.insert(kind, Arc::new(extractor));
    }

    /// Builder-style [`ExtractorRegistry::register`]
    pub fn with<E>(mut self, kind: SourceKind, extractor: E) -> Self
    where
        E: DocumentExtractor + 'static,
    {
        self.register(kind, extractor);
        self
    }

    /// Look up the extractor for a kind
    pub fn get(&self, kind: SourceKind) -> Result<Arc<dyn DocumentExtractor>, ExtractorError> {
        self.extractors
            .get(&kind)
            .cloned()
            .ok_or(ExtractorError::UnsupportedKind(kind))
    }

    /// Whether an extractor is registered for a kind
    pub fn supports(&self, kind: SourceKind) -> bool {
        self.extractors.contains_key(&kind)
    }
}

impl std::fmt::Debug for ExtractorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut kinds: Vec<_> = self.extractors.keys().collect();
        kinds.sort();
        f.debug_struct("ExtractorRegistry").field("kinds", &kinds).finish()
    }
}
