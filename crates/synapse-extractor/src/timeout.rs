//! Per-call timeout layered at the extractor boundary

use crate::error::ExtractorError;
use async_trait::async_trait;
use std::time::Duration;
use synapse_domain::{BoxError, DocumentExtractor, SourceDocument};
use tokio::time::timeout;

/// Wraps an extractor so each call fails with [`ExtractorError::Timeout`]
/// once `limit` elapses. The scheduler sees it as an ordinary item failure.
pub struct TimeoutExtractor<E> {
    inner: E,
    limit: Duration,
}

impl<E> TimeoutExtractor<E> {
    /// Wrap `inner` with a per-call time limit
    pub fn new(inner: E, limit: Duration) -> Self {
        Self { inner, limit }
    }
}

#[async_trait]
impl<E> DocumentExtractor for TimeoutExtractor<E>
where
    E: DocumentExtractor,
{
    async fn extract(&self, document: &SourceDocument) -> Result<String, BoxError> {
        match timeout(self.limit, self.inner.extract(document)).await {
            Ok(result) => result,
            Err(_) => Err(ExtractorError::Timeout(self.limit.as_secs()).into()),
        }
    }
}
