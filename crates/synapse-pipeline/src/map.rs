//! Map phase: bounded concurrent extraction
//!
//! Every document gets its own task. A semaphore caps how many extraction
//! calls are in flight; the permit is released before the artifact is
//! written so slow disks never hold up the next call. One task failing or
//! panicking never affects its siblings.

use crate::error::{FailureStage, ItemFailure, PipelineError};
use crate::loader::LoadedSources;
use crate::naming;
use crate::report::{MapReport, MapSuccess};
use crate::store::ArtifactStore;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use synapse_domain::{DocumentExtractor, MapArtifact, SourceDocument};
use synapse_extractor::ExtractorRegistry;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{debug, info, info_span, warn, Instrument};

type ItemResult = Result<MapSuccess, ItemFailure>;

/// Runs extraction over a batch with at most `concurrency` calls in flight
#[derive(Debug, Clone)]
pub struct MapScheduler {
    store: ArtifactStore,
    concurrency: usize,
}

impl MapScheduler {
    /// Create a scheduler writing into `store`
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Config`] if `concurrency` is zero.
    pub fn new(store: ArtifactStore, concurrency: usize) -> Result<Self, PipelineError> {
        if concurrency == 0 {
            return Err(PipelineError::Config(
                "concurrency must be at least 1".to_string(),
            ));
        }
        Ok(Self { store, concurrency })
    }

    /// Concurrency bound
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Artifact store the scheduler writes into
    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    /// Process a loaded batch
    ///
    /// Load failures carried in `sources` are copied into the report first.
    /// Only directory creation and name planning are fatal; everything else is
    /// recorded per item.
    pub async fn run(
        &self,
        sources: LoadedSources,
        registry: &ExtractorRegistry,
    ) -> Result<MapReport, PipelineError> {
        let started = Instant::now();
        self.store.ensure_dir().await?;

        let paths: Vec<PathBuf> = sources
            .documents
            .iter()
            .map(|d| d.source().to_path_buf())
            .collect();
        let names = naming::plan_for(&paths)?;

        info!(
            documents = sources.documents.len(),
            concurrency = self.concurrency,
            dir = %self.store.dir().display(),
            "Map phase started"
        );

        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut report = MapReport {
            failures: sources.failures,
            ..MapReport::default()
        };

        let mut handles: Vec<(PathBuf, JoinHandle<ItemResult>)> = Vec::new();
        for (document, artifact_name) in sources.documents.into_iter().zip(names) {
            let source = document.source().to_path_buf();
            let extractor = match registry.get(document.kind()) {
                Ok(extractor) => extractor,
                Err(e) => {
                    warn!(source = %source.display(), error = %e, "No extractor for source");
                    report
                        .failures
                        .push(ItemFailure::new(source, FailureStage::Extract, e));
                    continue;
                }
            };

            let span = info_span!("map_item", source = %source.display(), kind = %document.kind());
            let task = process_item(
                document,
                artifact_name,
                extractor,
                Arc::clone(&semaphore),
                self.store.clone(),
            );
            handles.push((source, tokio::spawn(task.instrument(span))));
        }

        for (source, handle) in handles {
            match handle.await {
                Ok(Ok(success)) => report.succeeded.push(success),
                Ok(Err(failure)) => report.failures.push(failure),
                Err(e) => {
                    warn!(source = %source.display(), error = %e, "Map task aborted");
                    report.failures.push(ItemFailure::new(
                        source,
                        FailureStage::Extract,
                        format!("task aborted: {}", e),
                    ));
                }
            }
        }

        report.elapsed_ms = started.elapsed().as_millis() as u64;
        info!(
            succeeded = report.succeeded_count(),
            failed = report.failed_count(),
            elapsed_ms = report.elapsed_ms,
            "Map phase finished"
        );
        Ok(report)
    }
}

async fn process_item(
    document: SourceDocument,
    artifact_name: String,
    extractor: Arc<dyn DocumentExtractor>,
    semaphore: Arc<Semaphore>,
    store: ArtifactStore,
) -> ItemResult {
    let source = document.source().to_path_buf();

    let extracted = {
        let _permit = semaphore
            .acquire_owned()
            .await
            .map_err(|e| ItemFailure::new(&source, FailureStage::Extract, e))?;
        debug!("Extraction started");
        extractor.extract(&document).await
    };

    let content = match extracted {
        Ok(content) if content.trim().is_empty() => {
            warn!("Extractor returned no content");
            return Err(ItemFailure::new(
                source,
                FailureStage::Extract,
                "extractor returned no content",
            ));
        }
        Ok(content) => content,
        Err(e) => {
            warn!(error = %e, "Extraction failed");
            return Err(ItemFailure::new(source, FailureStage::Extract, e));
        }
    };

    let artifact = MapArtifact::new(artifact_name, content);
    match store.write(&artifact).await {
        Ok(path) => {
            info!(artifact = %path.display(), "Source mapped");
            Ok(MapSuccess {
                source,
                artifact: artifact.file_name,
            })
        }
        Err(e) => {
            warn!(error = %e, "Failed to persist artifact");
            Err(ItemFailure::new(source, FailureStage::Persist, e))
        }
    }
}
