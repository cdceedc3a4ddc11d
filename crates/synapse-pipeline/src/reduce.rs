//! Reduce phase: aggregate artifacts and synthesize the final output

use crate::error::PipelineError;
use crate::naming::unique_slugs;
use crate::report::ReduceReport;
use crate::store::{write_atomic, ArtifactStore};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Instant;
use synapse_domain::{EntityProfile, MapArtifact, SynthesisError, SynthesisOutput, Synthesizer};
use tracing::{debug, info, info_span, warn, Instrument};

const BLOCK_SEPARATOR: &str = "\n\n";

/// Where reduce output goes
///
/// A document result is written to `document`; entity results are written
/// one file per profile under `profiles_dir`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputTarget {
    /// File for unstructured output
    pub document: PathBuf,
    /// Directory for structured output
    pub profiles_dir: PathBuf,
}

/// Artifacts gathered for one synthesis call
#[derive(Debug, Clone)]
pub struct ReduceInput {
    artifacts: Vec<MapArtifact>,
}

impl ReduceInput {
    /// Labels of the gathered artifacts, in order
    pub fn labels(&self) -> Vec<String> {
        self.artifacts.iter().map(|a| a.label().to_string()).collect()
    }

    /// Number of artifacts
    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    /// Always false; construction requires at least one artifact
    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    /// Concatenated synthesis input
    pub fn text(&self) -> String {
        concatenate(&self.artifacts)
    }
}

/// Join artifacts into one text, each block headed by its attribution line
pub fn concatenate(artifacts: &[MapArtifact]) -> String {
    artifacts
        .iter()
        .map(|a| format!("## Source: {}\n\n{}", a.label(), a.content))
        .collect::<Vec<_>>()
        .join(BLOCK_SEPARATOR)
}

/// Render a profile as markdown with YAML front matter
pub fn render_profile(profile: &EntityProfile) -> Result<String, PipelineError> {
    let front_matter = serde_yaml::to_string(&profile.metadata).map_err(|e| {
        PipelineError::Synthesis(SynthesisError::Malformed(format!(
            "profile '{}' metadata: {}",
            profile.key(),
            e
        )))
    })?;
    Ok(format!(
        "---\n{}---\n\n{}\n",
        front_matter,
        profile.content.trim_end()
    ))
}

/// Reads every artifact in the map directory and runs one synthesis call
///
/// Reduce does not know which map run produced an artifact; stale files from
/// earlier runs are included alongside fresh ones.
#[derive(Debug, Clone)]
pub struct ReduceAggregator {
    store: ArtifactStore,
    target: OutputTarget,
}

impl ReduceAggregator {
    /// Create an aggregator reading from `store` and writing to `target`
    pub fn new(store: ArtifactStore, target: OutputTarget) -> Self {
        Self { store, target }
    }

    /// Output target
    pub fn target(&self) -> &OutputTarget {
        &self.target
    }

    /// Gather the non-blank artifacts in reduce order
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::EmptyMapOutput`] if nothing usable is on disk.
    pub async fn gather(&self) -> Result<ReduceInput, PipelineError> {
        let all = self.store.list().await?;
        let total = all.len();
        let artifacts: Vec<MapArtifact> = all.into_iter().filter(|a| !a.is_blank()).collect();

        if artifacts.len() < total {
            warn!(skipped = total - artifacts.len(), "Ignoring blank artifacts");
        }
        if artifacts.is_empty() {
            return Err(PipelineError::EmptyMapOutput {
                dir: self.store.dir().to_path_buf(),
            });
        }

        debug!(artifacts = artifacts.len(), "Artifacts gathered");
        Ok(ReduceInput { artifacts })
    }

    /// Synthesize once from gathered input and write the result
    pub async fn synthesize(
        &self,
        input: ReduceInput,
        synthesizer: &dyn Synthesizer,
    ) -> Result<ReduceReport, PipelineError> {
        let started = Instant::now();
        let text = input.text();
        info!(
            artifacts = input.len(),
            input_chars = text.len(),
            "Reduce phase started"
        );

        let output = synthesizer
            .synthesize(&text)
            .instrument(info_span!("reduce", artifacts = input.len()))
            .await?;
        if output.is_empty() {
            return Err(SynthesisError::Malformed("synthesis returned no content".to_string()).into());
        }

        let written = match output {
            SynthesisOutput::Document(document) => {
                vec![self.write_document(&document).await?]
            }
            SynthesisOutput::Entities(profiles) => self.write_profiles(&profiles).await?,
        };

        let report = ReduceReport {
            inputs: input.labels(),
            written,
            elapsed_ms: started.elapsed().as_millis() as u64,
        };
        info!(
            files = report.written.len(),
            elapsed_ms = report.elapsed_ms,
            "Reduce phase finished"
        );
        Ok(report)
    }

    /// [`gather`](Self::gather) then [`synthesize`](Self::synthesize)
    pub async fn run(&self, synthesizer: &dyn Synthesizer) -> Result<ReduceReport, PipelineError> {
        let input = self.gather().await?;
        self.synthesize(input, synthesizer).await
    }

    async fn write_document(&self, document: &str) -> Result<PathBuf, PipelineError> {
        let path = &self.target.document;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            create_dir(parent).await?;
        }
        write_atomic(path, document)
            .await
            .map_err(|e| PipelineError::io(path, e))?;
        info!(path = %path.display(), "Document written");
        Ok(path.clone())
    }

    async fn write_profiles(&self, profiles: &[EntityProfile]) -> Result<Vec<PathBuf>, PipelineError> {
        let dir = &self.target.profiles_dir;
        create_dir(dir).await?;

        let slugs = unique_slugs(profiles.iter().map(EntityProfile::key));
        let mut written = Vec::with_capacity(profiles.len());
        for (profile, slug) in profiles.iter().zip(slugs) {
            let path = dir.join(format!("{}.md", slug));
            let rendered = render_profile(profile)?;
            write_atomic(&path, &rendered)
                .await
                .map_err(|e| PipelineError::io(&path, e))?;
            debug!(name = profile.key(), path = %path.display(), "Profile written");
            written.push(path);
        }
        info!(profiles = written.len(), dir = %dir.display(), "Profiles written");
        Ok(written)
    }
}

async fn create_dir(dir: &Path) -> Result<(), PipelineError> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| PipelineError::io(dir, e))
}
