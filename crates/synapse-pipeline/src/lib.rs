//! Synapse Pipeline
//!
//! Orchestrates the two phases of a run:
//!
//! - **Map**: load sources from typed input directories, run the registered
//!   extraction function on each one with bounded concurrency, and persist
//!   one artifact per success.
//! - **Reduce**: gather every artifact in the map directory, concatenate them
//!   with source attribution, and make a single synthesis call whose output
//!   is written as a document or as one file per profile.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use synapse_extractor::{ExtractionType, ExtractorConfig, ExtractorRegistry};
//! use synapse_llm::OllamaProvider;
//! use synapse_pipeline::{Phase, Pipeline, PipelineConfig};
//!
//! # async fn example(config: PipelineConfig) -> Result<(), Box<dyn std::error::Error>> {
//! let llm = Arc::new(OllamaProvider::new("http://localhost:11434", "llama3")?);
//! let registry = ExtractorRegistry::from_config(
//!     Arc::clone(&llm),
//!     &ExtractorConfig::from(ExtractionType::Newsletter),
//! );
//! let synthesizer = synapse_synthesizer::synthesizer_for(ExtractionType::Newsletter, llm);
//!
//! let pipeline = Pipeline::new(&config, registry, synthesizer)?;
//! let outcome = pipeline.run(Phase::Both).await;
//! println!("{:?}", outcome.state);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod controller;
mod error;
mod loader;
mod map;
pub mod naming;
mod reduce;
mod report;
mod store;

pub use config::{PipelineConfig, DEFAULT_CONCURRENCY};
pub use controller::{Phase, Pipeline, PipelineOutcome, PipelineState};
pub use error::{FailureStage, ItemFailure, PipelineError};
pub use loader::{check_dirs, load_sources, LoadedSources, SourceDir};
pub use map::MapScheduler;
pub use reduce::{concatenate, render_profile, OutputTarget, ReduceAggregator, ReduceInput};
pub use report::{MapReport, MapSuccess, ReduceReport};
pub use store::{compare_artifact_names, ArtifactStore};
