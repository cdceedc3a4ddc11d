//! Run command implementation.

use crate::cli::RunArgs;
use crate::config::SynapseConfig;
use crate::error::Result;
use crate::output::Formatter;
use std::sync::Arc;
use synapse_extractor::ExtractorRegistry;
use synapse_llm::OllamaProvider;
use synapse_pipeline::{Phase, Pipeline};
use synapse_synthesizer::synthesizer_for;
use tracing::info;

/// Execute the run command.
///
/// Returns whether the pipeline reached `Done`.
pub async fn execute_run(
    args: RunArgs,
    mut config: SynapseConfig,
    formatter: &Formatter,
) -> Result<bool> {
    config.apply_args(&args);
    config.validate()?;

    let pipeline = build_pipeline(&config)?;
    let phase = Phase::from(args.phase);
    info!(
        %phase,
        extraction_type = %config.map_phase.extraction_type,
        map_model = %config.map_phase.llm_model,
        reduce_model = %config.reduce_phase.llm_model,
        "Starting run"
    );

    let outcome = pipeline.run(phase).await;
    println!("{}", formatter.format_outcome(&outcome)?);
    Ok(outcome.is_success())
}

/// Wire providers, extractors and the synthesizer into a pipeline.
pub fn build_pipeline(config: &SynapseConfig) -> Result<Pipeline> {
    let map_llm = Arc::new(
        OllamaProvider::new(&config.llm.endpoint, &config.map_phase.llm_model)?
            .with_max_retries(config.llm.max_retries),
    );
    let reduce_llm = Arc::new(
        OllamaProvider::new(&config.llm.endpoint, &config.reduce_phase.llm_model)?
            .with_max_retries(config.llm.max_retries),
    );

    let registry = ExtractorRegistry::from_config(map_llm, &config.extractor_config());
    let synthesizer = synthesizer_for(config.map_phase.extraction_type, reduce_llm);

    Ok(Pipeline::new(&config.pipeline_config(), registry, synthesizer)?)
}
