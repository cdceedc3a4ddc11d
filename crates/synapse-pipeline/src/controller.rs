//! Pipeline controller: sequences map and reduce
//!
//! ```text
//! NotStarted → MapRunning → MapDone → ReduceRunning → Done
//!                  ↓            ↓           ↓
//!                Failed       Failed      Failed
//! ```
//!
//! Reduce-only runs go straight from `NotStarted` to `ReduceRunning`; map-only
//! runs go from `MapDone` to `Done`. Per-item failures never move the state to
//! `Failed`.

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::loader::{check_dirs, load_sources, SourceDir};
use crate::map::MapScheduler;
use crate::reduce::ReduceAggregator;
use crate::report::{MapReport, ReduceReport};
use crate::store::ArtifactStore;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use synapse_domain::Synthesizer;
use synapse_extractor::ExtractorRegistry;
use tracing::{error, info};

/// Which phases to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Extraction only
    Map,
    /// Synthesis over whatever artifacts exist
    Reduce,
    /// Map then reduce
    #[default]
    Both,
}

impl Phase {
    /// Whether the map phase runs
    pub fn runs_map(&self) -> bool {
        matches!(self, Phase::Map | Phase::Both)
    }

    /// Whether the reduce phase runs
    pub fn runs_reduce(&self) -> bool {
        matches!(self, Phase::Reduce | Phase::Both)
    }

    /// String form
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Map => "map",
            Phase::Reduce => "reduce",
            Phase::Both => "both",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Phase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "map" => Ok(Phase::Map),
            "reduce" => Ok(Phase::Reduce),
            "both" | "all" => Ok(Phase::Both),
            _ => Err(format!("Invalid phase: {}", s)),
        }
    }
}

/// Controller state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    /// Nothing has run yet
    NotStarted,
    /// Map tasks in flight
    MapRunning,
    /// All map tasks settled
    MapDone,
    /// Synthesis in flight
    ReduceRunning,
    /// Requested phases completed
    Done,
    /// A fatal error ended the run
    Failed,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PipelineState::NotStarted => "not_started",
            PipelineState::MapRunning => "map_running",
            PipelineState::MapDone => "map_done",
            PipelineState::ReduceRunning => "reduce_running",
            PipelineState::Done => "done",
            PipelineState::Failed => "failed",
        })
    }
}

/// Result of a pipeline run
#[derive(Debug)]
pub struct PipelineOutcome {
    /// Phases requested
    pub phase: Phase,
    /// Terminal state (`Done` or `Failed`)
    pub state: PipelineState,
    /// Every state entered, in order, starting with `NotStarted`
    pub transitions: Vec<PipelineState>,
    /// Map report, if map ran to completion
    pub map: Option<MapReport>,
    /// Reduce report, if reduce ran to completion
    pub reduce: Option<ReduceReport>,
    /// Fatal error, if the run failed
    pub error: Option<PipelineError>,
}

impl PipelineOutcome {
    fn new(phase: Phase) -> Self {
        Self {
            phase,
            state: PipelineState::NotStarted,
            transitions: vec![PipelineState::NotStarted],
            map: None,
            reduce: None,
            error: None,
        }
    }

    /// Whether every requested phase completed
    pub fn is_success(&self) -> bool {
        self.state == PipelineState::Done
    }

    /// Artifacts written by this run's map phase
    pub fn artifacts_written(&self) -> usize {
        self.map.as_ref().map_or(0, MapReport::succeeded_count)
    }

    /// Items that failed during this run's map phase
    pub fn items_failed(&self) -> usize {
        self.map.as_ref().map_or(0, MapReport::failed_count)
    }

    fn enter(&mut self, state: PipelineState) {
        info!(from = %self.state, to = %state, "Pipeline state changed");
        self.state = state;
        self.transitions.push(state);
    }

    fn fail(mut self, err: PipelineError) -> Self {
        error!(state = %self.state, error = %err, "Pipeline failed");
        self.enter(PipelineState::Failed);
        self.error = Some(err);
        self
    }
}

/// Runs the map and reduce phases against one configuration
pub struct Pipeline {
    sources: Vec<SourceDir>,
    scheduler: MapScheduler,
    aggregator: ReduceAggregator,
    registry: ExtractorRegistry,
    synthesizer: Arc<dyn Synthesizer>,
}

impl Pipeline {
    /// Build a pipeline from validated configuration and resolved functions
    pub fn new(
        config: &PipelineConfig,
        registry: ExtractorRegistry,
        synthesizer: Arc<dyn Synthesizer>,
    ) -> Result<Self, PipelineError> {
        config.validate()?;
        let store = ArtifactStore::new(&config.map_dir);
        Ok(Self {
            sources: config.sources.clone(),
            scheduler: MapScheduler::new(store.clone(), config.concurrency)?,
            aggregator: ReduceAggregator::new(store, config.output.clone()),
            registry,
            synthesizer,
        })
    }

    /// Run the requested phases
    ///
    /// Never returns an error directly; a fatal error is carried in the
    /// outcome with state [`PipelineState::Failed`].
    pub async fn run(&self, phase: Phase) -> PipelineOutcome {
        let mut outcome = PipelineOutcome::new(phase);
        info!(%phase, "Pipeline run started");

        if phase.runs_map() {
            if let Err(e) = check_dirs(&self.sources) {
                return outcome.fail(e);
            }
            outcome.enter(PipelineState::MapRunning);

            let loaded = match load_sources(&self.sources).await {
                Ok(loaded) => loaded,
                Err(e) => return outcome.fail(e),
            };
            match self.scheduler.run(loaded, &self.registry).await {
                Ok(report) => outcome.map = Some(report),
                Err(e) => return outcome.fail(e),
            }
            outcome.enter(PipelineState::MapDone);

            if !phase.runs_reduce() {
                outcome.enter(PipelineState::Done);
                return outcome;
            }
        }

        let input = match self.aggregator.gather().await {
            Ok(input) => input,
            Err(e) => return outcome.fail(e),
        };
        outcome.enter(PipelineState::ReduceRunning);

        match self
            .aggregator
            .synthesize(input, self.synthesizer.as_ref())
            .await
        {
            Ok(report) => {
                outcome.reduce = Some(report);
                outcome.enter(PipelineState::Done);
            }
            Err(e) => return outcome.fail(e),
        }
        outcome
    }
}
