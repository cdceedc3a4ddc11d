//! Phase reports

use crate::error::ItemFailure;
use serde::Serialize;
use std::path::PathBuf;

/// A source that was extracted and persisted
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MapSuccess {
    /// Source identity
    pub source: PathBuf,
    /// Artifact file name in the map output directory
    pub artifact: String,
}

/// Outcome of one map phase
///
/// Every input document lands in exactly one of `succeeded` or `failures`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MapReport {
    /// Persisted sources, in input order
    pub succeeded: Vec<MapSuccess>,
    /// Failed sources, load failures first
    pub failures: Vec<ItemFailure>,
    /// Wall-clock duration of the phase in milliseconds
    pub elapsed_ms: u64,
}

impl MapReport {
    /// Create an empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of persisted artifacts
    pub fn succeeded_count(&self) -> usize {
        self.succeeded.len()
    }

    /// Number of failed items
    pub fn failed_count(&self) -> usize {
        self.failures.len()
    }

    /// Number of items processed
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failures.len()
    }

    /// Generate a human-readable summary
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Map phase".to_string(),
            format!("Processed: {}", self.total()),
            format!("Succeeded: {}", self.succeeded_count()),
            format!("Failed: {}", self.failed_count()),
        ];
        for failure in &self.failures {
            lines.push(format!("  {}", failure));
        }
        lines.join("\n")
    }
}

/// Outcome of one reduce phase
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReduceReport {
    /// Labels of the artifacts fed to synthesis, in order
    pub inputs: Vec<String>,
    /// Files written
    pub written: Vec<PathBuf>,
    /// Wall-clock duration of the phase in milliseconds
    pub elapsed_ms: u64,
}

impl ReduceReport {
    /// Generate a human-readable summary
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Reduce phase".to_string(),
            format!("Artifacts used: {}", self.inputs.len()),
            format!("Files written: {}", self.written.len()),
        ];
        for path in &self.written {
            lines.push(format!("  {}", path.display()));
        }
        lines.join("\n")
    }
}
