//! Output formatting for the CLI.

use crate::cli::CliFormat;
use crate::error::Result;
use colored::*;
use synapse_pipeline::{PipelineOutcome, PipelineState};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: CliFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: CliFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format the result of a pipeline run.
    pub fn format_outcome(&self, outcome: &PipelineOutcome) -> Result<String> {
        match self.format {
            CliFormat::Json => self.format_outcome_json(outcome),
            CliFormat::Text => Ok(self.format_outcome_text(outcome)),
        }
    }

    fn format_outcome_json(&self, outcome: &PipelineOutcome) -> Result<String> {
        let value = serde_json::json!({
            "phase": outcome.phase,
            "state": outcome.state,
            "success": outcome.is_success(),
            "transitions": outcome.transitions,
            "map": outcome.map,
            "reduce": outcome.reduce,
            "error": outcome.error.as_ref().map(|e| e.to_string()),
        });
        Ok(serde_json::to_string_pretty(&value)?)
    }

    fn format_outcome_text(&self, outcome: &PipelineOutcome) -> String {
        let mut sections = Vec::new();

        if let Some(map) = &outcome.map {
            sections.push(self.info(&format!(
                "Map: {} processed, {} succeeded, {} failed ({} ms)",
                map.total(),
                map.succeeded_count(),
                map.failed_count(),
                map.elapsed_ms
            )));

            if !map.failures.is_empty() {
                let mut builder = Builder::default();
                builder.push_record(["Source", "Stage", "Reason"]);
                for failure in &map.failures {
                    builder.push_record([
                        failure.source.display().to_string(),
                        failure.stage.to_string(),
                        failure.reason.clone(),
                    ]);
                }
                let mut table = builder.build();
                table
                    .with(Style::rounded())
                    .with(Modify::new(Rows::first()).with(Alignment::center()));
                sections.push(self.warning("Failed items:"));
                sections.push(table.to_string());
            }
        }

        if let Some(reduce) = &outcome.reduce {
            sections.push(self.info(&format!(
                "Reduce: {} artifact(s) synthesized into {} file(s) ({} ms)",
                reduce.inputs.len(),
                reduce.written.len(),
                reduce.elapsed_ms
            )));
            for path in &reduce.written {
                sections.push(format!("  {}", path.display()));
            }
        }

        match (&outcome.state, &outcome.error) {
            (PipelineState::Done, _) => {
                sections.push(self.success(&format!("Pipeline finished ({})", outcome.phase)))
            }
            (_, Some(error)) => sections.push(self.error(&format!("Pipeline failed: {}", error))),
            (state, None) => sections.push(self.error(&format!("Pipeline stopped in state {}", state))),
        }

        sections.join("\n")
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}
