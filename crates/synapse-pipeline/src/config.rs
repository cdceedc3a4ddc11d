//! Configuration for a pipeline run

use crate::error::PipelineError;
use crate::loader::SourceDir;
use crate::reduce::OutputTarget;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

/// Default number of extraction calls in flight
pub const DEFAULT_CONCURRENCY: usize = 10;

/// Resolved settings for one pipeline run
///
/// Paths are taken as given; relative paths resolve against the process
/// working directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Input directories, one per source kind
    pub sources: Vec<SourceDir>,

    /// Map output directory (artifacts live here)
    pub map_dir: PathBuf,

    /// Reduce output locations
    pub output: OutputTarget,

    /// Maximum concurrent extraction calls
    pub concurrency: usize,
}

impl PipelineConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.concurrency == 0 {
            return Err(PipelineError::Config(
                "concurrency must be at least 1".to_string(),
            ));
        }

        let mut kinds = HashSet::new();
        for dir in &self.sources {
            if !kinds.insert(dir.kind) {
                return Err(PipelineError::Config(format!(
                    "more than one input directory configured for {} sources",
                    dir.kind
                )));
            }
        }

        if self.map_dir.as_os_str().is_empty() {
            return Err(PipelineError::Config("map_dir must not be empty".to_string()));
        }
        if self.output.document.as_os_str().is_empty()
            || self.output.profiles_dir.as_os_str().is_empty()
        {
            return Err(PipelineError::Config("output paths must not be empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use synapse_domain::SourceKind;

    fn config() -> PipelineConfig {
        PipelineConfig {
            sources: vec![
                SourceDir::new(SourceKind::Meeting, "in/meetings"),
                SourceDir::new(SourceKind::Chat, "in/chats"),
            ],
            map_dir: PathBuf::from("out/map"),
            output: OutputTarget {
                document: PathBuf::from("out/newsletter.md"),
                profiles_dir: PathBuf::from("out/profiles"),
            },
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    #[test]
    fn test_valid() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn test_zero_concurrency() {
        let mut config = config();
        config.concurrency = 0;
        assert!(matches!(config.validate(), Err(PipelineError::Config(_))));
    }

    #[test]
    fn test_duplicate_kind() {
        let mut config = config();
        config.sources.push(SourceDir::new(SourceKind::Chat, "elsewhere"));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_map_dir() {
        let mut config = config();
        config.map_dir = PathBuf::new();
        assert!(config.validate().is_err());
    }
}
