//! Configuration management for the CLI.
//!
//! Settings are layered, later sources winning:
//!
//! 1. Built-in defaults
//! 2. A TOML file (`--config`, else `./synapse.toml` when present)
//! 3. `SYNAPSE_<SECTION>__<KEY>` environment variables, including any loaded
//!    from a `.env` file
//! 4. Command-line flags

use crate::cli::RunArgs;
use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use synapse_domain::SourceKind;
use synapse_extractor::{ExtractionType, ExtractorConfig};
use synapse_llm::ollama::{DEFAULT_ENDPOINT, DEFAULT_MAX_RETRIES};
use synapse_pipeline::{OutputTarget, PipelineConfig, SourceDir, DEFAULT_CONCURRENCY};
use tracing::debug;

/// File picked up from the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "synapse.toml";

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "SYNAPSE_";

/// Separator between section and key in environment overrides.
pub const ENV_SEPARATOR: &str = "__";

/// Newsletter file name inside the output directory.
pub const NEWSLETTER_FILE: &str = "newsletter.md";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SynapseConfig {
    /// Map phase settings
    #[serde(default)]
    pub map_phase: MapPhaseConfig,

    /// Reduce phase settings
    #[serde(default)]
    pub reduce_phase: ReducePhaseConfig,

    /// Concurrency and limits
    #[serde(default)]
    pub processing: ProcessingConfig,

    /// LLM server settings
    #[serde(default)]
    pub llm: LlmConfig,
}

/// Map phase settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapPhaseConfig {
    /// Model used for extraction
    pub llm_model: String,

    /// What to extract
    pub extraction_type: ExtractionType,

    /// Meeting transcripts; an empty path disables meeting sources
    pub meetings_dir: PathBuf,

    /// Chat exports; an empty path disables chat sources
    pub telegram_dir: PathBuf,

    /// Where map artifacts are written
    pub output_map_dir: PathBuf,
}

/// Reduce phase settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReducePhaseConfig {
    /// Model used for synthesis
    pub llm_model: String,

    /// Directory receiving the newsletter
    pub output_dir: PathBuf,

    /// Directory receiving one file per profile
    pub output_profiles_dir: PathBuf,
}

/// Concurrency and limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Maximum concurrent extraction calls
    pub concurrency: usize,

    /// Per-call extraction timeout in seconds; 0 disables it
    pub extraction_timeout_secs: u64,

    /// Longest source text accepted for extraction (characters)
    pub max_text_length: usize,
}

/// LLM server settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Ollama endpoint
    pub endpoint: String,

    /// Attempts per call before giving up
    pub max_retries: u32,
}

impl Default for MapPhaseConfig {
    fn default() -> Self {
        Self {
            llm_model: "llama3.1".to_string(),
            extraction_type: ExtractionType::Newsletter,
            meetings_dir: PathBuf::from("./data/meetings"),
            telegram_dir: PathBuf::from("./data/telegram"),
            output_map_dir: PathBuf::from("./map_outputs"),
        }
    }
}

impl Default for ReducePhaseConfig {
    fn default() -> Self {
        Self {
            llm_model: "llama3.1".to_string(),
            output_dir: PathBuf::from("./output"),
            output_profiles_dir: PathBuf::from("./profiles"),
        }
    }
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        let extractor = ExtractorConfig::default();
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            extraction_timeout_secs: extractor.extraction_timeout_secs,
            max_text_length: extractor.max_text_length,
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

impl SynapseConfig {
    /// Load configuration from file and process environment.
    ///
    /// An explicit `path` must exist; the default file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let contents = match path {
            Some(path) => Some(fs::read_to_string(path).map_err(|e| {
                CliError::Config(format!("Cannot read {}: {}", path.display(), e))
            })?),
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                Some(fs::read_to_string(DEFAULT_CONFIG_FILE)?)
            }
            None => None,
        };

        // A missing .env file is not an error
        if let Ok(env_file) = dotenvy::dotenv() {
            debug!(path = %env_file.display(), "Loaded .env file");
        }

        Self::from_sources(contents.as_deref(), std::env::vars())
    }

    /// Build configuration from TOML text and environment pairs.
    pub fn from_sources<I, K, V>(toml_text: Option<&str>, vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut table = match toml_text {
            Some(text) => text.parse::<toml::Table>()?,
            None => toml::Table::new(),
        };
        apply_env(&mut table, vars);

        let config: SynapseConfig = toml::Value::Table(table).try_into()?;
        Ok(config)
    }

    /// Apply command-line overrides.
    pub fn apply_args(&mut self, args: &RunArgs) {
        if let Some(concurrency) = args.concurrency {
            self.processing.concurrency = concurrency;
        }
        if let Some(extraction_type) = args.extraction_type {
            self.map_phase.extraction_type = extraction_type.into();
        }
        if let Some(dir) = &args.meetings_dir {
            self.map_phase.meetings_dir = dir.clone();
        }
        if let Some(dir) = &args.telegram_dir {
            self.map_phase.telegram_dir = dir.clone();
        }
        if let Some(dir) = &args.map_dir {
            self.map_phase.output_map_dir = dir.clone();
        }
        if let Some(dir) = &args.output_dir {
            self.reduce_phase.output_dir = dir.clone();
        }
        if let Some(dir) = &args.profiles_dir {
            self.reduce_phase.output_profiles_dir = dir.clone();
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.map_phase.llm_model.trim().is_empty() || self.reduce_phase.llm_model.trim().is_empty() {
            return Err(CliError::Config("llm_model must not be empty".to_string()));
        }
        if self.llm.endpoint.trim().is_empty() {
            return Err(CliError::Config("llm.endpoint must not be empty".to_string()));
        }
        if self.reduce_phase.output_dir.as_os_str().is_empty() {
            return Err(CliError::Config("reduce_phase.output_dir must not be empty".to_string()));
        }
        self.extractor_config().validate().map_err(CliError::Config)?;
        self.pipeline_config().validate()?;
        Ok(())
    }

    /// Source directories that are switched on.
    pub fn sources(&self) -> Vec<SourceDir> {
        [
            (SourceKind::Meeting, &self.map_phase.meetings_dir),
            (SourceKind::Chat, &self.map_phase.telegram_dir),
        ]
        .into_iter()
        .filter(|(_, path)| !path.as_os_str().is_empty())
        .map(|(kind, path)| SourceDir::new(kind, path))
        .collect()
    }

    /// Settings for the pipeline controller.
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            sources: self.sources(),
            map_dir: self.map_phase.output_map_dir.clone(),
            output: OutputTarget {
                document: self.reduce_phase.output_dir.join(NEWSLETTER_FILE),
                profiles_dir: self.reduce_phase.output_profiles_dir.clone(),
            },
            concurrency: self.processing.concurrency,
        }
    }

    /// Settings for the extractor registry.
    pub fn extractor_config(&self) -> ExtractorConfig {
        ExtractorConfig {
            extraction_type: self.map_phase.extraction_type,
            max_text_length: self.processing.max_text_length,
            extraction_timeout_secs: self.processing.extraction_timeout_secs,
        }
    }
}

/// Overlay `SYNAPSE_<SECTION>__<KEY>` variables onto a TOML table.
fn apply_env<I, K, V>(table: &mut toml::Table, vars: I)
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    for (key, value) in vars {
        let Some(rest) = key.as_ref().strip_prefix(ENV_PREFIX) else {
            continue;
        };
        let Some((section, field)) = rest.split_once(ENV_SEPARATOR) else {
            continue;
        };
        let (section, field) = (section.to_lowercase(), field.to_lowercase());
        if section.is_empty() || field.is_empty() {
            continue;
        }

        let entry = table
            .entry(section.clone())
            .or_insert_with(|| toml::Value::Table(toml::Table::new()));
        if let toml::Value::Table(section_table) = entry {
            debug!(section = %section, key = %field, "Applying environment override");
            section_table.insert(field, env_value(value.as_ref()));
        }
    }
}

/// Numbers and booleans become typed TOML values; everything else a string.
fn env_value(raw: &str) -> toml::Value {
    if let Ok(n) = raw.parse::<i64>() {
        toml::Value::Integer(n)
    } else if let Ok(b) = raw.parse::<bool>() {
        toml::Value::Boolean(b)
    } else {
        toml::Value::String(raw.to_string())
    }
}
