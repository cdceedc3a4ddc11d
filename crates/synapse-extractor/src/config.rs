//! Configuration for the Extractor

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// What the pipeline extracts from each document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionType {
    /// Newsletter-worthy content; kind-specific prompts, one synthesized newsletter
    Newsletter,
    /// People and their roles; one prompt for every kind, one profile per person
    PersonProfiles,
}

impl Default for ExtractionType {
    fn default() -> Self {
        ExtractionType::Newsletter
    }
}

impl ExtractionType {
    /// Get the type name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionType::Newsletter => "newsletter",
            ExtractionType::PersonProfiles => "person_profiles",
        }
    }

    /// Parse an extraction type from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "newsletter" => Some(ExtractionType::Newsletter),
            "person_profiles" => Some(ExtractionType::PersonProfiles),
            _ => None,
        }
    }
}

impl fmt::Display for ExtractionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ExtractionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Unknown extraction type: {}", s))
    }
}

/// Configuration for the Extractor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Which extraction functions to register
    #[serde(default)]
    pub extraction_type: ExtractionType,

    /// Maximum input document length (characters)
    pub max_text_length: usize,

    /// Maximum time for a single extraction call (seconds); 0 disables the limit
    pub extraction_timeout_secs: u64,
}

impl ExtractorConfig {
    /// Get the extraction timeout as a Duration, if one is configured
    pub fn extraction_timeout(&self) -> Option<Duration> {
        (self.extraction_timeout_secs > 0).then(|| Duration::from_secs(self.extraction_timeout_secs))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_text_length == 0 {
            return Err("max_text_length must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Default for ExtractorConfig {
    /// Default configuration sized for long-context models
    fn default() -> Self {
        Self {
            extraction_type: ExtractionType::Newsletter,
            max_text_length: 1_000_000,
            extraction_timeout_secs: 300,
        }
    }
}

impl From<ExtractionType> for ExtractorConfig {
    /// Default limits for the given extraction type
    fn from(extraction_type: ExtractionType) -> Self {
        Self {
            extraction_type,
            ..Self::default()
        }
    }
}
