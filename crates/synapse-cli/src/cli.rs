//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use synapse_extractor::ExtractionType;
use synapse_pipeline::Phase;

/// Synapse - Turn a week of meetings and chats into a newsletter or people profiles.
#[derive(Debug, Parser)]
#[command(name = "synapse")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path (defaults to ./synapse.toml when present)
    #[arg(short, long, global = true, env = "SYNAPSE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Verbose logging (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliFormat {
    /// Human-readable summary (default)
    Text,
    /// JSON format
    Json,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the map and/or reduce phase
    Run(RunArgs),
}

/// Arguments for the run command.
#[derive(Debug, Default, Parser)]
pub struct RunArgs {
    /// Phase to run
    #[arg(short, long, value_enum, default_value = "both")]
    pub phase: PhaseArg,

    /// Maximum concurrent extraction calls
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// What to extract and synthesize
    #[arg(short = 't', long, value_enum)]
    pub extraction_type: Option<ExtractionTypeArg>,

    /// Meeting transcript directory
    #[arg(long)]
    pub meetings_dir: Option<PathBuf>,

    /// Chat export directory
    #[arg(long)]
    pub telegram_dir: Option<PathBuf>,

    /// Map artifact directory
    #[arg(long)]
    pub map_dir: Option<PathBuf>,

    /// Newsletter output directory
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Profile output directory
    #[arg(long)]
    pub profiles_dir: Option<PathBuf>,
}

/// Phase argument.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum PhaseArg {
    /// Extraction only
    Map,
    /// Synthesis over existing artifacts
    Reduce,
    /// Map then reduce
    #[default]
    Both,
}

impl From<PhaseArg> for Phase {
    fn from(arg: PhaseArg) -> Self {
        match arg {
            PhaseArg::Map => Phase::Map,
            PhaseArg::Reduce => Phase::Reduce,
            PhaseArg::Both => Phase::Both,
        }
    }
}

/// Extraction type argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
#[value(rename_all = "snake_case")]
pub enum ExtractionTypeArg {
    /// Weekly team newsletter
    Newsletter,
    /// One profile per person
    #[value(alias = "person-profiles")]
    PersonProfiles,
}

impl From<ExtractionTypeArg> for ExtractionType {
    fn from(arg: ExtractionTypeArg) -> Self {
        match arg {
            ExtractionTypeArg::Newsletter => ExtractionType::Newsletter,
            ExtractionTypeArg::PersonProfiles => ExtractionType::PersonProfiles,
        }
    }
}
