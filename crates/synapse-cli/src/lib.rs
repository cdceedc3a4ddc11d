//! Synapse CLI library.
//!
//! This library provides the core functionality for the `synapse` command-line
//! interface: argument parsing, layered configuration, command execution, and
//! outcome formatting.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;

pub use cli::{Cli, CliFormat, Command};
pub use config::SynapseConfig;
pub use error::{CliError, Result};
pub use output::Formatter;
