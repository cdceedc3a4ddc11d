//! Synapse CLI - Run the extract/synthesize pipeline from the command line.

use clap::Parser;
use synapse_cli::commands;
use synapse_cli::{logging, Cli, CliFormat, Command, Formatter, SynapseConfig};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(cli).await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

async fn run(cli: Cli) -> synapse_cli::Result<bool> {
    // Load layered config (file, .env, environment)
    let config = SynapseConfig::load(cli.config.as_deref())?;

    let formatter = Formatter::new(cli.format.unwrap_or(CliFormat::Text), !cli.no_color);

    match cli.command {
        Command::Run(args) => commands::execute_run(args, config, &formatter).await,
    }
}
