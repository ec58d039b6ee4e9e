//! Main CLI application structure

use std::io::{stdin, stdout};
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use super::output::Output;
use super::session::Session;
use crate::storage::{Config, TaskFile};

#[derive(Parser)]
#[command(name = "friday")]
#[command(author, version, about = "An interactive task-list assistant")]
pub struct Cli {
    /// Task file to load and save (overrides the config file)
    #[arg(long, env = "FRIDAY_DATA_FILE")]
    pub data_file: Option<PathBuf>,

    /// Configuration file (defaults to the global config, if present)
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Enable verbose output for debugging (on stderr)
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

/// Diagnostics go to stderr; stdout carries the conversation
fn init_logging(verbose: bool) {
    let default_filter = if verbose { "friday=debug" } else { "friday=warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    // A subscriber may already be installed when embedded
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .try_init();
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    debug!("Friday starting");

    let config = Config::load(cli.config.as_deref())?;
    let data_file = cli.data_file.unwrap_or_else(|| config.data_file.clone());
    debug!(data_file = %data_file.display(), "using task file");

    let file = TaskFile::new(data_file);
    let loaded = file.load()?;

    let output = Output::new(stdout().lock(), config.divider_width);
    let mut session = Session::new(config.name, loaded, file, output);
    session.run(stdin().lock())?;

    debug!("Session completed successfully");
    Ok(())
}
