//! Tree Stager CLI
//!
//! Stages build artifacts into install and package trees.

mod cli;
mod commands;
mod error;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use error::{CliError, Result};

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;
    execute_command(cli.command, cli.verbose)
}

/// Logs go to stderr so `list` and `filter` output stays pipeable.
fn init_logging(verbose: bool) -> Result<()> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| CliError::Logging(e.to_string()))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbose)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| CliError::Logging(e.to_string()))?;
    tracing::debug!("Verbose mode enabled");
    Ok(())
}

fn execute_command(cmd: Commands, verbose: bool) -> Result<()> {
    match cmd {
        Commands::Copy {
            sources,
            dest,
            filters,
            prefix,
            always_copy,
            keep_dest,
        } => commands::run_copy(&commands::CopyRequest {
            sources: &sources,
            dest: &dest,
            filters: &filters,
            prefix: &prefix,
            always_copy,
            keep_dest,
            verbose,
        }),
        Commands::List { sources, filters } => commands::run_list(&sources, &filters),
        Commands::Run { config } => commands::run_config(&config, verbose),
        Commands::Filter {
            names,
            includes,
            excludes,
        } => commands::run_filter(&names, &includes, &excludes),
    }
}
