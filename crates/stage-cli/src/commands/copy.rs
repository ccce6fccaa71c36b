//! Copy and run commands

use std::path::{Path, PathBuf};

use colored::Colorize;
use stage_fs::{CopyOptions, CopyReport, StageConfig};

use super::build_index;
use crate::cli::FilterArgs;
use crate::error::Result;

/// Arguments of a `stage copy` invocation.
pub struct CopyRequest<'a> {
    pub sources: &'a [PathBuf],
    pub dest: &'a Path,
    pub filters: &'a FilterArgs,
    pub prefix: &'a str,
    pub always_copy: bool,
    pub keep_dest: bool,
    pub verbose: bool,
}

/// Run the copy command
pub fn run_copy(request: &CopyRequest<'_>) -> Result<()> {
    let index = build_index(request.sources, request.filters)?;
    let options = CopyOptions::default()
        .with_prefix(request.prefix)
        .with_verbose(request.verbose)
        .with_always_copy(request.always_copy)
        .with_remove_dest(!request.keep_dest);

    let report = index.copy_to(request.dest, &options)?;
    print_summary(request.dest, &report);
    Ok(())
}

/// Run a staging config file
pub fn run_config(path: &Path, verbose: bool) -> Result<()> {
    let config = StageConfig::load(path)?;
    let index = config.build_index()?;
    let mut options = config.to_copy_options();
    options.verbose |= verbose;

    let report = index.copy_to(&config.destination, &options)?;
    print_summary(&config.destination, &report);
    Ok(())
}

fn print_summary(dest: &Path, report: &CopyReport) {
    println!(
        "{} Staged {} entries into {}",
        "OK".green().bold(),
        report.total(),
        dest.display().to_string().cyan()
    );
    println!(
        "   {} directories, {} symlinks, {} hardlinked, {} copied, {} internal links, {} unchanged",
        report.directories,
        report.symlinks,
        report.hardlinked,
        report.copied,
        report.internal_hardlinks,
        report.skipped
    );
}
