//! List matched paths

use std::io::Write;
use std::path::PathBuf;

use super::build_index;
use crate::cli::FilterArgs;
use crate::error::Result;

/// Run the list command
pub fn run_list(sources: &[PathBuf], filters: &FilterArgs) -> Result<()> {
    let index = build_index(sources, filters)?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for (relpath, _) in index.matches() {
        writeln!(out, "{relpath}")?;
    }
    Ok(())
}
