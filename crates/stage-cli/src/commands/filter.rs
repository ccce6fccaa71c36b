//! Filter artifact names

use stage_fs::filter_names;

use crate::error::Result;

/// Run the filter command
pub fn run_filter(names: &[String], includes: &[String], excludes: &[String]) -> Result<()> {
    for name in filter_names(names, includes, excludes)? {
        println!("{name}");
    }
    Ok(())
}
