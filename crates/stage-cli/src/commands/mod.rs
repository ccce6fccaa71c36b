//! Command implementations for stage-cli

pub mod copy;
pub mod filter;
pub mod list;

pub use copy::{CopyRequest, run_config, run_copy};
pub use filter::run_filter;
pub use list::run_list;

use std::path::PathBuf;

use stage_fs::{MatchPredicate, TreeIndex};

use crate::cli::FilterArgs;
use crate::error::Result;

/// Scan `sources` in order into one index filtered by `filters`.
pub(crate) fn build_index(sources: &[PathBuf], filters: &FilterArgs) -> Result<TreeIndex> {
    let predicate = MatchPredicate::new(
        &filters.includes,
        &filters.excludes,
        &filters.force_includes,
    )?;
    let mut index = TreeIndex::new(predicate);
    for source in sources {
        index.add_basedir(source)?;
    }
    Ok(index)
}
