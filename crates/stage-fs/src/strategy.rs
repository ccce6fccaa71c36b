//! Regular-file placement strategies
//!
//! Exactly one strategy applies to a materialization call:
//!
//! | `always_copy` | platform | strategy                   |
//! |---------------|----------|----------------------------|
//! | `false`       | any      | [`CopyStrategy::HardlinkOrCopy`] |
//! | `true`        | POSIX    | [`CopyStrategy::PreserveHardlinkGroups`] |
//! | `true`        | Windows  | [`CopyStrategy::PlainCopy`] |

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use filetime::FileTime;
use tracing::debug;

use crate::diagnostics::Diagnostics;
use crate::entry::{FileIdentity, SourceEntry};
use crate::platform::Platform;
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyStrategy {
    /// Hardlink to the source, copying when linking fails (e.g. cross-device).
    HardlinkOrCopy,
    /// Copy each source inode once; later files sharing that inode are
    /// hardlinked to the first copy. No destination shares an inode with the
    /// source.
    PreserveHardlinkGroups,
    /// Copy every file, no inode tracking.
    PlainCopy,
}

impl CopyStrategy {
    pub fn select(always_copy: bool, platform: Platform) -> Self {
        match (always_copy, platform.has_stable_inodes()) {
            (false, _) => Self::HardlinkOrCopy,
            (true, true) => Self::PreserveHardlinkGroups,
            (true, false) => Self::PlainCopy,
        }
    }

    /// Whether destinations end up sharing inodes with their sources.
    pub fn links_to_source(&self) -> bool {
        matches!(self, Self::HardlinkOrCopy)
    }
}

/// How a regular file ended up at its destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Hardlinked to the source file.
    Hardlinked,
    /// Content and metadata copied.
    Copied,
    /// Copied because hardlinking to the source failed.
    CopiedFallback,
    /// Hardlinked to an earlier destination copy of the same source inode.
    InternalHardlink,
}

/// First destination written for each source inode, scoped to one call.
#[derive(Debug, Default)]
pub struct InodeTracker {
    copied: HashMap<FileIdentity, PathBuf>,
}

impl InodeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, identity: &FileIdentity) -> Option<&Path> {
        self.copied.get(identity).map(PathBuf::as_path)
    }

    pub fn record(&mut self, identity: FileIdentity, dest: PathBuf) {
        self.copied.entry(identity).or_insert(dest);
    }

    pub fn len(&self) -> usize {
        self.copied.len()
    }

    pub fn is_empty(&self) -> bool {
        self.copied.is_empty()
    }
}

/// Place one regular file with the selected strategy. Parent directories
/// must already exist and the destination must be free.
pub fn place_file(
    strategy: CopyStrategy,
    entry: &SourceEntry,
    dest: &Path,
    tracker: &mut InodeTracker,
    diagnostics: &mut Diagnostics,
) -> Result<Placement> {
    match strategy {
        CopyStrategy::HardlinkOrCopy => {
            hardlink_or_copy(entry.path(), dest, diagnostics, |src, dest| fs::hard_link(src, dest))
        }
        CopyStrategy::PreserveHardlinkGroups => {
            copy_preserving_hardlink_groups(entry, dest, tracker, diagnostics)
        }
        CopyStrategy::PlainCopy => {
            plain_copy(entry.path(), dest, diagnostics)?;
            Ok(Placement::Copied)
        }
    }
}

fn hardlink_or_copy<F>(
    src: &Path,
    dest: &Path,
    diagnostics: &mut Diagnostics,
    link: F,
) -> Result<Placement>
where
    F: FnOnce(&Path, &Path) -> std::io::Result<()>,
{
    diagnostics.write(format_args!("hardlink {} -> {}", src.display(), dest.display()));
    match link(src, dest) {
        Ok(()) => Ok(Placement::Hardlinked),
        Err(e) => {
            debug!(src = %src.display(), error = %e, "Hardlink failed, falling back to copy");
            diagnostics.write(format_args!(" (falling back to copy) "));
            plain_copy(src, dest, diagnostics)?;
            Ok(Placement::CopiedFallback)
        }
    }
}

fn copy_preserving_hardlink_groups(
    entry: &SourceEntry,
    dest: &Path,
    tracker: &mut InodeTracker,
    diagnostics: &mut Diagnostics,
) -> Result<Placement> {
    let identity = match entry.identity() {
        Some(identity) => Some(identity),
        None => source_identity(entry.path())?,
    };

    if let Some(prev) = identity.as_ref().and_then(|id| tracker.get(id)) {
        diagnostics.write(format_args!(
            "hardlink (internal) {} -> {}",
            prev.display(),
            dest.display()
        ));
        fs::hard_link(prev, dest).map_err(|e| Error::io(dest, e))?;
        return Ok(Placement::InternalHardlink);
    }

    plain_copy(entry.path(), dest, diagnostics)?;
    if let Some(identity) = identity {
        tracker.record(identity, dest.to_path_buf());
    }
    Ok(Placement::Copied)
}

/// Identity of a source file, following symlinks like a plain `stat`.
fn source_identity(path: &Path) -> Result<Option<FileIdentity>> {
    let metadata = fs::metadata(path).map_err(|e| Error::io(path, e))?;
    Ok(FileIdentity::from_metadata(&metadata))
}

fn plain_copy(src: &Path, dest: &Path, diagnostics: &mut Diagnostics) -> Result<()> {
    diagnostics.write(format_args!("copy {} -> {}", src.display(), dest.display()));
    copy_with_metadata(src, dest)
}

/// Copy content and permissions, then carry over access and modification
/// times.
pub fn copy_with_metadata(src: &Path, dest: &Path) -> Result<()> {
    fs::copy(src, dest).map_err(|e| Error::io(dest, e))?;
    let metadata = fs::metadata(src).map_err(|e| Error::io(src, e))?;
    filetime::set_file_times(
        dest,
        FileTime::from_last_access_time(&metadata),
        FileTime::from_last_modification_time(&metadata),
    )
    .map_err(|e| Error::io(dest, e))
}
