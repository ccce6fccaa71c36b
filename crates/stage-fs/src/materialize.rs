//! Materialize an index into a destination tree
//!
//! Every matched entry lands at `destdir / (destprefix + relpath)`:
//! directories are created, symlinks are recreated with their unresolved
//! target, and regular files are placed with the [`CopyStrategy`] chosen
//! from `always_copy` and the platform.
//!
//! The first error aborts the whole call and may leave the destination
//! partially populated. The only recovery is the retried removal of the
//! destination root.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::diagnostics::Diagnostics;
use crate::entry::{EntryKind, FileIdentity, SourceEntry};
use crate::index::TreeIndex;
use crate::path::dest_path;
use crate::platform::Platform;
use crate::retry::{RetryPolicy, remove_dir_all_with_retry};
use crate::strategy::{CopyStrategy, InodeTracker, Placement, place_file};
use crate::{Error, Result};

/// Options for [`TreeIndex::copy_to`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyOptions {
    /// Prepended verbatim to every relative path.
    pub destprefix: String,
    /// Emit one trace line per operation on the diagnostic stream.
    pub verbose: bool,
    /// Never hardlink to the source tree.
    pub always_copy: bool,
    /// Wipe and recreate the destination first. When false, stale entries
    /// are unlinked one at a time and valid hardlinks are left alone.
    pub remove_dest: bool,
    pub platform: Platform,
    pub retry: RetryPolicy,
}

impl Default for CopyOptions {
    fn default() -> Self {
        Self {
            destprefix: String::new(),
            verbose: false,
            always_copy: false,
            remove_dest: true,
            platform: Platform::host(),
            retry: RetryPolicy::default(),
        }
    }
}

impl CopyOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prefix(mut self, destprefix: impl Into<String>) -> Self {
        self.destprefix = destprefix.into();
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_always_copy(mut self, always_copy: bool) -> Self {
        self.always_copy = always_copy;
        self
    }

    pub fn with_remove_dest(mut self, remove_dest: bool) -> Self {
        self.remove_dest = remove_dest;
        self
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn strategy(&self) -> CopyStrategy {
        CopyStrategy::select(self.always_copy, self.platform)
    }
}

/// What a materialization call did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyReport {
    pub directories: usize,
    pub symlinks: usize,
    /// Files hardlinked to their source.
    pub hardlinked: usize,
    /// Files whose content was copied.
    pub copied: usize,
    /// Files hardlinked to an earlier copy inside the destination.
    pub internal_hardlinks: usize,
    /// Files already hardlinked to their source.
    pub skipped: usize,
    /// Copies among `copied` made because a hardlink to the source failed.
    pub link_fallbacks: usize,
}

impl CopyReport {
    pub fn files(&self) -> usize {
        self.hardlinked + self.copied + self.internal_hardlinks + self.skipped
    }

    pub fn total(&self) -> usize {
        self.directories + self.symlinks + self.files()
    }

    fn record(&mut self, placement: Placement) {
        match placement {
            Placement::Hardlinked => self.hardlinked += 1,
            Placement::Copied => self.copied += 1,
            Placement::CopiedFallback => {
                self.copied += 1;
                self.link_fallbacks += 1;
            }
            Placement::InternalHardlink => self.internal_hardlinks += 1,
        }
    }
}

/// One materialization run.
#[derive(Debug)]
pub struct Materializer<'a> {
    options: &'a CopyOptions,
    strategy: CopyStrategy,
    diagnostics: Diagnostics,
}

impl<'a> Materializer<'a> {
    /// Trace lines go to stderr when `options.verbose` is set.
    pub fn new(options: &'a CopyOptions) -> Self {
        Self {
            options,
            strategy: options.strategy(),
            diagnostics: Diagnostics::for_verbosity(options.verbose),
        }
    }

    /// Send trace lines elsewhere, regardless of `options.verbose`.
    pub fn with_diagnostics(mut self, diagnostics: Diagnostics) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn strategy(&self) -> CopyStrategy {
        self.strategy
    }

    pub fn materialize(mut self, index: &TreeIndex, destdir: &Path) -> Result<CopyReport> {
        let started = Instant::now();

        if self.options.remove_dest && destdir.exists() {
            remove_dir_all_with_retry(destdir, self.options.retry, &mut self.diagnostics)?;
        }
        fs::create_dir_all(destdir).map_err(|e| Error::io(destdir, e))?;

        let mut tracker = InodeTracker::new();
        let mut report = CopyReport::default();
        for (_, relpath, entry) in index.matched_native() {
            let dest = dest_path(destdir, &self.options.destprefix, relpath);
            let result = self.place(entry, &dest, &mut tracker, &mut report);
            self.diagnostics.end_line();
            result?;
        }

        if report.link_fallbacks > 0 {
            warn!(
                destdir = %destdir.display(),
                files = report.link_fallbacks,
                "Hardlinking failed for some files; they were copied instead"
            );
        }
        info!(
            destdir = %destdir.display(),
            strategy = ?self.strategy,
            entries = report.total(),
            copied = report.copied,
            hardlinked = report.hardlinked,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Materialized tree"
        );
        Ok(report)
    }

    fn place(
        &mut self,
        entry: &SourceEntry,
        dest: &Path,
        tracker: &mut InodeTracker,
        report: &mut CopyReport,
    ) -> Result<()> {
        match entry.kind() {
            EntryKind::Directory => {
                self.diagnostics.write(format_args!("mkdir {}", dest.display()));
                fs::create_dir_all(dest).map_err(|e| Error::io(dest, e))?;
                report.directories += 1;
            }
            EntryKind::Symlink => {
                self.copy_symlink(entry, dest)?;
                report.symlinks += 1;
            }
            EntryKind::File => {
                if self.already_linked(entry, dest)? {
                    self.diagnostics.write(format_args!(
                        "skipping (already hardlinked) {}",
                        entry.path().display()
                    ));
                    report.skipped += 1;
                    return Ok(());
                }
                self.clear_stale(dest)?;
                ensure_parent(dest)?;
                let placement =
                    place_file(self.strategy, entry, dest, tracker, &mut self.diagnostics)?;
                debug!(dest = %dest.display(), ?placement, "Placed file");
                report.record(placement);
            }
        }
        Ok(())
    }

    fn copy_symlink(&mut self, entry: &SourceEntry, dest: &Path) -> Result<()> {
        self.clear_stale(dest)?;
        let target = fs::read_link(entry.path()).map_err(|e| Error::io(entry.path(), e))?;
        self.diagnostics.write(format_args!(
            "symlink {} -> {}",
            target.display(),
            dest.display()
        ));
        ensure_parent(dest)?;
        create_symlink(&target, dest, entry.path()).map_err(|e| Error::io(dest, e))
    }

    /// Another run may already have linked this destination to the source.
    fn already_linked(&self, entry: &SourceEntry, dest: &Path) -> Result<bool> {
        if !self.strategy.links_to_source() {
            return Ok(false);
        }
        let dest_metadata = match fs::symlink_metadata(dest) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(Error::io(dest, e)),
        };
        if !dest_metadata.is_file() {
            return Ok(false);
        }
        if let (Some(source), Some(existing)) =
            (entry.identity(), FileIdentity::from_metadata(&dest_metadata))
        {
            return Ok(source == existing);
        }
        // No cached dev/ino (Windows, synthetic entries): compare open handles.
        same_file::is_same_file(entry.path(), dest).map_err(|e| Error::io(entry.path(), e))
    }

    /// Without a fresh destination, unlink whatever file or symlink is in
    /// the way.
    fn clear_stale(&self, dest: &Path) -> Result<()> {
        if self.options.remove_dest {
            return Ok(());
        }
        match fs::remove_file(dest) {
            Ok(()) => {
                debug!(dest = %dest.display(), "Removed stale destination");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::io(dest, e)),
        }
    }
}

fn ensure_parent(dest: &Path) -> Result<()> {
    match dest.parent() {
        Some(parent) => fs::create_dir_all(parent).map_err(|e| Error::io(parent, e)),
        None => Ok(()),
    }
}

#[cfg(unix)]
fn create_symlink(target: &Path, link: &Path, _source_link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

/// Windows distinguishes file and directory symlinks; follow the source link
/// to pick one, defaulting to a file link when the target is dangling.
#[cfg(windows)]
fn create_symlink(target: &Path, link: &Path, source_link: &Path) -> std::io::Result<()> {
    let points_to_dir = fs::metadata(source_link).map(|m| m.is_dir()).unwrap_or(false);
    if points_to_dir {
        std::os::windows::fs::symlink_dir(target, link)
    } else {
        std::os::windows::fs::symlink_file(target, link)
    }
}
