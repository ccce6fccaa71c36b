//! Flat index of one or more source trees
//!
//! Keys are `/`-separated paths relative to the scanned base directory.
//! Iteration follows insertion order; re-inserting an existing path replaces
//! its entry but keeps its position, so layered trees keep the first tree's
//! ordering while the last tree's files win.
//!
//! Each entry also keeps its native relative path. Keys are what the globs
//! see; the native path is what identifies the entry and where it lands, so
//! names that are not valid UTF-8 keep their exact bytes.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, info};

use crate::entry::{EntryKind, FileIdentity, SourceEntry};
use crate::materialize::{CopyOptions, CopyReport, Materializer};
use crate::path::{child_key, native_relpath};
use crate::predicate::MatchPredicate;
use crate::{Error, Result};

#[derive(Debug, Clone)]
struct Indexed {
    key: String,
    relpath: PathBuf,
    entry: SourceEntry,
}

/// Ordered relative-path index filtered by a [`MatchPredicate`].
#[derive(Debug, Clone, Default)]
pub struct TreeIndex {
    predicate: MatchPredicate,
    entries: Vec<Indexed>,
    positions: HashMap<PathBuf, usize>,
}

impl TreeIndex {
    pub fn new(predicate: MatchPredicate) -> Self {
        Self {
            predicate,
            entries: Vec::new(),
            positions: HashMap::new(),
        }
    }

    pub fn predicate(&self) -> &MatchPredicate {
        &self.predicate
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, relpath: &str) -> Option<&SourceEntry> {
        self.positions
            .get(&native_relpath(relpath))
            .map(|&i| &self.entries[i].entry)
    }

    /// Every indexed entry, ignoring the predicate.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SourceEntry)> + '_ {
        self.entries.iter().map(|e| (e.key.as_str(), &e.entry))
    }

    /// Entries accepted by the predicate, in index order. Each call starts a
    /// fresh pass.
    pub fn matches(&self) -> impl Iterator<Item = (&str, &SourceEntry)> + '_ {
        self.matched_native().map(|(key, _, entry)| (key, entry))
    }

    /// Like [`matches`](Self::matches), with each entry's native relative path.
    pub fn matched_native(&self) -> impl Iterator<Item = (&str, &Path, &SourceEntry)> + '_ {
        self.entries
            .iter()
            .filter(|e| self.predicate.matches(&e.key, Some(&e.entry)))
            .map(|e| (e.key.as_str(), e.relpath.as_path(), &e.entry))
    }

    /// Insert a single entry, replacing any entry already at `relpath`.
    pub fn add_entry(&mut self, relpath: impl Into<String>, entry: SourceEntry) {
        let key = relpath.into();
        let native = native_relpath(&key);
        self.insert(key, native, entry);
    }

    fn insert(&mut self, key: String, relpath: PathBuf, entry: SourceEntry) {
        match self.positions.get(&relpath) {
            Some(&i) => self.entries[i].entry = entry,
            None => {
                self.positions.insert(relpath.clone(), self.entries.len());
                self.entries.push(Indexed { key, relpath, entry });
            }
        }
    }

    /// Scan `basedir` recursively and index every descendant.
    ///
    /// Directories are indexed before their children. Symlinks are recorded
    /// as symlinks and never descended into. Only regular files pay for a
    /// metadata call; directories and symlinks are classified from the
    /// directory entry's file type.
    pub fn add_basedir(&mut self, basedir: impl AsRef<Path>) -> Result<()> {
        let basedir = basedir.as_ref();
        let root = std::path::absolute(basedir).map_err(|e| Error::io(basedir, e))?;
        let root = dunce::simplified(&root).to_path_buf();

        let started = Instant::now();
        let before = self.len();
        self.scan_children(&root, "", Path::new(""))?;
        info!(
            basedir = %root.display(),
            scanned = self.len() - before,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Indexed source tree"
        );
        Ok(())
    }

    fn scan_children(&mut self, dir: &Path, prefix: &str, native_prefix: &Path) -> Result<()> {
        let read_dir = fs::read_dir(dir).map_err(|e| Error::io(dir, e))?;
        for dirent in read_dir {
            let dirent = dirent.map_err(|e| Error::io(dir, e))?;
            let file_type = dirent.file_type().map_err(|e| Error::io(dirent.path(), e))?;
            let name = dirent.file_name();
            let key = child_key(prefix, &name.to_string_lossy());
            let relpath = native_prefix.join(&name);
            let path = dir.join(&name);

            match EntryKind::from_file_type(file_type) {
                EntryKind::Directory => {
                    let entry = SourceEntry::new(&path, EntryKind::Directory, None);
                    let child_prefix = child_key(&key, "/");
                    self.insert(key, relpath.clone(), entry);
                    self.scan_children(&path, &child_prefix, &relpath)?;
                }
                EntryKind::Symlink => {
                    self.insert(key, relpath, SourceEntry::new(path, EntryKind::Symlink, None));
                }
                EntryKind::File => {
                    let metadata = dirent.metadata().map_err(|e| Error::io(&path, e))?;
                    let identity = FileIdentity::from_metadata(&metadata);
                    self.insert(key, relpath, SourceEntry::new(path, EntryKind::File, identity));
                }
            }
        }
        debug!(dir = %dir.display(), "Scanned directory");
        Ok(())
    }

    /// Materialize every matched entry under `destdir`.
    pub fn copy_to(&self, destdir: impl AsRef<Path>, options: &CopyOptions) -> Result<CopyReport> {
        Materializer::new(options).materialize(self, destdir.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn synthetic(path: &str) -> SourceEntry {
        SourceEntry::new(path, EntryKind::File, None)
    }

    #[test]
    fn add_entry_overwrites_in_place() {
        let mut index = TreeIndex::default();
        index.add_entry("a", synthetic("/one/a"));
        index.add_entry("b", synthetic("/one/b"));
        index.add_entry("a", synthetic("/two/a"));

        let keys: Vec<_> = index.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(index.get("a").unwrap().path(), Path::new("/two/a"));
    }

    #[test]
    fn matches_filters_through_predicate() {
        let predicate = MatchPredicate::new(&["*.so"], &[], &[]).unwrap();
        let mut index = TreeIndex::new(predicate);
        index.add_entry("libz.so", synthetic("/x/libz.so"));
        index.add_entry("README", synthetic("/x/README"));

        let matched: Vec<_> = index.matches().map(|(k, _)| k).collect();
        assert_eq!(matched, vec!["libz.so"]);
        // restartable
        assert_eq!(index.matches().count(), 1);
    }

    #[test]
    fn scan_orders_directories_before_children() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("lib/cmake")).unwrap();
        fs::write(dir.path().join("lib/cmake/config.cmake"), "").unwrap();

        let mut index = TreeIndex::default();
        index.add_basedir(dir.path()).unwrap();

        let keys: Vec<_> = index.iter().map(|(k, _)| k.to_string()).collect();
        assert_eq!(keys, vec!["lib", "lib/cmake", "lib/cmake/config.cmake"]);
        assert!(index.get("lib").unwrap().is_dir());
        assert!(index.get("lib/cmake/config.cmake").unwrap().is_file());
    }

    #[test]
    fn scan_missing_basedir_fails() {
        let mut index = TreeIndex::default();
        let err = index.add_basedir("/nonexistent/stage-fs/base").unwrap_err();
        assert_eq!(err.io_kind(), Some(std::io::ErrorKind::NotFound));
    }
}
