//! [`TreeBuilder`] for staging test scenarios.

use std::fs;
use std::path::{Path, PathBuf};

use filetime::FileTime;
use tempfile::TempDir;

/// A temporary directory populated through chained helpers.
///
/// # Example
///
/// ```rust,no_run
/// use stage_test_utils::TreeBuilder;
///
/// let tree = TreeBuilder::new()
///     .file("lib/libfoo.so.1.0", "elf")
///     .hardlink("lib/libfoo.so.1.0", "lib/libfoo.so.1")
///     .dir("share/empty");
/// assert!(tree.path("lib/libfoo.so.1").exists());
/// ```
pub struct TreeBuilder {
    temp_dir: TempDir,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Native path of a `/`-separated relative path inside the tree.
    pub fn path(&self, relpath: &str) -> PathBuf {
        let mut path = self.root().to_path_buf();
        path.extend(relpath.split('/'));
        path
    }

    pub fn dir(self, relpath: &str) -> Self {
        fs::create_dir_all(self.path(relpath)).unwrap();
        self
    }

    /// Write a file, creating parent directories.
    pub fn file(self, relpath: &str, content: &str) -> Self {
        let path = self.path(relpath);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        self
    }

    /// Hardlink `link` to the existing file `existing`.
    pub fn hardlink(self, existing: &str, link: &str) -> Self {
        let link_path = self.path(link);
        fs::create_dir_all(link_path.parent().unwrap()).unwrap();
        fs::hard_link(self.path(existing), link_path).unwrap();
        self
    }

    /// Create a symlink at `link` whose target text is `target`.
    #[cfg(unix)]
    pub fn symlink(self, target: &str, link: &str) -> Self {
        let link_path = self.path(link);
        fs::create_dir_all(link_path.parent().unwrap()).unwrap();
        std::os::unix::fs::symlink(target, link_path).unwrap();
        self
    }

    /// Set the modification time of an entry.
    pub fn mtime(self, relpath: &str, unix_seconds: i64) -> Self {
        filetime::set_file_mtime(self.path(relpath), FileTime::from_unix_time(unix_seconds, 0))
            .unwrap();
        self
    }

    pub fn read(&self, relpath: &str) -> String {
        fs::read_to_string(self.path(relpath)).unwrap()
    }
}
