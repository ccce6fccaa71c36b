//! Source entry descriptors
//!
//! A descriptor is produced from a single metadata call and then reused for
//! every later decision (kind dispatch, inode comparison).

use std::fs::{FileType, Metadata};
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Kind of a scanned entry. Symlinks are never followed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    Directory,
    Symlink,
    File,
}

impl EntryKind {
    pub fn from_file_type(file_type: FileType) -> Self {
        if file_type.is_symlink() {
            Self::Symlink
        } else if file_type.is_dir() {
            Self::Directory
        } else {
            Self::File
        }
    }
}

/// Device and inode pair identifying the storage behind a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileIdentity {
    pub dev: u64,
    pub ino: u64,
}

impl FileIdentity {
    /// Identity from (non-followed) metadata. `None` where the platform
    /// does not expose a stable device/inode pair.
    #[cfg(unix)]
    pub fn from_metadata(metadata: &Metadata) -> Option<Self> {
        use std::os::unix::fs::MetadataExt;
        Some(Self {
            dev: metadata.dev(),
            ino: metadata.ino(),
        })
    }

    #[cfg(not(unix))]
    pub fn from_metadata(_metadata: &Metadata) -> Option<Self> {
        None
    }

    /// Identity of whatever currently sits at `path`, without following a
    /// final symlink. `Ok(None)` if nothing is there.
    pub fn of_path(path: &Path) -> Result<Option<Self>> {
        match std::fs::symlink_metadata(path) {
            Ok(metadata) => Ok(Self::from_metadata(&metadata)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::io(path, e)),
        }
    }
}

/// One entry of a source tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    path: PathBuf,
    kind: EntryKind,
    identity: Option<FileIdentity>,
}

impl SourceEntry {
    pub fn new(path: impl Into<PathBuf>, kind: EntryKind, identity: Option<FileIdentity>) -> Self {
        Self {
            path: path.into(),
            kind,
            identity,
        }
    }

    /// Build a descriptor from already fetched, non-followed metadata.
    pub fn from_metadata(path: PathBuf, metadata: &Metadata) -> Self {
        Self {
            path,
            kind: EntryKind::from_file_type(metadata.file_type()),
            identity: FileIdentity::from_metadata(metadata),
        }
    }

    /// Describe a single path with one `lstat`.
    pub fn from_path(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let metadata = std::fs::symlink_metadata(&path).map_err(|e| Error::io(&path, e))?;
        Ok(Self::from_metadata(path, &metadata))
    }

    /// Absolute path of the entry in its source tree.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    pub fn identity(&self) -> Option<FileIdentity> {
        self.identity
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    pub fn is_symlink(&self) -> bool {
        self.kind == EntryKind::Symlink
    }

    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }
}
