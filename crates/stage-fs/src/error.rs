//! Error types for stage-fs

use std::path::PathBuf;

/// Result type for stage-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in stage-fs operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid glob pattern '{glob}': {source}")]
    InvalidPattern {
        glob: String,
        #[source]
        source: regex::Error,
    },

    #[error("Invalid filter expression '{pattern}': {source}")]
    InvalidFilter {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Failed to remove {path} after {attempts} attempts: {source}")]
    RemoveRetriesExhausted {
        path: PathBuf,
        attempts: u32,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {format} config at {path}: {message}")]
    ConfigParse {
        path: PathBuf,
        format: String,
        message: String,
    },

    #[error("Unsupported config format: {extension}")]
    UnsupportedFormat { extension: String },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// The underlying I/O error kind, if this is a filesystem failure.
    pub fn io_kind(&self) -> Option<std::io::ErrorKind> {
        match self {
            Self::Io { source, .. } | Self::RemoveRetriesExhausted { source, .. } => {
                Some(source.kind())
            }
            _ => None,
        }
    }
}
