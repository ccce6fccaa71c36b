//! Declarative staging descriptions
//!
//! A stage config names the source trees to layer, the filters to apply and
//! where the result goes. The format is picked from the file extension:
//! `.toml`, `.json`, `.yaml` or `.yml`.
//!
//! ```toml
//! sources = ["build/dist/rocm", "build/dist/overlay"]
//! destination = "out/rocm-sdk-core"
//! excludes = ["**/cmake/**"]
//! always_copy = true
//!
//! [retry]
//! max_attempts = 5
//! base_delay_ms = 200
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::index::TreeIndex;
use crate::materialize::CopyOptions;
use crate::predicate::MatchPredicate;
use crate::retry::RetryPolicy;
use crate::{Error, Result};

fn default_true() -> bool {
    true
}

/// Retry settings for destination removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySection {
    pub max_attempts: u32,
    pub base_delay_ms: u64,
}

impl Default for RetrySection {
    fn default() -> Self {
        let policy = RetryPolicy::default();
        Self {
            max_attempts: policy.max_attempts,
            base_delay_ms: policy.base_delay.as_millis() as u64,
        }
    }
}

impl From<RetrySection> for RetryPolicy {
    fn from(section: RetrySection) -> Self {
        Self {
            max_attempts: section.max_attempts,
            base_delay: Duration::from_millis(section.base_delay_ms),
        }
    }
}

/// One staging job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageConfig {
    /// Source trees, scanned in order; later trees win on shared paths.
    #[serde(default)]
    pub sources: Vec<PathBuf>,
    pub destination: PathBuf,
    #[serde(default)]
    pub destprefix: String,
    #[serde(default)]
    pub includes: Vec<String>,
    #[serde(default)]
    pub excludes: Vec<String>,
    #[serde(default)]
    pub force_includes: Vec<String>,
    #[serde(default)]
    pub always_copy: bool,
    #[serde(default = "default_true")]
    pub remove_dest: bool,
    #[serde(default)]
    pub verbose: bool,
    #[serde(default)]
    pub retry: RetrySection,
}

impl StageConfig {
    /// Load from a file. Relative `sources` and `destination` are resolved
    /// against the directory holding the file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        let mut config: Self = match extension.as_str() {
            "toml" => toml::from_str(&content).map_err(|e| parse_error(path, "TOML", e))?,
            "json" => serde_json::from_str(&content).map_err(|e| parse_error(path, "JSON", e))?,
            "yaml" | "yml" => {
                serde_yaml::from_str(&content).map_err(|e| parse_error(path, "YAML", e))?
            }
            _ => return Err(Error::UnsupportedFormat { extension }),
        };

        if let Some(base) = path.parent() {
            config.resolve_relative_to(base);
        }
        Ok(config)
    }

    /// Parse TOML text without touching the filesystem.
    pub fn parse_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| parse_error(Path::new("<inline>"), "TOML", e))
    }

    fn resolve_relative_to(&mut self, base: &Path) {
        for source in &mut self.sources {
            if source.is_relative() {
                *source = base.join(&*source);
            }
        }
        if self.destination.is_relative() {
            self.destination = base.join(&self.destination);
        }
    }

    pub fn predicate(&self) -> Result<MatchPredicate> {
        MatchPredicate::new(&self.includes, &self.excludes, &self.force_includes)
    }

    /// Scan every source into a single layered index.
    pub fn build_index(&self) -> Result<TreeIndex> {
        let mut index = TreeIndex::new(self.predicate()?);
        for source in &self.sources {
            index.add_basedir(source)?;
        }
        Ok(index)
    }

    pub fn to_copy_options(&self) -> CopyOptions {
        CopyOptions::default()
            .with_prefix(self.destprefix.clone())
            .with_verbose(self.verbose)
            .with_always_copy(self.always_copy)
            .with_remove_dest(self.remove_dest)
            .with_retry(self.retry.into())
    }
}

fn parse_error(path: &Path, format: &str, e: impl std::fmt::Display) -> Error {
    Error::ConfigParse {
        path: path.to_path_buf(),
        format: format.into(),
        message: e.to_string(),
    }
}
