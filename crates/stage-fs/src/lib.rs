//! Pattern matching and tree materialization for Tree Stager
//!
//! Build a [`MatchPredicate`] from include / exclude / force-include globs,
//! scan one or more source trees into a [`TreeIndex`], then materialize the
//! matched entries with [`TreeIndex::copy_to`].
//!
//! ```no_run
//! use stage_fs::{CopyOptions, MatchPredicate, TreeIndex};
//!
//! let predicate = MatchPredicate::new(&["lib/**", "bin/**"], &["**/cmake/**"], &[])?;
//! let mut index = TreeIndex::new(predicate);
//! index.add_basedir("build/dist/rocm")?;
//! index.copy_to("out/stage", &CopyOptions::default().with_always_copy(true))?;
//! # Ok::<(), stage_fs::Error>(())
//! ```

pub mod config;
pub mod diagnostics;
pub mod entry;
pub mod error;
pub mod index;
pub mod materialize;
pub mod path;
pub mod pattern;
pub mod platform;
pub mod predicate;
pub mod retry;
pub mod strategy;

pub use config::StageConfig;
pub use diagnostics::Diagnostics;
pub use entry::{EntryKind, FileIdentity, SourceEntry};
pub use error::{Error, Result};
pub use index::TreeIndex;
pub use materialize::{CopyOptions, CopyReport, Materializer};
pub use pattern::GlobPattern;
pub use platform::Platform;
pub use predicate::{MatchPredicate, filter_names};
pub use retry::RetryPolicy;
pub use strategy::CopyStrategy;
