//! Shared test utilities for the tree-stager workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`tree`]: [`TreeBuilder`](tree::TreeBuilder) for on-disk source trees
//! - [`capture`]: an in-memory writer for verbose trace output

pub mod capture;
pub mod tree;

pub use capture::CapturedOutput;
pub use tree::TreeBuilder;
