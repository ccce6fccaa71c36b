//! Include / exclude / force-include decisions

use std::collections::BTreeSet;

use regex::Regex;

use crate::entry::SourceEntry;
use crate::pattern::GlobPattern;
use crate::{Error, Result};

/// Layered path filter built from three glob lists.
///
/// Evaluation order:
/// 1. any force-include matches: accepted
/// 2. includes non-empty and none match: rejected
/// 3. any exclude matches: rejected
/// 4. otherwise accepted
#[derive(Debug, Clone, Default)]
pub struct MatchPredicate {
    includes: Vec<GlobPattern>,
    excludes: Vec<GlobPattern>,
    force_includes: Vec<GlobPattern>,
}

impl MatchPredicate {
    pub fn new<S: AsRef<str>>(includes: &[S], excludes: &[S], force_includes: &[S]) -> Result<Self> {
        Ok(Self {
            includes: compile_all(includes)?,
            excludes: compile_all(excludes)?,
            force_includes: compile_all(force_includes)?,
        })
    }

    /// A predicate that accepts every path.
    pub fn accept_all() -> Self {
        Self::default()
    }

    pub fn includes(&self) -> &[GlobPattern] {
        &self.includes
    }

    pub fn excludes(&self) -> &[GlobPattern] {
        &self.excludes
    }

    pub fn force_includes(&self) -> &[GlobPattern] {
        &self.force_includes
    }

    pub fn is_match(&self, relpath: &str) -> bool {
        self.matches(relpath, None)
    }

    pub fn matches(&self, relpath: &str, entry: Option<&SourceEntry>) -> bool {
        if self.force_includes.iter().any(|p| p.matches(relpath, entry)) {
            return true;
        }
        if !self.includes.is_empty() && !self.includes.iter().any(|p| p.matches(relpath, entry)) {
            return false;
        }
        !self.excludes.iter().any(|p| p.matches(relpath, entry))
    }
}

fn compile_all<S: AsRef<str>>(globs: &[S]) -> Result<Vec<GlobPattern>> {
    globs.iter().map(|g| GlobPattern::new(g.as_ref())).collect()
}

/// Filter a flat set of names (artifact names, not paths).
///
/// Patterns are regular expressions searched anywhere in the name. A name is
/// kept if it matches at least one include (or there are no includes) and
/// matches no exclude.
pub fn filter_names<I, N, S>(names: I, includes: &[S], excludes: &[S]) -> Result<BTreeSet<String>>
where
    I: IntoIterator<Item = N>,
    N: AsRef<str>,
    S: AsRef<str>,
{
    let includes = compile_filters(includes)?;
    let excludes = compile_filters(excludes)?;

    Ok(names
        .into_iter()
        .filter(|name| {
            let name: &str = name.as_ref();
            (includes.is_empty() || includes.iter().any(|r| r.is_match(name)))
                && !excludes.iter().any(|r| r.is_match(name))
        })
        .map(|name| AsRef::<str>::as_ref(&name).to_string())
        .collect())
}

fn compile_filters<S: AsRef<str>>(patterns: &[S]) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|p| {
            Regex::new(p.as_ref()).map_err(|source| Error::InvalidFilter {
                pattern: p.as_ref().to_string(),
                source,
            })
        })
        .collect()
}
