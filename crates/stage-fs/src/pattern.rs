//! Recursive glob patterns over forward-slash relative paths
//!
//! A glob is translated into an anchored regular expression:
//!
//! | glob            | regex        | meaning                               |
//! |-----------------|--------------|---------------------------------------|
//! | `/**/`          | `/(.*/)?`    | zero or more interior segments        |
//! | leading `**/`   | `^(.*/)?`    | zero or more leading segments         |
//! | trailing `/**`  | `(/.*)?$`    | zero or more trailing segments        |
//! | `*`             | `[^/]*`      | any run within one segment            |
//! | `?`             | `[^/]*`      | same as `*`, not a single character   |
//!
//! `?` intentionally matches a whole run of characters. Existing include and
//! exclude lists rely on it, so it must not be narrowed to POSIX semantics.

use regex::Regex;

use crate::entry::SourceEntry;
use crate::{Error, Result};

/// A compiled glob matched against whole relative paths.
#[derive(Debug, Clone)]
pub struct GlobPattern {
    glob: String,
    regex: Regex,
}

impl GlobPattern {
    /// Compile a glob such as `lib/**/*.so` into a matcher.
    pub fn new(glob: &str) -> Result<Self> {
        let source = translate(glob);
        let regex = Regex::new(&source).map_err(|source| Error::InvalidPattern {
            glob: glob.to_string(),
            source,
        })?;
        Ok(Self {
            glob: glob.to_string(),
            regex,
        })
    }

    /// The glob text this pattern was compiled from.
    pub fn glob(&self) -> &str {
        &self.glob
    }

    /// The translated regular expression.
    pub fn as_regex(&self) -> &Regex {
        &self.regex
    }

    /// Match a relative path made of `/`-separated segments.
    pub fn is_match(&self, relpath: &str) -> bool {
        self.regex.is_match(relpath)
    }

    /// Match a path together with its index entry.
    ///
    /// The entry is accepted so richer matchers can inspect it; glob matching
    /// only looks at the path.
    pub fn matches(&self, relpath: &str, _entry: Option<&SourceEntry>) -> bool {
        self.is_match(relpath)
    }
}

impl std::fmt::Display for GlobPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.glob)
    }
}

/// Translate a glob into anchored regex source.
///
/// Replacements run in a fixed order on the escaped text, so `**` segments
/// are consumed before the single-segment wildcards see them.
pub(crate) fn translate(glob: &str) -> String {
    let pattern = format!("^{}$", regex::escape(glob));
    pattern
        .replace(r"/\*\*/", "/(.*/)?")
        .replace(r"^\*\*/", "^(.*/)?")
        .replace(r"/\*\*$", "(/.*)?$")
        .replace(r"\*", "[^/]*")
        .replace(r"\?", "[^/]*")
}
