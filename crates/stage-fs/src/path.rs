//! Forward-slash relative paths and their native destinations

use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

/// Append a file name to a relative key prefix (`""` or `"dir/"`).
pub fn child_key(prefix: &str, name: &str) -> String {
    let mut key = String::with_capacity(prefix.len() + name.len());
    key.push_str(prefix);
    key.push_str(name);
    key
}

/// Native relative path for a `/`-separated key.
pub fn native_relpath(key: &str) -> PathBuf {
    key.split('/').filter(|s| is_plain_segment(s)).collect()
}

/// Destination for a native relative path: `destdir / (destprefix + relpath)`.
///
/// `destprefix` is glued onto the first segment of `relpath` as text, so
/// `"pre_"` + `lib` gives `pre_lib` and `"rocm/"` + `lib` gives `rocm/lib`.
/// Empty, `.` and `..` segments are dropped from both parts, so the result
/// always stays under `destdir`. Segments of `relpath` are used as native
/// names, byte for byte.
pub fn dest_path(destdir: &Path, destprefix: &str, relpath: &Path) -> PathBuf {
    let mut dest = destdir.to_path_buf();
    let (prefix_dirs, glue) = match destprefix.rsplit_once('/') {
        Some((dirs, glue)) => (dirs, glue),
        None => ("", destprefix),
    };
    for segment in prefix_dirs.split('/').filter(|s| is_plain_segment(s)) {
        dest.push(segment);
    }

    let mut segments = relpath.components().filter_map(|c| match c {
        Component::Normal(name) => Some(name),
        _ => None,
    });
    match segments.next() {
        Some(first) => {
            let mut name = OsString::from(glue);
            name.push(first);
            dest.push(name);
        }
        None if is_plain_segment(glue) => dest.push(glue),
        None => {}
    }
    for segment in segments {
        dest.push(segment);
    }
    dest
}

fn is_plain_segment(segment: &str) -> bool {
    !segment.is_empty() && segment != "." && segment != ".."
}
