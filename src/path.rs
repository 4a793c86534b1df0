//! Path utilities for user-supplied names

use std::path::{Path, PathBuf};

/// Checks that a request-supplied name stays inside its base directory.
///
/// Rejects empty names, `.` and `..`, anything containing a path separator,
/// and NUL bytes. Dots elsewhere are allowed since report identifiers are
/// dot-delimited.
pub fn is_plain_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0'])
}

/// Joins `<dir>/<name>.<extension>` if `name` is a plain name.
pub fn resolve_named_file(dir: &Path, name: &str, extension: &str) -> Option<PathBuf> {
    is_plain_name(name).then(|| dir.join(format!("{name}.{extension}")))
}
