//! `Include` pattern resolution.
//!
//! An include pattern is anchored before it is globbed:
//!
//! - `/abs/...` is used as-is.
//! - `~` and `~/...` have the home directory substituted. `~user/...` forms
//!   are left untouched.
//! - Anything else is relative to the directory of the file that contains
//!   the `Include` line, not to the root config or the working directory.

use std::path::{Path, PathBuf};

/// Substitute the home directory for a leading `~` or `~/`.
///
/// Returns `pattern` unchanged when it has no such prefix or `home` is unknown.
#[must_use]
pub fn expand_home(pattern: &str, home: Option<&Path>) -> String {
    let Some(home) = home else {
        return pattern.to_string();
    };

    if pattern == "~" {
        return home.to_string_lossy().into_owned();
    }

    match pattern.strip_prefix("~/") {
        Some(rest) => home.join(rest).to_string_lossy().into_owned(),
        None => pattern.to_string(),
    }
}

/// Anchor an include `pattern` found in `including_file`.
#[must_use]
pub fn resolve_include_pattern(pattern: &str, including_file: &Path, home: Option<&Path>) -> String {
    if pattern.starts_with('/') || pattern.starts_with('~') {
        return expand_home(pattern, home);
    }

    let base = including_file.parent().unwrap_or_else(|| Path::new(""));
    let joined: PathBuf = base.join(pattern);
    joined.to_string_lossy().into_owned()
}
