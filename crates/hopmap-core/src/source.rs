//! Where config text comes from.
//!
//! The parser never touches the filesystem directly. It asks a
//! [`ConfigSource`] for the full text of a file and for the paths an
//! `Include` glob expands to. [`FsSource`] is the real thing;
//! [`MemorySource`] serves fixtures from memory.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::io;
use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};
use tracing::warn;

const GLOB_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

/// Provider of config file contents and include expansion.
pub trait ConfigSource {
    /// Read a whole file. The handle, if any, must not outlive the call.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error when the file cannot be read.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Expand a shell glob (`*`, `?`, `[...]`) into existing paths, sorted.
    ///
    /// Wildcards do not match a leading `.`, so hidden files are only picked
    /// up when the pattern names the dot. A pattern that matches nothing, or is not a valid glob, yields an empty list.
    fn glob(&self, pattern: &str) -> Vec<PathBuf>;

    /// Stable identity of `path` for include-cycle detection.
    fn canonicalize(&self, path: &Path) -> PathBuf {
        path.to_path_buf()
    }
}

/// [`ConfigSource`] backed by the local filesystem and the `glob` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsSource;

impl ConfigSource for FsSource {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn glob(&self, pattern: &str) -> Vec<PathBuf> {
        let entries = match glob::glob_with(pattern, GLOB_OPTIONS) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("ignoring invalid Include pattern '{pattern}': {e}");
                return Vec::new();
            }
        };

        let mut paths = Vec::new();
        for entry in entries {
            match entry {
                Ok(path) => paths.push(path),
                Err(e) => warn!("error expanding Include pattern '{pattern}': {e}"),
            }
        }
        paths
    }

    fn canonicalize(&self, path: &Path) -> PathBuf {
        std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
    }
}

/// In-memory [`ConfigSource`] keyed by absolute path.
///
/// Counts reads per path so tests can check how often a file was parsed.
#[derive(Debug, Default)]
pub struct MemorySource {
    files: BTreeMap<PathBuf, String>,
    reads: RefCell<HashMap<PathBuf, usize>>,
}

impl MemorySource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with_file(mut self, path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        self.insert(path, contents);
        self
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, contents: impl Into<String>) {
        self.files.insert(path.into(), contents.into());
    }

    /// Number of successful reads of `path` so far.
    #[must_use]
    pub fn read_count(&self, path: &Path) -> usize {
        self.reads.borrow().get(path).copied().unwrap_or(0)
    }
}

impl ConfigSource for MemorySource {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        let contents = self.files.get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such file: {}", path.display()),
            )
        })?;
        *self.reads.borrow_mut().entry(path.to_path_buf()).or_insert(0) += 1;
        Ok(contents)
    }

    fn glob(&self, pattern: &str) -> Vec<PathBuf> {
        let compiled = match Pattern::new(pattern) {
            Ok(p) => p,
            Err(e) => {
                warn!("ignoring invalid Include pattern '{pattern}': {e}");
                return Vec::new();
            }
        };
        self.files
            .keys()
            .filter(|path| compiled.matches_path_with(path, GLOB_OPTIONS))
            .cloned()
            .collect()
    }
}
