//! Native-library search path handling.
//!
//! The resolver answers "where would this library load from", not "load
//! it": lookups are existence probes over an ordered list of directory
//! prefixes fixed at construction time.

use once_cell::sync::Lazy;
use std::path::{MAIN_SEPARATOR, PathBuf};

/// Environment variable supplying the process-wide default search path.
pub const LIBRARY_PATH_VAR: &str = "CODEPATH_LIBRARY_PATH";

/// Delimiter between entries of a path list.
#[cfg(not(windows))]
pub const PATH_LIST_SEPARATOR: char = ':';
#[cfg(windows)]
pub const PATH_LIST_SEPARATOR: char = ';';

static DEFAULT_LIBRARY_PATH: Lazy<Vec<String>> = Lazy::new(|| {
    let raw = std::env::var(LIBRARY_PATH_VAR).unwrap_or_else(|_| ".".to_string());
    split_path_list(&raw)
});

/// Split a delimiter-separated path list, dropping empty segments.
pub fn split_path_list(list: &str) -> Vec<String> {
    list.split(PATH_LIST_SEPARATOR)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Map a bare, platform-neutral library name to the platform file name.
pub fn platform_library_name(name: &str) -> String {
    if cfg!(target_os = "windows") {
        format!("{name}.dll")
    } else if cfg!(target_os = "macos") {
        format!("lib{name}.dylib")
    } else {
        format!("lib{name}.so")
    }
}

/// Ordered directory prefixes probed for native libraries.
///
/// Default-path entries come before any caller-supplied entries, each
/// list keeping its internal order; every prefix ends with the platform
/// separator. Immutable after construction.
#[derive(Debug, Clone)]
pub struct NativeSearchPath {
    dirs: Vec<String>,
}

impl NativeSearchPath {
    /// Build from the process default plus an optional caller-supplied
    /// delimiter-separated list.
    pub fn new(extra: Option<&str>) -> Self {
        Self::with_default(&DEFAULT_LIBRARY_PATH, extra)
    }

    fn with_default(default: &[String], extra: Option<&str>) -> Self {
        let mut dirs = default.to_vec();
        if let Some(extra) = extra {
            dirs.extend(split_path_list(extra));
        }
        Self::from_dirs(dirs)
    }

    /// Build from explicit directories, bypassing the process default.
    pub fn from_dirs(dirs: impl IntoIterator<Item = String>) -> Self {
        let dirs = dirs
            .into_iter()
            .map(|mut dir| {
                if !dir.ends_with(MAIN_SEPARATOR) {
                    dir.push(MAIN_SEPARATOR);
                }
                dir
            })
            .collect();
        Self { dirs }
    }

    pub fn dirs(&self) -> &[String] {
        &self.dirs
    }

    /// Probe for `name`, returning the first directory whose mapped file
    /// exists. An existence check, not an open.
    pub fn find(&self, name: &str) -> Option<PathBuf> {
        let file_name = platform_library_name(name);
        for dir in &self.dirs {
            let candidate = PathBuf::from(format!("{dir}{file_name}"));
            if candidate.exists() {
                return Some(candidate);
            }
        }
        None
    }
}
