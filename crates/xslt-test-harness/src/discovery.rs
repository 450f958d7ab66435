//! Fixture discovery by shell-style wildcard patterns
//!
//! Two expanders sit behind the same [`PathExpander`] contract: one built on
//! the `glob` crate's directory walker, and a portable one that only lists
//! a single directory and matches the last pattern segment. The runner never
//! knows which one it holds.
//!
//! Patterns are relative to an explicit base directory, and results keep the
//! pattern's own directory prefix: expanding `./*.xsl` yields `./a.xsl`, not
//! an absolute path. Results are sorted, so report order is reproducible.

use std::fs;
use std::path::{Component, Path, PathBuf};

use glob::{MatchOptions, Pattern};
use tracing::debug;

/// Names starting with `.` only match a pattern that starts with `.` too.
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

/// Expands a wildcard pattern into the list of matching paths.
pub trait PathExpander {
    /// Short name, used in logs
    fn name(&self) -> &'static str;

    /// Matching paths under `base_dir`, relative to it and carrying the
    /// pattern's directory prefix. No match (or an unreadable directory) is
    /// an empty list, never an error.
    fn expand(&self, base_dir: &Path, pattern: &str) -> Vec<PathBuf>;
}

/// Expander backed by `glob::glob_with`.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeGlob;

impl PathExpander for NativeGlob {
    fn name(&self) -> &'static str {
        "native"
    }

    fn expand(&self, base_dir: &Path, pattern: &str) -> Vec<PathBuf> {
        // `glob` yields paths without a leading `./`, so both sides of the
        // prefix strip below are compared in that form.
        let base = strip_cur_dir(base_dir);
        let relative_pattern = pattern.trim_start_matches("./");
        let full = if base.as_os_str().is_empty() {
            relative_pattern.to_string()
        } else {
            let escaped_base = Pattern::escape(&base.to_string_lossy());
            format!("{}/{}", escaped_base.trim_end_matches('/'), relative_pattern)
        };

        let entries = match glob::glob_with(&full, MATCH_OPTIONS) {
            Ok(entries) => entries,
            Err(e) => {
                debug!(pattern, error = %e, "invalid glob pattern");
                return Vec::new();
            }
        };

        let keep_dot_prefix = pattern.starts_with("./");
        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .filter_map(|path| {
                let path = strip_cur_dir(&path);
                let relative = match path.strip_prefix(&base) {
                    Ok(relative) => relative.to_path_buf(),
                    Err(_) => {
                        debug!(path = %path.display(), base = %base.display(), "match outside base");
                        return None;
                    }
                };
                Some(if keep_dot_prefix {
                    Path::new(".").join(relative)
                } else {
                    relative
                })
            })
            .collect();
        paths.sort();
        debug!(pattern, matches = paths.len(), "native glob");
        paths
    }
}

/// `path` without its leading `.` components.
fn strip_cur_dir(path: &Path) -> PathBuf {
    path.components()
        .skip_while(|c| matches!(c, Component::CurDir))
        .collect()
}

/// Expander that lists one directory and matches its entries against the
/// pattern's last segment. Wildcards are only honoured in that segment.
#[derive(Debug, Default, Clone, Copy)]
pub struct PortableGlob;

impl PathExpander for PortableGlob {
    fn name(&self) -> &'static str {
        "portable"
    }

    fn expand(&self, base_dir: &Path, pattern: &str) -> Vec<PathBuf> {
        let (prefix, file_pattern) = match pattern.rfind('/') {
            Some(idx) => pattern.split_at(idx + 1),
            None => ("", pattern),
        };

        let matcher = match Pattern::new(file_pattern) {
            Ok(matcher) => matcher,
            Err(e) => {
                debug!(pattern, error = %e, "invalid glob pattern");
                return Vec::new();
            }
        };

        let dir = base_dir.join(prefix);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) => {
                debug!(dir = %dir.display(), error = %e, "cannot list directory");
                return Vec::new();
            }
        };

        // An entry that fails to read ends the listing; what was gathered
        // so far is kept.
        let mut paths = Vec::new();
        for entry in entries {
            let Ok(entry) = entry else { break };
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if matcher.matches_with(&name, MATCH_OPTIONS) {
                paths.push(PathBuf::from(format!("{prefix}{name}")));
            }
        }
        paths.sort();
        debug!(pattern, matches = paths.len(), "portable glob");
        paths
    }
}

/// The expander for the current platform.
pub fn default_expander() -> Box<dyn PathExpander> {
    if cfg!(unix) {
        Box::new(NativeGlob)
    } else {
        Box::new(PortableGlob)
    }
}
