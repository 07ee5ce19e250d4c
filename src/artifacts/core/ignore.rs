//! Ignore list
//!
//! `.vcsignore` holds whitespace-separated patterns; lines starting with `#`
//! are comments. The repository directory itself is always ignored.
//! Directory paths are compared with a trailing `/`, so `build/` ignores the
//! directory and everything below it.

use crate::artifacts::index::index_entry::path_to_row_field;
use std::collections::BTreeSet;
use std::path::Path;

pub const IGNORE_FILE_NAME: &str = ".vcsignore";
pub const REPOSITORY_PATTERN: &str = ".vcs/";

pub const DEFAULT_IGNORE_FILE: &str = "# paths matching any pattern below are never tracked\n";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnoreList {
    patterns: BTreeSet<String>,
}

impl Default for IgnoreList {
    fn default() -> Self {
        IgnoreList {
            patterns: BTreeSet::from([REPOSITORY_PATTERN.to_string()]),
        }
    }
}

impl IgnoreList {
    pub fn parse(content: &str) -> Self {
        let mut list = Self::default();

        list.patterns.extend(
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.starts_with('#'))
                .flat_map(str::split_whitespace)
                .filter(|pattern| *pattern != ".")
                .map(str::to_string),
        );

        list
    }

    /// Load `.vcsignore` from the working tree root; a missing file only
    /// yields the built-in pattern.
    pub fn load(root: &Path) -> anyhow::Result<Self> {
        let path = root.join(IGNORE_FILE_NAME);
        if !path.exists() {
            return Ok(Self::default());
        }

        Ok(Self::parse(&std::fs::read_to_string(path)?))
    }

    /// Substring match of any pattern against the relative path.
    pub fn is_path_ignored(&self, relative: &Path, is_dir: bool) -> bool {
        let candidate = Self::candidate(relative, is_dir);

        self.patterns
            .iter()
            .any(|pattern| candidate.contains(pattern.as_str()))
    }

    /// Exact match of the relative path against a pattern.
    pub fn is_ignored(&self, relative: &Path, is_dir: bool) -> bool {
        self.patterns.contains(&Self::candidate(relative, is_dir))
    }

    fn candidate(relative: &Path, is_dir: bool) -> String {
        let mut candidate = path_to_row_field(relative);
        if is_dir {
            candidate.push('/');
        }
        candidate
    }
}
