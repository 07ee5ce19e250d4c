use crate::errors::VcsError;
use std::sync::LazyLock;

const STASH_TAG_REGEX: &str = r"^stash\{(\d+)\}$";

static STASH_TAG: LazyLock<Option<regex::Regex>> =
    LazyLock::new(|| regex::Regex::new(STASH_TAG_REGEX).ok());

/// `stash{N}`: the N-th most recent stash entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StashTag(usize);

impl StashTag {
    pub fn new(ordinal: usize) -> Self {
        StashTag(ordinal)
    }

    pub fn try_parse(tag: &str) -> Result<Self, VcsError> {
        STASH_TAG
            .as_ref()
            .and_then(|regex| regex.captures(tag.trim()))
            .and_then(|captures| captures.get(1))
            .and_then(|ordinal| ordinal.as_str().parse::<usize>().ok())
            .map(StashTag)
            .ok_or_else(|| {
                VcsError::validation(format!("invalid stash tag: {} (expected stash{{N}})", tag))
            })
    }

    pub fn ordinal(&self) -> usize {
        self.0
    }
}

impl std::fmt::Display for StashTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "stash{{{}}}", self.0)
    }
}
