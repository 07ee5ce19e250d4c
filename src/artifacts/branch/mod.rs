//! Branch names and the HEAD pointer

pub mod branch_name;
pub mod head;

/// Lowercase words joined by single hyphens, e.g. `feature-login`.
pub const BRANCH_NAME_REGEX: &str = r"^[a-z](-?[a-z])*$";

/// Directory of branch refs, relative to the repository marker.
pub const REF_PREFIX: &str = "refs/heads/";
