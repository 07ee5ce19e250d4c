//! Line diffs
//!
//! - `lcs`: longest-common-subsequence edit scripts
//! - `diff_target`: one side of a file comparison (commit, index, working tree or nothing)
//! - `render`: the per-file listing printed by `diff` and `stash show`
//!
//! The same edit script feeds merge reconciliation, so the tie-break in
//! [`lcs::LcsDiff`] decides both what a diff looks like and how conflict
//! blocks are laid out.

pub mod diff_target;
pub mod lcs;
pub mod render;
