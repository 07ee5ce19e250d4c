//! Working tree status inspection
//!
//! Three views of every path are compared: the working tree, the index and
//! the tree of the HEAD commit.
//!
//! - `file_change`: change categories and their labels
//! - `inspector`: pairwise comparisons of a single path
//! - `status_info`: the full scan and its derived questions (clean? staged?)

pub mod file_change;
pub mod inspector;
pub mod status_info;
