//! Data structures and algorithms
//!
//! - `branch`: branch names and the HEAD state
//! - `core`: the ignore list and the pager writer
//! - `database`: rows of stored trees
//! - `diff`: LCS line diff and its rendering
//! - `index`: staged entries and file modes
//! - `log`: branch log lines
//! - `merge`: line reconciliation with conflict blocks
//! - `objects`: blob, tree and commit objects
//! - `stash`: stash entries, tags and the stash log
//! - `status`: working tree status inspection

pub mod branch;
pub mod core;
pub mod database;
pub mod diff;
pub mod index;
pub mod log;
pub mod merge;
pub mod objects;
pub mod stash;
pub mod status;
