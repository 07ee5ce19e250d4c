//! Command implementations
//!
//! Every command is an `impl Repository` block in its own file:
//!
//! - `plumbing`: object store access (hash-object, cat-file, ls-tree, write-tree)
//! - `porcelain`: the version control workflow (add, commit, checkout, stash, ...)

pub mod plumbing;
pub mod porcelain;
