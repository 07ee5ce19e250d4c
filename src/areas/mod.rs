//! Stateful parts of a repository
//!
//! - `database`: content-addressed object store
//! - `index`: staging area for the next commit
//! - `refs`: HEAD, branches, the stash tip and their logs
//! - `repository`: ties the areas together for the commands
//! - `workspace`: the working tree on disk

pub mod database;
pub mod index;
pub mod refs;
pub mod repository;
pub mod workspace;
