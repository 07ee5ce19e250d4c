//! Porcelain commands
//!
//! The user-facing workflow, composed from the repository areas and the
//! plumbing helpers.
//!
//! ## Commands
//!
//! - `init`: create the repository layout
//! - `add`: stage files
//! - `status`: compare working tree, index and HEAD commit
//! - `commit`: snapshot the index on the current branch
//! - `log`: walk the history of HEAD
//! - `diff`: line diffs between working tree, index and commits
//! - `branch`: list or create branches
//! - `checkout`: switch branches or detach HEAD
//! - `merge`: bring another branch's files in, marking conflicts
//! - `reset`: move the current branch back in its history
//! - `stash`: shelve and restore local changes

pub mod add;
pub mod branch;
pub mod checkout;
pub mod commit;
pub mod diff;
pub mod init;
pub mod log;
pub mod merge;
pub mod reset;
pub mod stash;
pub mod status;
