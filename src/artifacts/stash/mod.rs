//! Stash bookkeeping
//!
//! Stashes form their own commit chain next to the branches. The tip lives
//! in `refs/stash` and every entry is one line of `logs/refs/stash`, oldest
//! first:
//!
//! ```text
//! <parent> <commit> <index-blob> <branch> <timestamp> commit: <message>
//! ```
//!
//! Entries are addressed by `stash{N}` with `0` the most recent. Tags are
//! positional and shift whenever an entry is popped or dropped.

pub mod stash_entry;
pub mod stash_log;
pub mod stash_tag;
