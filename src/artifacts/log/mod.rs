//! Branch logs
//!
//! Every branch keeps an append-only log under `logs/refs/heads/<branch>`,
//! one line per commit made on it:
//!
//! ```text
//! <parent> <commit> <user> <timestamp> commit: <message>
//! ```
//!
//! Logs are never truncated, so `reset` can tell which commits a branch has
//! ever pointed at.

pub mod log_line;
