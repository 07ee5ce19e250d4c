//! A local, single-user version-control engine.
//!
//! The crate is organised the same way the on-disk repository is:
//!
//! - `areas`: stateful parts of a repository (object database, index, refs, workspace)
//! - `artifacts`: the data types and algorithms those areas exchange
//! - `commands`: one `impl Repository` block per user-facing command
//! - `errors`: the error taxonomy surfaced to callers

pub mod areas;
pub mod artifacts;
pub mod commands;
pub mod errors;
