//! Shared utilities
//!
//! - `ignore`: the `.vcsignore` pattern list
//! - `pager`: `std::io::Write` adapter over the minus pager

pub mod ignore;
pub mod pager;
