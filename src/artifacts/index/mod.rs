//! Index file format
//!
//! The index (staging area) is a zlib-compressed text table, one row per
//! staged file, sorted by path when written:
//!
//! ```text
//! <path> <hash> <size> <mode> <mtime>
//! ```

pub mod entry_mode;
pub mod index_entry;
