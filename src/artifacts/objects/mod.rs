//! Object types and operations
//!
//! All content is stored as immutable objects identified by SHA-1 hashes:
//!
//! - **Blob**: file content
//! - **Tree**: directory listing (modes, types, hashes, mtimes, sizes, names)
//! - **Commit**: a tree snapshot plus parent, author, committer and message
//!
//! Every object shares the wire format `<type> <size>\0<payload>`.

pub mod blob;
pub mod commit;
pub mod object;
pub mod object_id;
pub mod object_type;
pub mod tree;

/// Length of a SHA-1 hash in hexadecimal format
pub const OBJECT_ID_LENGTH: usize = 40;
