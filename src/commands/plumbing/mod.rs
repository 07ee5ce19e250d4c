//! Plumbing commands
//!
//! Direct access to the object store, used for scripting and for checking
//! what the porcelain commands wrote.
//!
//! ## Commands
//!
//! - `hash-object`: compute a file's blob id, optionally storing the blob
//! - `cat-file`: probe, type or print a stored object
//! - `ls-tree`: list the rows of a tree object
//! - `write-tree`: store the index as trees and print the root id

pub mod cat_file;
pub mod hash_object;
pub mod ls_tree;
pub mod write_tree;
