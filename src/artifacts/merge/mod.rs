//! Line-level reconciliation of two versions of a file
//!
//! There is no common ancestor involved: the two tips are compared
//! directly, and every run of differing lines becomes either a pass-through
//! (only one side has lines) or a conflict block (both sides do).

pub mod reconcile;
