//! Diagnostics for broken tree invariants.
//!
//! None of the tree's operations fail at runtime. An [`InvariantViolation`] only arises from
//! [`AvlTree::check_invariants`](crate::AvlTree::check_invariants) and indicates a bug.

use alloc::string::String;

use thiserror::Error;

/// The first tree invariant found not to hold.
///
/// Keys are rendered with their `Debug` representation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("key {key} is out of order with respect to ancestor key {ancestor}")]
    Unordered { key: String, ancestor: String },

    #[error("node {key} is unbalanced: left level {left}, right level {right}")]
    Unbalanced { key: String, left: u32, right: u32 },

    #[error("node {key} caches height {cached}, expected {expected}")]
    StaleHeight {
        key: String,
        cached: u32,
        expected: u32,
    },

    #[error("node {key} does not link back to its parent {parent}")]
    BrokenParentLink { key: String, parent: String },

    #[error("root node {key} has a parent link")]
    RootHasParent { key: String },

    #[error("tree records {len} keys but holds {counted}")]
    LenMismatch { len: usize, counted: usize },
}
