//! Data structures and algorithms
//!
//! This module contains the core types and algorithms:
//!
//! - `branch`: Branch name validation
//! - `diff`: Table-of-contents diffing and overwrite detection
//! - `merge`: Commit graph traversal and three-way reconciliation
//! - `objects`: Object types (blob, tree, commit)

pub mod branch;
pub mod diff;
pub mod merge;
pub mod objects;
