//! Traversal, classification and copy logic.
//!
//! This module organizes the steps of a run into submodules and exposes the
//! primary entry point, `process_tree`.

/// Directory walk and per-entry dispatch
pub mod traversal;

/// Video detection from probe results
pub mod classify;

/// Unchanged copies of files, links and subtrees
pub mod copy;


pub use classify::{Classification, classify};
pub use copy::{CopyStats, copy_file, copy_tree};
pub use traversal::{EncodeResult, EntryFailure, RunSummary, TraversalTask, process_tree};
