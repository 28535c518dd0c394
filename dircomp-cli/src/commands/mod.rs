//! Command implementations for the CLI.

/// Mirrors the input tree into the output tree, re-encoding videos.
pub mod compress;
