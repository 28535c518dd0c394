//! Progress reporting API
//!
//! The core library reports what it is doing through a `ProgressReporter`
//! passed into `process_tree`. The CLI implements it with a terminal spinner;
//! library users and tests can pass `NoopReporter`.
//!
//! Every method has an empty default body, so implementors only override the
//! events they care about.

pub mod ffmpeg_handler;

use std::path::Path;

/// Receives progress events from a run.
pub trait ProgressReporter {
    /// An encode of `source` into `destination` is about to start.
    fn encode_started(&self, _source: &Path, _destination: &Path) {}

    /// Periodic encoder progress. `total_secs` is zero when the duration is unknown.
    fn encode_progress(&self, _percent: f32, _elapsed_secs: f64, _total_secs: f64) {}

    /// The encode of `source` ended, successfully or not.
    fn encode_finished(&self, _source: &Path, _success: bool) {}

    /// A file was copied unchanged.
    fn file_copied(&self, _source: &Path, _destination: &Path, _bytes: u64) {}
}

/// Reporter that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {}
