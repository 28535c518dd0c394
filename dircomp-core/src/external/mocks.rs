// dircomp-core/src/external/mocks.rs

// --- Mocking Infrastructure (for testing) ---

// Compiled for this crate's unit tests and, through the "test-mocks" feature,
// for downstream test suites.

use super::ffmpeg_executor::{EncoderProcess, EncoderSpawner};
use super::ffprobe_executor::{MediaProber, MediaSummary, StreamSummary};
use crate::error::{CoreError, CoreResult};
use ffmpeg_sidecar::event::FfmpegEvent;
use std::cell::RefCell;
use std::collections::HashMap;
use std::os::unix::process::ExitStatusExt;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use std::rc::Rc;

/// Mock implementation of `EncoderProcess`.
#[derive(Clone)]
pub struct MockEncoderProcess {
    /// Events to emit when handle_events is called.
    pub events_to_emit: Vec<FfmpegEvent>,
    /// Exit status to return when wait is called.
    pub exit_status: ExitStatus,
}

impl MockEncoderProcess {
    /// A process that emits `events` and exits with `exit_code`.
    #[must_use]
    pub fn exiting_with(exit_code: i32, events: Vec<FfmpegEvent>) -> Self {
        Self {
            events_to_emit: events,
            // Raw wait status: the exit code lives in the second byte.
            exit_status: ExitStatus::from_raw(exit_code << 8),
        }
    }
}

impl EncoderProcess for MockEncoderProcess {
    fn handle_events<F>(&mut self, mut handler: F) -> CoreResult<()>
    where
        F: FnMut(FfmpegEvent) -> CoreResult<()>,
    {
        for event in std::mem::take(&mut self.events_to_emit) {
            handler(event)?;
        }
        Ok(())
    }

    fn wait(&mut self) -> CoreResult<ExitStatus> {
        Ok(self.exit_status)
    }
}

/// Represents an expected encoder call and its mock result.
pub struct MockEncoderExpectation {
    pub arg_pattern: String,
    pub result: CoreResult<MockEncoderProcess>,
    pub create_dummy_output: bool,
}

/// Mock implementation of `EncoderSpawner` supporting multiple expectations.
///
/// Each call is matched against the first expectation whose pattern is
/// contained in any argument; matched expectations are consumed. When asked
/// to, the mock writes a small file at the output path (the last argument).
#[derive(Clone, Default)]
pub struct MockEncoderSpawner {
    expectations: Rc<RefCell<Vec<MockEncoderExpectation>>>,
    received_calls: Rc<RefCell<Vec<Vec<String>>>>,
}

impl MockEncoderSpawner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_expectation(
        &self,
        arg_pattern: &str,
        result: CoreResult<MockEncoderProcess>,
        create_dummy_output: bool,
    ) {
        self.expectations.borrow_mut().push(MockEncoderExpectation {
            arg_pattern: arg_pattern.to_string(),
            result,
            create_dummy_output,
        });
    }

    /// Expects a successful encode that writes a dummy output file.
    pub fn add_success_expectation(&self, arg_pattern: &str) {
        self.add_expectation(arg_pattern, Ok(MockEncoderProcess::exiting_with(0, Vec::new())), true);
    }

    /// Expects an encode that exits with `exit_code` after emitting `events`.
    pub fn add_exit_error_expectation(
        &self,
        arg_pattern: &str,
        events: Vec<FfmpegEvent>,
        exit_code: i32,
    ) {
        self.add_expectation(
            arg_pattern,
            Ok(MockEncoderProcess::exiting_with(exit_code, events)),
            false,
        );
    }

    /// Expects an encode whose spawn fails with `error`.
    pub fn add_spawn_error_expectation(&self, arg_pattern: &str, error: CoreError) {
        self.add_expectation(arg_pattern, Err(error), false);
    }

    #[must_use]
    pub fn get_received_calls(&self) -> Vec<Vec<String>> {
        self.received_calls.borrow().clone()
    }

    /// Number of expectations that were never matched.
    #[must_use]
    pub fn pending_expectations(&self) -> usize {
        self.expectations.borrow().len()
    }
}

impl EncoderSpawner for MockEncoderSpawner {
    type Process = MockEncoderProcess;

    fn spawn(&self, args: &[String]) -> CoreResult<Self::Process> {
        self.received_calls.borrow_mut().push(args.to_vec());

        let mut expectations = self.expectations.borrow_mut();
        let found_index = expectations
            .iter()
            .position(|exp| args.iter().any(|arg| arg.contains(&exp.arg_pattern)));

        let Some(index) = found_index else {
            panic!("MockEncoderSpawner: No expectation found for command args: {args:?}");
        };
        let expectation = expectations.remove(index);
        log::debug!(
            "MockEncoderSpawner: Matched expectation with pattern '{}'",
            expectation.arg_pattern
        );

        let process = expectation.result?;
        if expectation.create_dummy_output {
            if let Some(output_path) = args.last().map(PathBuf::from) {
                if let Some(parent) = output_path.parent() {
                    std::fs::create_dir_all(parent)
                        .map_err(|e| crate::error::io_error(parent, e))?;
                }
                std::fs::write(&output_path, b"encoded")
                    .map_err(|e| crate::error::io_error(&output_path, e))?;
            }
        }
        Ok(process)
    }
}

/// Mock implementation of `MediaProber`.
///
/// Paths without an expectation fail to probe, which the classifier treats
/// as "not a video".
#[derive(Clone, Default)]
pub struct MockMediaProber {
    results: Rc<RefCell<HashMap<PathBuf, Result<MediaSummary, String>>>>,
    probed: Rc<RefCell<Vec<PathBuf>>>,
}

impl MockMediaProber {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports `path` as containing one video stream encoded with `codec`.
    pub fn expect_video(&self, path: &Path, codec: &str, duration: Option<f64>) {
        let summary = MediaSummary {
            streams: vec![
                stream("video", codec),
                stream("audio", "aac"),
            ],
            duration,
        };
        self.expect_summary(path, summary);
    }

    pub fn expect_summary(&self, path: &Path, summary: MediaSummary) {
        self.results
            .borrow_mut()
            .insert(path.to_path_buf(), Ok(summary));
    }

    pub fn expect_error(&self, path: &Path, message: &str) {
        self.results
            .borrow_mut()
            .insert(path.to_path_buf(), Err(message.to_string()));
    }

    /// Paths passed to `probe`, in call order.
    #[must_use]
    pub fn probed_paths(&self) -> Vec<PathBuf> {
        self.probed.borrow().clone()
    }
}

impl MediaProber for MockMediaProber {
    fn probe(&self, input_path: &Path) -> CoreResult<MediaSummary> {
        self.probed.borrow_mut().push(input_path.to_path_buf());
        match self.results.borrow().get(input_path) {
            Some(Ok(summary)) => Ok(summary.clone()),
            Some(Err(message)) => Err(CoreError::Probe(message.clone())),
            None => Err(CoreError::Probe(format!(
                "MockMediaProber: no expectation set for {}",
                input_path.display()
            ))),
        }
    }
}

/// Builds a `StreamSummary` for tests.
#[must_use]
pub fn stream(codec_type: &str, codec_name: &str) -> StreamSummary {
    StreamSummary {
        codec_type: Some(codec_type.to_string()),
        codec_name: Some(codec_name.to_string()),
    }
}
