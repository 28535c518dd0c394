//! `FFmpeg` event handler
//!
//! Turns the sidecar event stream into progress reports, forwards ffmpeg's
//! own log lines to the `ffmpeg_log` target and keeps the error lines so they
//! can be attached to a failed encode.

use crate::error::CoreResult;
use crate::progress_reporting::ProgressReporter;
use crate::utils::{format_duration, parse_ffmpeg_time};
use ffmpeg_sidecar::event::{FfmpegEvent, FfmpegProgress, LogLevel as FfmpegLogLevel};
use std::time::{Duration, Instant};

/// Minimum step, in percent, between two progress reports.
const PROGRESS_STEP_PERCENT: f64 = 1.0;

/// Handler for `FFmpeg` events of a single encode
pub struct FfmpegEventHandler<'a> {
    reporter: &'a dyn ProgressReporter,
    duration: Option<f64>,
    start_time: Instant,
    last_progress_percent: f64,
    last_log_time: Instant,
    last_logged_percent_threshold: i32,
    stderr_buffer: String,
}

impl<'a> FfmpegEventHandler<'a> {
    /// Creates a handler. `duration` is the probed input duration, if known.
    #[must_use]
    pub fn new(reporter: &'a dyn ProgressReporter, duration: Option<f64>) -> Self {
        Self {
            reporter,
            duration,
            start_time: Instant::now(),
            last_progress_percent: -PROGRESS_STEP_PERCENT,
            last_log_time: Instant::now(),
            last_logged_percent_threshold: -1,
            stderr_buffer: String::new(),
        }
    }

    /// Handles an `FFmpeg` event
    pub fn handle_event(&mut self, event: FfmpegEvent) -> CoreResult<()> {
        match event {
            FfmpegEvent::Progress(progress) => self.handle_progress(&progress),
            FfmpegEvent::Log(level, message) => self.handle_log(&level, &message),
            FfmpegEvent::Error(error) => self.handle_error(&error),
            _ => {}
        }
        Ok(())
    }

    /// Error lines collected so far, one per line
    #[must_use]
    pub fn stderr_buffer(&self) -> &str {
        &self.stderr_buffer
    }

    /// Consumes the handler, returning the collected error lines if any
    #[must_use]
    pub fn into_error_message(self) -> Option<String> {
        let trimmed = self.stderr_buffer.trim_end();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    fn handle_progress(&mut self, progress: &FfmpegProgress) {
        let current_secs = parse_ffmpeg_time(&progress.time).unwrap_or(0.0);
        let total = self.duration.filter(|&d| d > 0.0);
        let percent = total.map_or(0.0, |d| (current_secs / d * 100.0).min(100.0));

        if total.is_none() || percent >= self.last_progress_percent + PROGRESS_STEP_PERCENT {
            self.reporter
                .encode_progress(percent as f32, current_secs, total.unwrap_or(0.0));
            self.last_progress_percent = percent;
        }

        self.log_progress_if_needed(percent, current_secs, progress.speed);
    }

    fn handle_log(&mut self, level: &FfmpegLogLevel, message: &str) {
        let log_level = map_ffmpeg_log_level(level);
        if log_level == log::Level::Info {
            log::debug!(target: "ffmpeg_log", "{message}");
        } else {
            log::log!(target: "ffmpeg_log", log_level, "{message}");
        }
        if matches!(level, FfmpegLogLevel::Fatal | FfmpegLogLevel::Error) {
            self.push_stderr(message);
        }
    }

    fn handle_error(&mut self, error: &str) {
        if is_non_critical_ffmpeg_error(error) {
            log::debug!("ffmpeg non-critical message: {error}");
        } else {
            log::debug!(target: "ffmpeg_log", "ffmpeg error: {error}");
            self.push_stderr(error);
        }
    }

    fn push_stderr(&mut self, line: &str) {
        self.stderr_buffer.push_str(line);
        self.stderr_buffer.push('\n');
    }

    /// Writes a progress line to the log every 10% (or every five minutes),
    /// so runs without a terminal still show where they are.
    fn log_progress_if_needed(&mut self, percent: f64, current_secs: f64, speed: f32) {
        let Some(total) = self.duration.filter(|&d| d > 0.0) else {
            return;
        };
        let current_threshold = (percent as i32 / 10) * 10;
        let should_log = current_threshold > self.last_logged_percent_threshold
            || self.last_log_time.elapsed() >= Duration::from_secs(300);

        if should_log {
            let elapsed = self.start_time.elapsed().as_secs_f64();
            log::debug!(
                target: "dircomp::progress",
                "Encoding progress: {:.1}% | {} / {} | speed {:.2}x | wall {}",
                percent,
                format_duration(current_secs),
                format_duration(total),
                speed,
                format_duration(elapsed)
            );
            self.last_log_time = Instant::now();
            self.last_logged_percent_threshold = current_threshold;
        }
    }
}

/// Maps `FFmpeg` log level to Rust log level
fn map_ffmpeg_log_level(level: &FfmpegLogLevel) -> log::Level {
    match level {
        FfmpegLogLevel::Fatal | FfmpegLogLevel::Error => log::Level::Error,
        FfmpegLogLevel::Warning => log::Level::Warn,
        FfmpegLogLevel::Info => log::Level::Info,
        _ => log::Level::Trace,
    }
}

/// Messages ffmpeg prints on stderr that do not indicate a problem.
fn is_non_critical_ffmpeg_error(error: &str) -> bool {
    error.contains("deprecated pixel format")
        || error.contains("No accelerated colorspace conversion")
        || error.contains("automatically inserted filter")
        || error.contains("Timestamps are unset")
        || error.contains("first frame is no keyframe")
}
