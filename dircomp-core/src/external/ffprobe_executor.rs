//! FFprobe integration for media classification
//!
//! This module runs ffprobe (through the `ffprobe` crate) and reduces its
//! output to the handful of fields the traversal needs: the stream types and
//! codecs, used to decide whether a file is a video, and the container
//! duration, used for progress reporting.

use crate::error::{CoreError, CoreResult, command_failed_error, command_start_error};
use ffprobe::{FfProbeError, ffprobe};
use std::path::Path;

/// One stream as reported by ffprobe.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamSummary {
    /// `video`, `audio`, `subtitle`, `data`, ...
    pub codec_type: Option<String>,
    /// Short codec name, e.g. `h264` or `png`
    pub codec_name: Option<String>,
}

/// Probe result for a single file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MediaSummary {
    pub streams: Vec<StreamSummary>,
    /// Container duration in seconds, when ffprobe reports one
    pub duration: Option<f64>,
}

/// Trait for anything that can inspect a media file.
pub trait MediaProber {
    /// Probes the file at `input_path`.
    fn probe(&self, input_path: &Path) -> CoreResult<MediaSummary>;
}

/// Default `MediaProber` backed by the `ffprobe` crate.
#[derive(Debug, Clone, Default)]
pub struct CrateFfprobeProber;

impl CrateFfprobeProber {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl MediaProber for CrateFfprobeProber {
    fn probe(&self, input_path: &Path) -> CoreResult<MediaSummary> {
        log::trace!("Running ffprobe on: {}", input_path.display());
        match ffprobe(input_path) {
            Ok(metadata) => {
                let duration = metadata
                    .format
                    .duration
                    .as_deref()
                    .and_then(|d| d.parse::<f64>().ok());

                let streams = metadata
                    .streams
                    .into_iter()
                    .map(|s| StreamSummary {
                        codec_type: s.codec_type,
                        codec_name: s.codec_name,
                    })
                    .collect();

                Ok(MediaSummary { streams, duration })
            }
            Err(err) => Err(map_ffprobe_error(err, input_path)),
        }
    }
}

fn map_ffprobe_error(err: FfProbeError, input_path: &Path) -> CoreError {
    match err {
        FfProbeError::Io(io_err) => command_start_error("ffprobe", io_err),
        FfProbeError::Status(output) => {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            command_failed_error(format!("ffprobe {}", input_path.display()), output.status, stderr)
        }
        FfProbeError::Deserialize(err) => CoreError::Probe(format!(
            "could not parse ffprobe output for {}: {err}",
            input_path.display()
        )),
        _ => CoreError::Probe(format!(
            "unknown ffprobe error for {}: {err:?}",
            input_path.display()
        )),
    }
}
