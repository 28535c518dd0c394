// ============================================================================
// dircomp-core/src/external/ffmpeg.rs
// ============================================================================
//
// ENCODE DISPATCH: Argument building and synchronous ffmpeg invocation
//
// An `EncodeRequest` is turned into an ffmpeg argument list of the shape
//
//     -y -i <src> -c:v <codec> (-crf N | -b:v RATE) [-vf FILTER] <dst>
//
// and run to completion through an `EncoderSpawner`. The result is an
// `EncodeOutcome`: success requires both a zero exit status and an existing
// destination file.

use std::path::{Path, PathBuf};
use std::time::Instant;

use log::debug;

use crate::config::{CoreConfig, QualityControl};
use crate::error::{CoreError, CoreResult};
use crate::external::ffmpeg_executor::{EncoderProcess, EncoderSpawner};
use crate::progress_reporting::ProgressReporter;
use crate::progress_reporting::ffmpeg_handler::FfmpegEventHandler;
use crate::utils::format_duration;

/// Encoder settings shared by every request in a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeParams {
    pub video_codec: String,
    pub quality: QualityControl,
    /// Resolved geometry filter (`-vf`), if any
    pub video_filter: Option<String>,
}

impl EncodeParams {
    /// Resolves the encoder settings from a validated configuration.
    #[must_use]
    pub fn from_config(config: &CoreConfig) -> Self {
        Self {
            video_codec: config.video_codec.clone(),
            quality: config.quality(),
            video_filter: config.effective_video_filter(),
        }
    }
}

/// A single file to re-encode.
#[derive(Debug, Clone)]
pub struct EncodeRequest {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub params: EncodeParams,
    /// Probed duration in seconds, used only for progress percentages
    pub duration: Option<f64>,
}

/// Structured result of one encoder invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeOutcome {
    pub success: bool,
    /// Exit code, when the process exited normally
    pub exit_code: Option<i32>,
    /// Error lines collected from ffmpeg, or a description of what went wrong
    pub error_message: Option<String>,
}

impl EncodeOutcome {
    /// Converts a failed outcome into `CoreError::Encode` for `source`.
    pub fn into_result(self, source: &Path) -> CoreResult<()> {
        if self.success {
            return Ok(());
        }
        let status = match self.exit_code {
            Some(code) => format!("ffmpeg exited with code {code}"),
            None => "ffmpeg was terminated by a signal".to_string(),
        };
        let message = match self.error_message {
            Some(detail) if self.exit_code == Some(0) => detail,
            Some(detail) => format!("{status}: {detail}"),
            None => status,
        };
        Err(CoreError::Encode {
            path: source.to_path_buf(),
            message,
        })
    }
}

/// Builds the ffmpeg argument list for a request.
#[must_use]
pub fn build_encode_args(request: &EncodeRequest) -> Vec<String> {
    let params = &request.params;
    let mut args: Vec<String> = vec![
        "-y".to_string(),
        "-i".to_string(),
        request.source.to_string_lossy().into_owned(),
        "-c:v".to_string(),
        params.video_codec.clone(),
    ];

    match &params.quality {
        QualityControl::Crf(crf) => {
            args.push("-crf".to_string());
            args.push(crf.to_string());
        }
        QualityControl::Bitrate(rate) => {
            args.push("-b:v".to_string());
            args.push(rate.clone());
        }
    }

    if let Some(filter) = &params.video_filter {
        args.push("-vf".to_string());
        args.push(filter.clone());
    }

    args.push(request.destination.to_string_lossy().into_owned());
    args
}

/// Runs the encoder for `request` and waits for it to exit.
///
/// Spawn and wait failures are returned as errors. A process that ran but did
/// not produce a usable output is reported through `EncodeOutcome`.
pub fn run_encoder<S: EncoderSpawner>(
    spawner: &S,
    request: &EncodeRequest,
    reporter: &dyn ProgressReporter,
) -> CoreResult<EncodeOutcome> {
    let args = build_encode_args(request);
    debug!("ffmpeg {}", args.join(" "));
    debug!(
        "Encoding {} ({}, {})",
        request.source.display(),
        request.params.video_codec,
        request.params.quality
    );

    let start = Instant::now();
    let mut process = spawner.spawn(&args)?;
    let mut handler = FfmpegEventHandler::new(reporter, request.duration);
    process.handle_events(|event| handler.handle_event(event))?;
    let status = process.wait()?;
    let error_message = handler.into_error_message();

    let exit_code = status.code();
    let destination_exists = request.destination.is_file();
    let success = status.success() && destination_exists;

    if success {
        debug!(
            "Encoded {} in {}",
            request.source.display(),
            format_duration(start.elapsed().as_secs_f64())
        );
        return Ok(EncodeOutcome {
            success,
            exit_code,
            error_message: None,
        });
    }

    let error_message = if status.success() && !destination_exists {
        Some(format!(
            "ffmpeg reported success but {} was not created",
            request.destination.display()
        ))
    } else {
        error_message
    };

    Ok(EncodeOutcome {
        success,
        exit_code,
        error_message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Scale;

    fn request(quality: QualityControl, video_filter: Option<String>) -> EncodeRequest {
        EncodeRequest {
            source: PathBuf::from("/in/movie.mkv"),
            destination: PathBuf::from("/out/movie.mkv"),
            params: EncodeParams {
                video_codec: "libx265".to_string(),
                quality,
                video_filter,
            },
            duration: None,
        }
    }

    #[test]
    fn test_crf_args() {
        let args = build_encode_args(&request(QualityControl::Crf(24), None));
        assert_eq!(
            args,
            vec![
                "-y", "-i", "/in/movie.mkv", "-c:v", "libx265", "-crf", "24", "/out/movie.mkv"
            ]
        );
    }

    #[test]
    fn test_bitrate_and_filter_args() {
        let args = build_encode_args(&request(
            QualityControl::Bitrate("800k".to_string()),
            Some(Scale::Half.filter()),
        ));
        assert_eq!(
            args,
            vec![
                "-y",
                "-i",
                "/in/movie.mkv",
                "-c:v",
                "libx265",
                "-b:v",
                "800k",
                "-vf",
                "scale=trunc(iw/4)*2:trunc(ih/4)*2",
                "/out/movie.mkv"
            ]
        );
        assert!(!args.iter().any(|a| a == "-crf"));
    }

    #[test]
    fn test_params_from_config() {
        let config = CoreConfig {
            scale: Some(Scale::Third),
            video_filter: Some("hflip".to_string()),
            ..Default::default()
        };
        let params = EncodeParams::from_config(&config);
        assert_eq!(params.video_codec, "libx265");
        assert_eq!(params.quality, QualityControl::Crf(24));
        assert_eq!(
            params.video_filter.as_deref(),
            Some("scale=trunc(iw/6)*2:trunc(ih/6)*2")
        );
    }

    #[test]
    fn test_outcome_into_result() {
        let ok = EncodeOutcome {
            success: true,
            exit_code: Some(0),
            error_message: None,
        };
        assert!(ok.into_result(Path::new("/in/a.mp4")).is_ok());

        let failed = EncodeOutcome {
            success: false,
            exit_code: Some(1),
            error_message: Some("Conversion failed!".to_string()),
        };
        let err = failed.into_result(Path::new("/in/a.mp4")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to encode /in/a.mp4: ffmpeg exited with code 1: Conversion failed!"
        );
    }
}
