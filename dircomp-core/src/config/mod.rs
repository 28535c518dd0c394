//! Configuration structures and constants for the dircomp-core library.
//!
//! This module provides the run-wide configuration: input and output roots,
//! the traversal mode, the minimum size threshold, and the encoder settings
//! (codec, quality control and geometry). A `CoreConfig` is built once,
//! validated once and then passed by reference into every traversal and
//! dispatch call.

mod builder;
mod validation;

use std::fmt;
use std::path::PathBuf;

pub use builder::CoreConfigBuilder;
pub use validation::is_valid_bitrate;

// Default constants

/// Default ffmpeg video codec used for re-encoding.
pub const DEFAULT_VIDEO_CODEC: &str = "libx265";

/// Default CRF (Constant Rate Factor) applied when neither a CRF nor a target
/// bitrate is configured. Lower values produce higher quality but larger files.
pub const DEFAULT_CRF: u8 = 24;

/// Highest CRF accepted by any supported encoder (libaom/libsvtav1 go to 63,
/// x264/x265 stop at 51 and clamp anything above).
pub const MAX_CRF: u8 = 63;

/// Default minimum size in bytes. Every file at or above it is a candidate
/// for re-encoding.
pub const DEFAULT_MIN_SIZE: u64 = 0;

/// Down-scaling convenience values. Each one expands to an ffmpeg `scale`
/// filter that divides both dimensions and keeps them even.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scale {
    Half,
    Third,
    Quarter,
    Fifth,
}

impl Scale {
    /// Divisor applied inside `trunc(iw/F)*2`; twice the scale denominator.
    #[must_use]
    pub fn factor(self) -> u32 {
        match self {
            Scale::Half => 4,
            Scale::Third => 6,
            Scale::Quarter => 8,
            Scale::Fifth => 10,
        }
    }

    /// Returns the ffmpeg filter expression for this scale.
    #[must_use]
    pub fn filter(self) -> String {
        let factor = self.factor();
        format!("scale=trunc(iw/{factor})*2:trunc(ih/{factor})*2")
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Scale::Half => "half",
            Scale::Third => "third",
            Scale::Quarter => "quarter",
            Scale::Fifth => "fifth",
        };
        f.write_str(name)
    }
}

/// Resolved quality selector passed to the encoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QualityControl {
    /// Constant rate factor (`-crf N`)
    Crf(u8),
    /// Target video bitrate (`-b:v RATE`), e.g. `800k` or `2M`
    Bitrate(String),
}

impl fmt::Display for QualityControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QualityControl::Crf(crf) => write!(f, "CRF {crf}"),
            QualityControl::Bitrate(rate) => write!(f, "bitrate {rate}"),
        }
    }
}

/// What to do when encoding or copying a single entry fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Stop the run and return the first failure.
    #[default]
    Abort,
    /// Log the failure, record it in the run summary and keep going.
    Continue,
}

/// Main configuration structure for the dircomp-core library.
///
/// Typically created by the CLI and passed to `process_tree`. All fields
/// besides the two paths have defaults; `CoreConfigBuilder` offers a fluent
/// way to set them.
///
/// # Examples
///
/// ```rust
/// use dircomp_core::config::{CoreConfigBuilder, Scale};
/// use std::path::PathBuf;
///
/// let config = CoreConfigBuilder::new()
///     .input_path(PathBuf::from("/path/to/input"))
///     .output_path(PathBuf::from("/path/to/output"))
///     .recursive(true)
///     .min_size(1024 * 1024)
///     .crf(28)
///     .scale(Scale::Half)
///     .build_unvalidated()
///     .unwrap();
/// assert!(config.recursive);
/// ```
#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// Input directory (or single file) to process
    pub input_path: PathBuf,

    /// Output root mirroring the input structure (or destination file)
    pub output_path: PathBuf,

    /// Whether subdirectories are traversed entry by entry. When false they
    /// are copied wholesale.
    pub recursive: bool,

    /// Files smaller than this many bytes are copied unchanged
    pub min_size: u64,

    /// ffmpeg video codec selector (`-c:v`)
    pub video_codec: String,

    /// Constant rate factor; mutually exclusive with `bitrate`
    pub crf: Option<u8>,

    /// Target video bitrate; mutually exclusive with `crf`
    pub bitrate: Option<String>,

    /// Down-scaling convenience value; takes precedence over `video_filter`
    pub scale: Option<Scale>,

    /// Raw ffmpeg video filter string; ignored when `scale` is set
    pub video_filter: Option<String>,

    /// Behaviour when an encode or copy fails
    pub failure_policy: FailurePolicy,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("."),
            output_path: PathBuf::from("."),
            recursive: false,
            min_size: DEFAULT_MIN_SIZE,
            video_codec: DEFAULT_VIDEO_CODEC.to_string(),
            crf: None,
            bitrate: None,
            scale: None,
            video_filter: None,
            failure_policy: FailurePolicy::default(),
        }
    }
}

impl CoreConfig {
    /// Creates a configuration for the given roots with every other option
    /// at its default.
    #[must_use]
    pub fn new(input_path: PathBuf, output_path: PathBuf) -> Self {
        Self {
            input_path,
            output_path,
            ..Default::default()
        }
    }

    /// Resolves the quality selector.
    ///
    /// Falls back to `DEFAULT_CRF` when nothing is configured. A configuration
    /// with both a CRF and a bitrate is rejected by `validate`; if one reaches
    /// this point anyway the CRF is reported, since validation is the only
    /// place that decides between them.
    #[must_use]
    pub fn quality(&self) -> QualityControl {
        match (self.crf, &self.bitrate) {
            (Some(crf), _) => QualityControl::Crf(crf),
            (None, Some(rate)) => QualityControl::Bitrate(rate.clone()),
            (None, None) => QualityControl::Crf(DEFAULT_CRF),
        }
    }

    /// Resolves the geometry filter. The scale convenience value wins over a
    /// raw filter string.
    #[must_use]
    pub fn effective_video_filter(&self) -> Option<String> {
        match (self.scale, &self.video_filter) {
            (Some(scale), _) => Some(scale.filter()),
            (None, Some(filter)) => Some(filter.clone()),
            (None, None) => None,
        }
    }

    /// Where a single-file input is written: inside `output_path` when that
    /// is an existing directory, otherwise `output_path` itself.
    #[must_use]
    pub fn single_file_destination(&self) -> PathBuf {
        match self.input_path.file_name() {
            Some(name) if self.output_path.is_dir() => self.output_path.join(name),
            _ => self.output_path.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_filters() {
        assert_eq!(Scale::Half.filter(), "scale=trunc(iw/4)*2:trunc(ih/4)*2");
        assert_eq!(Scale::Third.filter(), "scale=trunc(iw/6)*2:trunc(ih/6)*2");
        assert_eq!(Scale::Quarter.filter(), "scale=trunc(iw/8)*2:trunc(ih/8)*2");
        assert_eq!(Scale::Fifth.filter(), "scale=trunc(iw/10)*2:trunc(ih/10)*2");
    }

    #[test]
    fn test_quality_defaults_to_crf() {
        let config = CoreConfig::default();
        assert_eq!(config.quality(), QualityControl::Crf(DEFAULT_CRF));

        let config = CoreConfig {
            bitrate: Some("2M".to_string()),
            ..Default::default()
        };
        assert_eq!(config.quality(), QualityControl::Bitrate("2M".to_string()));

        let config = CoreConfig {
            crf: Some(30),
            ..Default::default()
        };
        assert_eq!(config.quality(), QualityControl::Crf(30));
    }

    #[test]
    fn test_scale_takes_precedence_over_raw_filter() {
        let scaled_only = CoreConfig {
            scale: Some(Scale::Quarter),
            ..Default::default()
        };
        let both = CoreConfig {
            scale: Some(Scale::Quarter),
            video_filter: Some("scale=1280:-2".to_string()),
            ..Default::default()
        };
        assert_eq!(both.effective_video_filter(), scaled_only.effective_video_filter());

        let raw_only = CoreConfig {
            video_filter: Some("scale=1280:-2".to_string()),
            ..Default::default()
        };
        assert_eq!(raw_only.effective_video_filter().as_deref(), Some("scale=1280:-2"));
        assert_eq!(CoreConfig::default().effective_video_filter(), None);
    }
}
