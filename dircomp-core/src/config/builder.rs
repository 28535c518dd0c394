// ============================================================================
// dircomp-core/src/config/builder.rs
// ============================================================================
//
// CONFIGURATION BUILDER: Builder Pattern for CoreConfig
//
// This module implements the builder pattern for the CoreConfig structure,
// providing a fluent API for creating and configuring CoreConfig instances.
// Missing required paths are reported as configuration errors rather than
// panics, and `build` runs the same validation the CLI relies on.

use std::path::PathBuf;

use super::{CoreConfig, FailurePolicy, Scale};
use crate::error::{CoreError, CoreResult};

/// Builder for creating CoreConfig instances.
///
/// # Examples
///
/// ```rust
/// use dircomp_core::config::{CoreConfigBuilder, FailurePolicy};
/// use std::path::PathBuf;
///
/// let config = CoreConfigBuilder::new()
///     .input_path(PathBuf::from("/path/to/input"))
///     .output_path(PathBuf::from("/path/to/output"))
///     .video_codec("libx264")
///     .bitrate("800k")
///     .failure_policy(FailurePolicy::Continue)
///     .build_unvalidated()
///     .unwrap();
/// assert_eq!(config.video_codec, "libx264");
/// ```
#[derive(Debug, Clone, Default)]
pub struct CoreConfigBuilder {
    // Required fields
    input_path: Option<PathBuf>,
    output_path: Option<PathBuf>,

    // Optional fields, defaults come from CoreConfig::default()
    recursive: Option<bool>,
    min_size: Option<u64>,
    video_codec: Option<String>,
    crf: Option<u8>,
    bitrate: Option<String>,
    scale: Option<Scale>,
    video_filter: Option<String>,
    failure_policy: Option<FailurePolicy>,
}

impl CoreConfigBuilder {
    /// Creates a new CoreConfigBuilder with nothing set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the input directory or file.
    #[must_use]
    pub fn input_path(mut self, input_path: PathBuf) -> Self {
        self.input_path = Some(input_path);
        self
    }

    /// Sets the output root (or destination file for single-file input).
    #[must_use]
    pub fn output_path(mut self, output_path: PathBuf) -> Self {
        self.output_path = Some(output_path);
        self
    }

    /// Sets whether subdirectories are traversed instead of copied wholesale.
    #[must_use]
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = Some(recursive);
        self
    }

    /// Sets the minimum size in bytes below which files are copied unchanged.
    #[must_use]
    pub fn min_size(mut self, min_size: u64) -> Self {
        self.min_size = Some(min_size);
        self
    }

    /// Sets the ffmpeg video codec.
    #[must_use]
    pub fn video_codec(mut self, codec: impl Into<String>) -> Self {
        self.video_codec = Some(codec.into());
        self
    }

    /// Sets the constant rate factor.
    #[must_use]
    pub fn crf(mut self, crf: u8) -> Self {
        self.crf = Some(crf);
        self
    }

    /// Sets the target video bitrate.
    #[must_use]
    pub fn bitrate(mut self, bitrate: impl Into<String>) -> Self {
        self.bitrate = Some(bitrate.into());
        self
    }

    /// Sets the down-scaling convenience value.
    #[must_use]
    pub fn scale(mut self, scale: Scale) -> Self {
        self.scale = Some(scale);
        self
    }

    /// Sets a raw ffmpeg video filter.
    #[must_use]
    pub fn video_filter(mut self, filter: impl Into<String>) -> Self {
        self.video_filter = Some(filter.into());
        self
    }

    /// Sets the failure policy.
    #[must_use]
    pub fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = Some(policy);
        self
    }

    /// Assembles the configuration without touching the file system.
    ///
    /// # Errors
    ///
    /// * `CoreError::Config` - If the input or output path was never set
    pub fn build_unvalidated(self) -> CoreResult<CoreConfig> {
        let input_path = self
            .input_path
            .ok_or_else(|| CoreError::Config("input path is required".to_string()))?;
        let output_path = self
            .output_path
            .ok_or_else(|| CoreError::Config("output path is required".to_string()))?;

        let defaults = CoreConfig::default();
        Ok(CoreConfig {
            input_path,
            output_path,
            recursive: self.recursive.unwrap_or(defaults.recursive),
            min_size: self.min_size.unwrap_or(defaults.min_size),
            video_codec: self.video_codec.unwrap_or(defaults.video_codec),
            crf: self.crf,
            bitrate: self.bitrate,
            scale: self.scale,
            video_filter: self.video_filter,
            failure_policy: self.failure_policy.unwrap_or(defaults.failure_policy),
        })
    }

    /// Assembles and validates the configuration.
    ///
    /// # Errors
    ///
    /// * Any error from `build_unvalidated` or `CoreConfig::validate`
    pub fn build(self) -> CoreResult<CoreConfig> {
        let config = self.build_unvalidated()?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_VIDEO_CODEC, QualityControl};

    #[test]
    fn test_builder_defaults() {
        let config = CoreConfigBuilder::new()
            .input_path(PathBuf::from("in"))
            .output_path(PathBuf::from("out"))
            .build_unvalidated()
            .unwrap();

        assert_eq!(config.input_path, PathBuf::from("in"));
        assert_eq!(config.output_path, PathBuf::from("out"));
        assert!(!config.recursive);
        assert_eq!(config.min_size, 0);
        assert_eq!(config.video_codec, DEFAULT_VIDEO_CODEC);
        assert_eq!(config.failure_policy, FailurePolicy::Abort);
        assert_eq!(config.quality(), QualityControl::Crf(24));
    }

    #[test]
    fn test_builder_missing_paths() {
        let err = CoreConfigBuilder::new()
            .output_path(PathBuf::from("out"))
            .build_unvalidated()
            .unwrap_err();
        assert!(matches!(err, CoreError::Config(msg) if msg.contains("input")));

        let err = CoreConfigBuilder::new()
            .input_path(PathBuf::from("in"))
            .build_unvalidated()
            .unwrap_err();
        assert!(matches!(err, CoreError::Config(msg) if msg.contains("output")));
    }

    #[test]
    fn test_builder_runs_validation() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let err = CoreConfigBuilder::new()
            .input_path(input.path().to_path_buf())
            .output_path(output.path().join("out"))
            .crf(20)
            .bitrate("1M")
            .build()
            .unwrap_err();
        assert!(err.is_configuration_error());
    }
}
