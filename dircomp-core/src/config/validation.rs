// ============================================================================
// dircomp-core/src/config/validation.rs
// ============================================================================
//
// CONFIGURATION VALIDATION: Pre-flight checks for CoreConfig
//
// Everything here runs once, before the first directory entry is visited.
// A failing check is a configuration error and aborts the run regardless of
// the failure policy.

use std::path::{Path, PathBuf};

use log::warn;

use super::{CoreConfig, MAX_CRF};
use crate::error::{CoreError, CoreResult};

impl CoreConfig {
    /// Validates the configuration against the file system and itself.
    ///
    /// # Errors
    ///
    /// * `CoreError::InputNotFound` - If the input path does not exist
    /// * `CoreError::Config` - If the options contradict each other, are
    ///   malformed, or the output root lies inside the input tree
    pub fn validate(&self) -> CoreResult<()> {
        if !self.input_path.exists() {
            return Err(CoreError::InputNotFound(self.input_path.clone()));
        }

        if self.video_codec.trim().is_empty() {
            return Err(CoreError::Config("video codec must not be empty".to_string()));
        }

        if self.crf.is_some() && self.bitrate.is_some() {
            return Err(CoreError::Config(
                "--crf and --bitrate are mutually exclusive; choose one".to_string(),
            ));
        }

        if let Some(crf) = self.crf {
            if crf > MAX_CRF {
                return Err(CoreError::Config(format!(
                    "CRF {crf} is out of range (0-{MAX_CRF})"
                )));
            }
        }

        if let Some(rate) = &self.bitrate {
            if !is_valid_bitrate(rate) {
                return Err(CoreError::Config(format!(
                    "invalid bitrate '{rate}' (expected e.g. 800k, 2M or 1500000)"
                )));
            }
        }

        if let Some(filter) = &self.video_filter {
            match self.scale {
                Some(scale) => warn!(
                    "Both --scale {scale} and --vf were given; using the scale filter and ignoring '{filter}'"
                ),
                None if filter.trim().is_empty() => {
                    return Err(CoreError::Config("video filter must not be empty".to_string()));
                }
                None => {}
            }
        }

        if self.input_path.is_dir() && output_within_input(&self.input_path, &self.output_path) {
            return Err(CoreError::Config(format!(
                "output {} must not be the input directory or lie inside it",
                self.output_path.display()
            )));
        }

        if self.input_path.is_file() {
            self.check_single_file_destination()?;
        }

        Ok(())
    }

    /// Rejects a single-file input whose resolved destination is the input
    /// itself, e.g. `-i dir/a.txt -o dir`.
    pub(crate) fn check_single_file_destination(&self) -> CoreResult<()> {
        let destination = self.single_file_destination();
        if same_path(&self.input_path, &destination) {
            return Err(CoreError::Config(format!(
                "output file {} must differ from the input file",
                destination.display()
            )));
        }
        Ok(())
    }
}

/// Checks an ffmpeg bitrate value: digits with an optional fractional part and
/// an optional `k`, `K`, `m`, `M`, `g` or `G` suffix.
#[must_use]
pub fn is_valid_bitrate(rate: &str) -> bool {
    let number = rate
        .strip_suffix(['k', 'K', 'm', 'M', 'g', 'G'])
        .unwrap_or(rate);
    !number.is_empty()
        && number.chars().all(|c| c.is_ascii_digit() || c == '.')
        && number.parse::<f64>().is_ok_and(|value| value > 0.0)
}

/// Resolves a path that may not exist yet by canonicalizing its deepest
/// existing ancestor and re-appending the rest.
fn resolve(path: &Path) -> PathBuf {
    if let Ok(canonical) = path.canonicalize() {
        return canonical;
    }
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) if !parent.as_os_str().is_empty() => resolve(parent).join(name),
        _ => std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf()),
    }
}

fn output_within_input(input: &Path, output: &Path) -> bool {
    resolve(output).starts_with(resolve(input))
}

fn same_path(a: &Path, b: &Path) -> bool {
    resolve(a) == resolve(b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Scale;
    use std::fs;

    fn config_for(input: &Path, output: &Path) -> CoreConfig {
        CoreConfig::new(input.to_path_buf(), output.to_path_buf())
    }

    #[test]
    fn test_valid_bitrates() {
        assert!(is_valid_bitrate("800k"));
        assert!(is_valid_bitrate("2M"));
        assert!(is_valid_bitrate("1.5M"));
        assert!(is_valid_bitrate("1500000"));

        assert!(!is_valid_bitrate(""));
        assert!(!is_valid_bitrate("k"));
        assert!(!is_valid_bitrate("fast"));
        assert!(!is_valid_bitrate("0"));
        assert!(!is_valid_bitrate("-1M"));
    }

    #[test]
    fn test_missing_input_is_reported() {
        let out = tempfile::tempdir().unwrap();
        let config = config_for(Path::new("/definitely/not/here"), out.path());
        assert!(matches!(config.validate(), Err(CoreError::InputNotFound(_))));
    }

    #[test]
    fn test_crf_and_bitrate_conflict() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let mut config = config_for(input.path(), output.path());
        config.crf = Some(20);
        config.bitrate = Some("1M".to_string());

        let err = config.validate().unwrap_err();
        assert!(matches!(err, CoreError::Config(ref msg) if msg.contains("mutually exclusive")));
    }

    #[test]
    fn test_crf_range_and_bitrate_format() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();

        let mut config = config_for(input.path(), output.path());
        config.crf = Some(64);
        assert!(config.validate().is_err());
        config.crf = Some(63);
        assert!(config.validate().is_ok());

        let mut config = config_for(input.path(), output.path());
        config.bitrate = Some("lots".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_output_inside_input_is_rejected() {
        let input = tempfile::tempdir().unwrap();

        let same = config_for(input.path(), input.path());
        assert!(matches!(same.validate(), Err(CoreError::Config(_))));

        let nested = config_for(input.path(), &input.path().join("compressed"));
        assert!(matches!(nested.validate(), Err(CoreError::Config(_))));

        let sibling = tempfile::tempdir().unwrap();
        let ok = config_for(input.path(), &sibling.path().join("compressed"));
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_single_file_input() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("clip.mp4");
        fs::write(&file, b"data").unwrap();

        let same = config_for(&file, &file);
        assert!(same.validate().is_err());

        let ok = config_for(&file, &dir.path().join("clip_small.mp4"));
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_single_file_into_its_own_directory_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("notes.txt");
        fs::write(&file, b"precious data").unwrap();

        let config = config_for(&file, dir.path());
        let err = config.validate().unwrap_err();
        assert!(matches!(err, CoreError::Config(ref msg) if msg.contains("must differ")));
        assert_eq!(fs::read(&file).unwrap(), b"precious data");
    }

    #[test]
    fn test_scale_with_filter_is_accepted() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        let mut config = config_for(input.path(), output.path());
        config.scale = Some(Scale::Half);
        config.video_filter = Some("hflip".to_string());
        assert!(config.validate().is_ok());

        // The raw filter is ignored when a scale is set, even if blank.
        config.video_filter = Some("   ".to_string());
        assert!(config.validate().is_ok());

        config.scale = None;
        assert!(config.validate().is_err());
    }
}
