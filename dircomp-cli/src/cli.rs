// dircomp-cli/src/cli.rs
//
// Defines the command-line argument structures using clap.

use clap::{Parser, ValueEnum};
use dircomp_core::{FailurePolicy, Scale, parse_byte_size};
use std::path::PathBuf;

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "dircomp: Directory video compressor",
    long_about = "Mirrors a directory tree into an output directory, re-encoding every video \
                  with ffmpeg and copying all other files unchanged."
)]
pub struct Cli {
    /// Input directory (or a single file)
    #[arg(short = 'i', long = "input", required = true, value_name = "INPUT_PATH")]
    pub input_path: PathBuf,

    /// Output directory mirroring the input (or the destination file)
    #[arg(short = 'o', long = "output", required = true, value_name = "OUTPUT_PATH")]
    pub output_path: PathBuf,

    /// Files smaller than this are copied unchanged (e.g. 500K, 20M, 1.5G)
    #[arg(short = 'm', long = "min-size", value_name = "SIZE", default_value = "0", value_parser = parse_size)]
    pub min_size: u64,

    /// Recurse into subdirectories instead of copying them unchanged
    #[arg(short = 'r', long, default_value_t = false)]
    pub recursive: bool,

    /// Enable debug-level logging
    #[arg(short = 'v', long, default_value_t = false)]
    pub verbose: bool,

    // --- Encoder Settings ---
    /// ffmpeg video codec
    #[arg(long = "vcodec", value_name = "CODEC", default_value = dircomp_core::config::DEFAULT_VIDEO_CODEC)]
    pub video_codec: String,

    /// Constant rate factor (0-63, lower is better quality). Defaults to 24 when no bitrate is given
    #[arg(long, value_name = "CRF", value_parser = clap::value_parser!(u8).range(0..=63), conflicts_with = "bitrate")]
    pub crf: Option<u8>,

    /// Target video bitrate (e.g. 800k, 2M)
    #[arg(long, value_name = "RATE")]
    pub bitrate: Option<String>,

    /// Downscale the video; takes precedence over --vf
    #[arg(short = 's', long, value_enum, value_name = "FACTOR")]
    pub scale: Option<ScaleArg>,

    /// Raw ffmpeg video filter (ignored when --scale is set)
    #[arg(long = "vf", value_name = "FILTER")]
    pub video_filter: Option<String>,

    /// What to do when a file fails to encode or copy
    #[arg(long = "on-error", value_enum, value_name = "POLICY", default_value_t = OnErrorArg::Abort)]
    pub on_error: OnErrorArg,
}

/// Values accepted by `--scale`.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScaleArg {
    Half,
    Third,
    Quarter,
    Fifth,
}

impl From<ScaleArg> for Scale {
    fn from(arg: ScaleArg) -> Self {
        match arg {
            ScaleArg::Half => Scale::Half,
            ScaleArg::Third => Scale::Third,
            ScaleArg::Quarter => Scale::Quarter,
            ScaleArg::Fifth => Scale::Fifth,
        }
    }
}

/// Values accepted by `--on-error`.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OnErrorArg {
    /// Stop at the first failure
    Abort,
    /// Record failures, keep going, exit non-zero at the end
    Continue,
}

impl From<OnErrorArg> for FailurePolicy {
    fn from(arg: OnErrorArg) -> Self {
        match arg {
            OnErrorArg::Abort => FailurePolicy::Abort,
            OnErrorArg::Continue => FailurePolicy::Continue,
        }
    }
}

fn parse_size(value: &str) -> Result<u64, String> {
    parse_byte_size(value)
        .ok_or_else(|| format!("invalid size '{value}' (expected e.g. 1048576, 500K, 20M or 1.5G)"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["dircomp", "-i", "in", "-o", "out"]).unwrap();
        assert_eq!(cli.input_path, PathBuf::from("in"));
        assert_eq!(cli.output_path, PathBuf::from("out"));
        assert_eq!(cli.min_size, 0);
        assert!(!cli.recursive);
        assert_eq!(cli.video_codec, "libx265");
        assert_eq!(cli.crf, None);
        assert_eq!(cli.on_error, OnErrorArg::Abort);
    }

    #[test]
    fn test_all_flags() {
        let cli = Cli::try_parse_from([
            "dircomp", "-i", "in", "-o", "out", "-m", "20M", "-r", "-v", "--vcodec", "libx264",
            "--bitrate", "800k", "-s", "quarter", "--vf", "hflip", "--on-error", "continue",
        ])
        .unwrap();
        assert_eq!(cli.min_size, 20 * 1024 * 1024);
        assert!(cli.recursive);
        assert!(cli.verbose);
        assert_eq!(cli.video_codec, "libx264");
        assert_eq!(cli.bitrate.as_deref(), Some("800k"));
        assert_eq!(cli.scale, Some(ScaleArg::Quarter));
        assert_eq!(cli.video_filter.as_deref(), Some("hflip"));
        assert_eq!(FailurePolicy::from(cli.on_error), FailurePolicy::Continue);
    }

    #[test]
    fn test_rejected_values() {
        assert!(Cli::try_parse_from(["dircomp", "-i", "in", "-o", "out", "--crf", "64"]).is_err());
        assert!(Cli::try_parse_from(["dircomp", "-i", "in", "-o", "out", "-m", "big"]).is_err());
        assert!(Cli::try_parse_from(["dircomp", "-i", "in", "-o", "out", "-s", "double"]).is_err());
        assert!(
            Cli::try_parse_from([
                "dircomp", "-i", "in", "-o", "out", "--crf", "20", "--bitrate", "1M"
            ])
            .is_err()
        );
        assert!(Cli::try_parse_from(["dircomp", "-i", "in"]).is_err());
    }
}
