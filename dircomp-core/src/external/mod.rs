// ============================================================================
// dircomp-core/src/external/mod.rs
// ============================================================================
//
// EXTERNAL TOOLS: Interactions with ffmpeg and ffprobe
//
// This module encapsulates interactions with the external command-line tools.
// Traversal code only sees the `EncoderSpawner` and `MediaProber` traits; the
// default implementations use the ffmpeg-sidecar and ffprobe crates, and
// `mocks` provides test doubles.

use crate::error::{CoreError, CoreResult};

use std::io;
use std::process::{Command, Stdio};

// ============================================================================
// SUBMODULES
// ============================================================================

/// Encoder argument building and synchronous dispatch
pub mod ffmpeg;

/// Traits and implementations for spawning ffmpeg
pub mod ffmpeg_executor;

/// Traits and implementations for probing media files
pub mod ffprobe_executor;

/// Mock spawner and prober
#[cfg(any(test, feature = "test-mocks"))]
pub mod mocks;

// ============================================================================
// RE-EXPORTS
// ============================================================================

pub use ffmpeg::{EncodeOutcome, EncodeParams, EncodeRequest, build_encode_args, run_encoder};
pub use ffmpeg_executor::{EncoderProcess, EncoderSpawner, SidecarProcess, SidecarSpawner};
pub use ffprobe_executor::{CrateFfprobeProber, MediaProber, MediaSummary, StreamSummary};

// ============================================================================
// DEPENDENCY CHECKING
// ============================================================================

/// Checks if a required external command is available and executable.
///
/// Runs the command with `-version`, discarding its output. Only a missing
/// executable is treated as fatal; a non-zero exit still proves the tool is
/// installed.
///
/// # Errors
///
/// * `CoreError::DependencyNotFound` - If the command is not found
/// * `CoreError::CommandStart` - If the command exists but fails to start
pub fn check_dependency(cmd_name: &str) -> CoreResult<()> {
    let result = Command::new(cmd_name)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match result {
        Ok(_) => {
            log::debug!("Found dependency: {cmd_name}");
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::warn!("Dependency '{cmd_name}' not found.");
            Err(CoreError::DependencyNotFound(cmd_name.to_string()))
        }
        Err(e) => {
            log::error!("Failed to start dependency check command '{cmd_name}': {e}");
            Err(CoreError::CommandStart(cmd_name.to_string(), e))
        }
    }
}
