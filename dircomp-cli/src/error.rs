// ============================================================================
// dircomp-cli/src/error.rs
// ============================================================================
//
// CLI ERROR HANDLING: Error types and utilities for the CLI
//
// The CLI reuses the core error type. This module adds the user-facing
// suggestions printed next to a fatal error.

use dircomp_core::{CoreError, CoreResult};

/// Type alias for CLI results using CoreError.
pub type CliResult<T> = CoreResult<T>;

/// Returns a hint for errors the user can fix directly.
#[must_use]
pub fn error_suggestion(error: &CoreError) -> Option<&'static str> {
    match error {
        CoreError::DependencyNotFound(_) => {
            Some("Install ffmpeg (which provides ffprobe) and make sure both are on your PATH")
        }
        CoreError::InputNotFound(_) => Some("Check the --input path"),
        CoreError::Config(msg) if msg.contains("inside") || msg.contains("differ") => {
            Some("Choose an --output location outside the input directory")
        }
        CoreError::Encode { .. } | CoreError::CommandFailed { .. } => {
            Some("Re-run with --verbose to see ffmpeg's output, or use --on-error continue")
        }
        _ => None,
    }
}
