// ============================================================================
// dircomp-core/src/error.rs
// ============================================================================
//
// ERROR HANDLING: Error Types for the dircomp Core Library
//
// This module defines the error taxonomy shared by traversal, classification,
// encode dispatch and plain copy. Errors fall into four kinds:
//
// - Configuration: invalid options, missing input, missing tools. Fatal
//   before traversal starts.
// - Classification: a probe failed. Recovered locally, never returned from
//   a run.
// - Encode: the encoder could not be started, could not be waited on, or
//   exited unsuccessfully.
// - I/O: copy, directory creation or subtree walk failures.
//
// Encode and I/O errors are subject to the run's `FailurePolicy`.

use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;

use thiserror::Error;

/// Custom error type for the dircomp core library.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Input path not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("Required external command not found: {0}")]
    DependencyNotFound(String),

    #[error("Failed to start command '{0}': {1}")]
    CommandStart(String, #[source] io::Error),

    #[error("Failed to wait for command '{0}': {1}")]
    CommandWait(String, #[source] io::Error),

    #[error("Command '{command}' failed with status {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("Failed to probe media file: {0}")]
    Probe(String),

    #[error("Failed to encode {}: {message}", path.display())]
    Encode { path: PathBuf, message: String },

    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Unsupported directory entry (not a file, directory or symlink): {}", .0.display())]
    UnsupportedEntry(PathBuf),
}

impl CoreError {
    /// Returns true for errors that abort a run before any entry is visited,
    /// regardless of the configured failure policy.
    #[must_use]
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            CoreError::Config(_) | CoreError::InputNotFound(_) | CoreError::DependencyNotFound(_)
        )
    }
}

/// Result type alias used throughout the core library.
pub type CoreResult<T> = std::result::Result<T, CoreError>;

// ---- Helper constructors ----

/// Creates a `CommandStart` error for a command that failed to spawn.
pub fn command_start_error(command: impl Into<String>, source: io::Error) -> CoreError {
    CoreError::CommandStart(command.into(), source)
}

/// Creates a `CommandWait` error for a command whose exit could not be collected.
pub fn command_wait_error(command: impl Into<String>, source: io::Error) -> CoreError {
    CoreError::CommandWait(command.into(), source)
}

/// Creates a `CommandFailed` error from an exit status and captured stderr.
pub fn command_failed_error(
    command: impl Into<String>,
    status: ExitStatus,
    stderr: impl Into<String>,
) -> CoreError {
    CoreError::CommandFailed {
        command: command.into(),
        status,
        stderr: stderr.into(),
    }
}

/// Attaches the offending path to an I/O error.
pub fn io_error(path: &Path, source: io::Error) -> CoreError {
    CoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_errors_are_flagged() {
        assert!(CoreError::Config("bad".into()).is_configuration_error());
        assert!(CoreError::InputNotFound(PathBuf::from("/nope")).is_configuration_error());
        assert!(CoreError::DependencyNotFound("ffmpeg".into()).is_configuration_error());

        let io = io_error(Path::new("/tmp/x"), io::Error::new(io::ErrorKind::Other, "boom"));
        assert!(!io.is_configuration_error());
        assert!(!CoreError::Probe("bad data".into()).is_configuration_error());
    }

    #[test]
    fn test_error_messages_include_paths() {
        let err = CoreError::Encode {
            path: PathBuf::from("/videos/a.mp4"),
            message: "ffmpeg exited with code 1".into(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to encode /videos/a.mp4: ffmpeg exited with code 1"
        );

        let err = io_error(
            Path::new("/out/b.txt"),
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.to_string().starts_with("I/O error at /out/b.txt"));
    }
}
