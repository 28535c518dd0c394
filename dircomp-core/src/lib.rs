//! Core library for mirroring a directory tree while re-encoding its videos.
//!
//! This crate walks an input tree, classifies each file with ffprobe,
//! re-encodes videos through ffmpeg and copies everything else unchanged into
//! an output tree with the same structure.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use dircomp_core::{CoreConfig, process_tree};
//! use dircomp_core::external::{CrateFfprobeProber, SidecarSpawner, check_dependency};
//! use dircomp_core::progress_reporting::NoopReporter;
//! use std::path::PathBuf;
//!
//! let mut config = CoreConfig::new(
//!     PathBuf::from("/path/to/input"),
//!     PathBuf::from("/path/to/output"),
//! );
//! config.recursive = true;
//! config.min_size = 50 * 1024 * 1024;
//! config.crf = Some(28);
//! config.validate().unwrap();
//!
//! check_dependency("ffmpeg").unwrap();
//! check_dependency("ffprobe").unwrap();
//!
//! let summary = process_tree(
//!     &SidecarSpawner,
//!     &CrateFfprobeProber::new(),
//!     &NoopReporter,
//!     &config,
//! ).unwrap();
//! println!("{} encoded, {} copied", summary.encoded.len(), summary.files_copied);
//! ```

pub mod config;
pub mod error;
pub mod external;
pub mod processing;
pub mod progress_reporting;
pub mod utils;

// Re-exports for public API
pub use config::{CoreConfig, CoreConfigBuilder, FailurePolicy, QualityControl, Scale};
pub use error::{CoreError, CoreResult};
pub use processing::{EncodeResult, EntryFailure, RunSummary, process_tree};
pub use progress_reporting::{NoopReporter, ProgressReporter};
pub use utils::{format_bytes, format_duration, parse_byte_size};
