// ============================================================================
// dircomp-core/src/processing/traversal.rs
// ============================================================================
//
// DIRECTORY TRAVERSAL: Mirror an input tree into an output tree
//
// This module houses the main orchestration logic of the library. It walks
// the input tree depth first and produces exactly one output entry for every
// input entry:
//
// - directories are recreated and recursed into (recursive mode) or copied
//   wholesale (default)
// - files below the minimum size are copied without being probed
// - files that are not videos are copied
// - videos are re-encoded through ffmpeg
// - dangling symbolic links and links to directories are recreated as links
//
// Entries are visited in file name order so runs are reproducible. Encode and
// I/O failures are handled according to the configured `FailurePolicy`.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use log::{debug, info, warn};

use crate::config::{CoreConfig, FailurePolicy};
use crate::error::{CoreError, CoreResult, io_error};
use crate::external::{EncodeParams, EncodeRequest, EncoderSpawner, MediaProber, run_encoder};
use crate::processing::classify::{Classification, classify};
use crate::processing::copy::{copy_file, copy_symlink, copy_tree};
use crate::progress_reporting::ProgressReporter;
use crate::utils::{calculate_size_reduction, format_bytes, format_duration};

/// A pending `(input, output)` pair for one directory entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraversalTask {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
}

/// Details of one successfully encoded file.
#[derive(Debug, Clone)]
pub struct EncodeResult {
    pub source: PathBuf,
    pub destination: PathBuf,
    /// Wall-clock time spent in ffmpeg
    pub duration: Duration,
    pub input_size: u64,
    pub output_size: u64,
}

/// A per-entry failure recorded under `FailurePolicy::Continue`.
#[derive(Debug)]
pub struct EntryFailure {
    pub path: PathBuf,
    pub error: CoreError,
}

/// Everything a run did.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub encoded: Vec<EncodeResult>,
    /// Files copied unchanged, including those inside wholesale subtree copies
    pub files_copied: u64,
    pub bytes_copied: u64,
    /// Directories copied wholesale (non-recursive mode)
    pub subtrees_copied: u64,
    /// Symbolic links recreated at the traversal level
    pub links_recreated: u64,
    /// Output directories created by the traversal itself
    pub directories_created: u64,
    pub failures: Vec<EntryFailure>,
}

impl RunSummary {
    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Combined size of all encoded inputs.
    #[must_use]
    pub fn encoded_input_bytes(&self) -> u64 {
        self.encoded.iter().map(|r| r.input_size).sum()
    }

    /// Combined size of all encoded outputs.
    #[must_use]
    pub fn encoded_output_bytes(&self) -> u64 {
        self.encoded.iter().map(|r| r.output_size).sum()
    }
}

/// Processes the configured input (directory or single file) into the
/// configured output.
///
/// The configuration is expected to have passed `CoreConfig::validate`.
/// External tools are reached only through `spawner` and `prober`; progress
/// goes to `reporter`.
///
/// # Errors
///
/// * `CoreError::InputNotFound` - If the input path does not exist
/// * `CoreError::Config` - If a single-file input would be written onto itself
/// * Any encode or I/O error when the failure policy is `Abort`, or when
///   the output root itself cannot be created
///
/// # Examples
///
/// ```rust,no_run
/// use dircomp_core::{CoreConfig, process_tree};
/// use dircomp_core::external::{CrateFfprobeProber, SidecarSpawner};
/// use dircomp_core::progress_reporting::NoopReporter;
/// use std::path::PathBuf;
///
/// let mut config = CoreConfig::new(PathBuf::from("/videos"), PathBuf::from("/videos-small"));
/// config.recursive = true;
/// config.validate().unwrap();
///
/// let summary = process_tree(&SidecarSpawner, &CrateFfprobeProber::new(), &NoopReporter, &config)
///     .unwrap();
/// println!("{} files encoded", summary.encoded.len());
/// ```
pub fn process_tree<S: EncoderSpawner, P: MediaProber>(
    spawner: &S,
    prober: &P,
    reporter: &dyn ProgressReporter,
    config: &CoreConfig,
) -> CoreResult<RunSummary> {
    let input = &config.input_path;
    let output = &config.output_path;

    let input_metadata = fs::metadata(input).map_err(|_| CoreError::InputNotFound(input.clone()))?;

    let mut traversal = Traversal {
        spawner,
        prober,
        reporter,
        config,
        params: EncodeParams::from_config(config),
        summary: RunSummary::default(),
    };

    if input_metadata.is_file() {
        config.check_single_file_destination()?;
        let destination = config.single_file_destination();
        if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
        }
        traversal.dispatch_guarded(TraversalTask {
            input_path: input.clone(),
            output_path: destination,
        })?;
    } else {
        if !output.is_dir() {
            fs::create_dir_all(output).map_err(|e| io_error(output, e))?;
            traversal.summary.directories_created += 1;
        }
        traversal.walk_directory(input, output)?;
    }

    Ok(traversal.summary)
}

/// State carried through one run.
struct Traversal<'a, S, P> {
    spawner: &'a S,
    prober: &'a P,
    reporter: &'a dyn ProgressReporter,
    config: &'a CoreConfig,
    params: EncodeParams,
    summary: RunSummary,
}

impl<S: EncoderSpawner, P: MediaProber> Traversal<'_, S, P> {
    /// Visits every entry of `input_dir`, writing results under `output_dir`.
    fn walk_directory(&mut self, input_dir: &Path, output_dir: &Path) -> CoreResult<()> {
        let mut entries = fs::read_dir(input_dir)
            .map_err(|e| io_error(input_dir, e))?
            .map(|entry| entry.map(|e| e.file_name()))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| io_error(input_dir, e))?;
        entries.sort();

        for name in entries {
            self.dispatch_guarded(TraversalTask {
                input_path: input_dir.join(&name),
                output_path: output_dir.join(&name),
            })?;
        }

        debug!(
            "Compressed directory {} into {}",
            input_dir.display(),
            output_dir.display()
        );
        Ok(())
    }

    /// Dispatches a task and applies the failure policy to whatever it returns.
    fn dispatch_guarded(&mut self, task: TraversalTask) -> CoreResult<()> {
        match self.dispatch(&task) {
            Ok(()) => Ok(()),
            Err(error)
                if self.config.failure_policy == FailurePolicy::Continue
                    && !error.is_configuration_error() =>
            {
                warn!("{error}; continuing");
                self.summary.failures.push(EntryFailure {
                    path: task.input_path,
                    error,
                });
                Ok(())
            }
            Err(error) => Err(error),
        }
    }

    fn dispatch(&mut self, task: &TraversalTask) -> CoreResult<()> {
        let input = &task.input_path;
        let output = &task.output_path;
        debug!("Visiting {}", input.display());

        let link_metadata = fs::symlink_metadata(input).map_err(|e| io_error(input, e))?;

        let metadata = if link_metadata.file_type().is_symlink() {
            match fs::metadata(input) {
                Ok(target) if target.is_file() => target,
                // Dangling links and links to directories stay links.
                _ => {
                    copy_symlink(input, output)?;
                    self.summary.links_recreated += 1;
                    return Ok(());
                }
            }
        } else {
            link_metadata
        };

        if metadata.is_dir() {
            if self.config.recursive {
                fs::create_dir_all(output).map_err(|e| io_error(output, e))?;
                self.summary.directories_created += 1;
                self.walk_directory(input, output)
            } else {
                let stats = copy_tree(input, output)?;
                debug!(
                    "Copied directory {} ({} files, {})",
                    input.display(),
                    stats.files,
                    format_bytes(stats.bytes)
                );
                self.summary.subtrees_copied += 1;
                self.summary.files_copied += stats.files;
                self.summary.bytes_copied += stats.bytes;
                Ok(())
            }
        } else if metadata.is_file() {
            self.handle_file(task, metadata.len())
        } else {
            Err(CoreError::UnsupportedEntry(input.clone()))
        }
    }

    fn handle_file(&mut self, task: &TraversalTask, size: u64) -> CoreResult<()> {
        if size < self.config.min_size {
            debug!(
                "{} is below the minimum size ({} < {}), copying",
                task.input_path.display(),
                format_bytes(size),
                format_bytes(self.config.min_size)
            );
            return self.copy(task);
        }

        match classify(self.prober, &task.input_path) {
            Classification::NotVideo => self.copy(task),
            Classification::Video { duration } => self.encode(task, size, duration),
        }
    }

    fn copy(&mut self, task: &TraversalTask) -> CoreResult<()> {
        let bytes = copy_file(&task.input_path, &task.output_path)?;
        self.summary.files_copied += 1;
        self.summary.bytes_copied += bytes;
        self.reporter
            .file_copied(&task.input_path, &task.output_path, bytes);
        Ok(())
    }

    fn encode(&mut self, task: &TraversalTask, input_size: u64, duration: Option<f64>) -> CoreResult<()> {
        let request = EncodeRequest {
            source: task.input_path.clone(),
            destination: task.output_path.clone(),
            params: self.params.clone(),
            duration,
        };

        self.reporter
            .encode_started(&request.source, &request.destination);
        let start = Instant::now();
        let result = run_encoder(self.spawner, &request, self.reporter);
        let success = matches!(&result, Ok(outcome) if outcome.success);
        self.reporter.encode_finished(&request.source, success);
        result?.into_result(&request.source)?;

        let elapsed = start.elapsed();
        let output_size = fs::metadata(&request.destination)
            .map_err(|e| io_error(&request.destination, e))?
            .len();

        info!(
            "Encoded {} in {}: {} -> {} ({}% smaller)",
            request.source.display(),
            format_duration(elapsed.as_secs_f64()),
            format_bytes(input_size),
            format_bytes(output_size),
            calculate_size_reduction(input_size, output_size)
        );

        self.summary.encoded.push(EncodeResult {
            source: request.source,
            destination: request.destination,
            duration: elapsed,
            input_size,
            output_size,
        });
        Ok(())
    }
}
