//! Implementation of the compress run.
//!
//! Builds and validates the core configuration from the parsed arguments,
//! checks for ffmpeg and ffprobe, hands the tree to `dircomp-core` and prints
//! the summary.

use crate::cli::Cli;
use crate::error::CliResult;
use crate::terminal::{self, SpinnerReporter};

use dircomp_core::config::CoreConfigBuilder;
use dircomp_core::external::{CrateFfprobeProber, SidecarSpawner, check_dependency};
use dircomp_core::utils::calculate_size_reduction;
use dircomp_core::{CoreConfig, RunSummary, format_bytes, format_duration, process_tree};

use log::debug;
use std::time::Instant;

/// Builds a validated `CoreConfig` from the command-line arguments.
pub fn build_config(cli: &Cli) -> CliResult<CoreConfig> {
    let mut builder = CoreConfigBuilder::new()
        .input_path(cli.input_path.clone())
        .output_path(cli.output_path.clone())
        .recursive(cli.recursive)
        .min_size(cli.min_size)
        .video_codec(cli.video_codec.clone())
        .failure_policy(cli.on_error.into());

    if let Some(crf) = cli.crf {
        builder = builder.crf(crf);
    }
    if let Some(bitrate) = &cli.bitrate {
        builder = builder.bitrate(bitrate.clone());
    }
    if let Some(scale) = cli.scale {
        builder = builder.scale(scale.into());
    }
    if let Some(filter) = &cli.video_filter {
        builder = builder.video_filter(filter.clone());
    }

    builder.build()
}

/// Runs a full compression pass and prints its summary.
///
/// Returns the run summary; the caller decides the exit code from it.
pub fn run_compress(cli: &Cli) -> CliResult<RunSummary> {
    let start = Instant::now();
    let config = build_config(cli)?;

    check_dependency("ffmpeg")?;
    check_dependency("ffprobe")?;
    debug!("External dependency check passed.");

    print_configuration(&config);

    terminal::print_section("Processing");
    let reporter = SpinnerReporter::new();
    let summary = process_tree(&SidecarSpawner, &CrateFfprobeProber::new(), &reporter, &config)?;

    print_summary(&config, &summary, start);
    Ok(summary)
}

fn print_configuration(config: &CoreConfig) {
    terminal::print_section("Configuration");
    terminal::print_status("Input", &config.input_path.display().to_string(), false);
    terminal::print_status("Output", &config.output_path.display().to_string(), false);
    terminal::print_status(
        "Mode",
        if config.recursive { "recursive" } else { "top level only" },
        false,
    );
    terminal::print_status("Min size", &format_bytes(config.min_size), false);
    terminal::print_status("Codec", &config.video_codec, false);
    terminal::print_status("Quality", &config.quality().to_string(), true);
    if let Some(filter) = config.effective_video_filter() {
        terminal::print_status("Filter", &filter, false);
    }
}

fn print_summary(config: &CoreConfig, summary: &RunSummary, start: Instant) {
    terminal::print_section("Summary");

    for result in &summary.encoded {
        terminal::print_status(
            "Encoded",
            &format!(
                "{} ({} -> {}, {}% smaller, {})",
                result.source.display(),
                format_bytes(result.input_size),
                format_bytes(result.output_size),
                calculate_size_reduction(result.input_size, result.output_size),
                format_duration(result.duration.as_secs_f64())
            ),
            false,
        );
    }

    let input_bytes = summary.encoded_input_bytes();
    let output_bytes = summary.encoded_output_bytes();
    terminal::print_status("Videos", &summary.encoded.len().to_string(), true);
    if !summary.encoded.is_empty() {
        terminal::print_status(
            "Video size",
            &format!(
                "{} -> {} ({}% smaller)",
                format_bytes(input_bytes),
                format_bytes(output_bytes),
                calculate_size_reduction(input_bytes, output_bytes)
            ),
            true,
        );
    }
    terminal::print_status(
        "Copied",
        &format!(
            "{} files ({})",
            summary.files_copied,
            format_bytes(summary.bytes_copied)
        ),
        false,
    );
    if summary.subtrees_copied > 0 {
        terminal::print_status(
            "Directories",
            &format!("{} copied unchanged", summary.subtrees_copied),
            false,
        );
    }
    terminal::print_status(
        "Total time",
        &format_duration(start.elapsed().as_secs_f64()),
        false,
    );

    if summary.has_failures() {
        for failure in &summary.failures {
            terminal::print_warning(&format!("Failed: {}", failure.error));
        }
        terminal::print_error(
            "Completed with failures",
            &format!("{} entries could not be processed", summary.failures.len()),
            None,
        );
    } else {
        terminal::print_success(&format!(
            "Successfully compressed {} into {}",
            config.input_path.display(),
            config.output_path.display()
        ));
    }
}
