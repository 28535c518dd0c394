//! Terminal UI components and styling for dircomp.
//!
//! Output follows a small visual hierarchy: section headers, status lines
//! (`label: value`), success lines and errors. Everything is emitted through
//! the `log` macros so it shares the logger's destination. During an encode a
//! spinner from `indicatif` shows the file and its progress.

use console::style;
use dircomp_core::ProgressReporter;
use dircomp_core::utils::format_duration;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use log::{debug, error, info, warn};
use std::cell::RefCell;
use std::io::IsTerminal;
use std::path::Path;
use std::time::Duration;

/// Width of the label column in status lines.
const LABEL_WIDTH: usize = 15;

/// Check if color should be used (respects NO_COLOR environment variable)
fn should_use_color() -> bool {
    std::env::var_os("NO_COLOR").is_none()
}

/// Print a section header for major workflow phases
pub fn print_section(title: &str) {
    info!("");
    if should_use_color() {
        info!("===== {} =====", style(title.to_uppercase()).cyan().bold());
    } else {
        info!("===== {} =====", title.to_uppercase());
    }
    info!("");
}

/// Print a status line (key-value pair)
pub fn print_status(label: &str, value: &str, highlight: bool) {
    let padding = LABEL_WIDTH.saturating_sub(label.chars().count()).max(1);
    if should_use_color() && highlight {
        info!("  {label}:{}{}", " ".repeat(padding), style(value).bold());
    } else {
        info!("  {label}:{}{value}", " ".repeat(padding));
    }
}

/// Print a success message
pub fn print_success(message: &str) {
    info!("");
    if should_use_color() {
        info!("  ✓ {}", style(message).green());
    } else {
        info!("  ✓ {message}");
    }
}

/// Print a warning line
pub fn print_warning(message: &str) {
    warn!("{message}");
}

/// Print an error message with an optional suggestion
pub fn print_error(title: &str, message: &str, suggestion: Option<&str>) {
    if should_use_color() {
        error!("✗ {}", style(title).red().bold());
    } else {
        error!("✗ {title}");
    }
    error!("  Message: {message}");
    if let Some(suggestion) = suggestion {
        error!("  Suggestion: {suggestion}");
    }
}

/// `ProgressReporter` that shows a spinner while a file is being encoded.
///
/// The spinner is drawn to stderr only when it is a terminal.
#[derive(Default)]
pub struct SpinnerReporter {
    current: RefCell<Option<ProgressBar>>,
}

impl SpinnerReporter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn start_spinner(name: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        if std::io::stderr().is_terminal() {
            pb.set_draw_target(ProgressDrawTarget::stderr());
            pb.enable_steady_tick(Duration::from_millis(120));
        } else {
            pb.set_draw_target(ProgressDrawTarget::hidden());
        }
        if let Ok(spinner_style) = ProgressStyle::default_spinner().template("  {spinner} {prefix} {msg}") {
            pb.set_style(spinner_style);
        }
        pb.set_prefix(name.to_string());
        pb.set_message("starting");
        pb
    }
}

impl ProgressReporter for SpinnerReporter {
    fn encode_started(&self, source: &Path, destination: &Path) {
        let name = source
            .file_name()
            .map_or_else(|| source.display().to_string(), |n| n.to_string_lossy().into_owned());
        info!("  » Encoding {name}");
        debug!("    -> {}", destination.display());
        *self.current.borrow_mut() = Some(Self::start_spinner(&name));
    }

    fn encode_progress(&self, percent: f32, elapsed_secs: f64, total_secs: f64) {
        if let Some(pb) = self.current.borrow().as_ref() {
            if total_secs > 0.0 {
                pb.set_message(format!(
                    "{percent:>5.1}% ({} / {})",
                    format_duration(elapsed_secs),
                    format_duration(total_secs)
                ));
            } else {
                pb.set_message(format_duration(elapsed_secs));
            }
        }
    }

    fn encode_finished(&self, _source: &Path, success: bool) {
        if let Some(pb) = self.current.borrow_mut().take() {
            if success {
                pb.finish_and_clear();
            } else {
                pb.abandon_with_message("failed");
            }
        }
    }

    fn file_copied(&self, source: &Path, _destination: &Path, bytes: u64) {
        debug!("Copied {} ({bytes} bytes)", source.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spinner_lifecycle_without_terminal() {
        let reporter = SpinnerReporter::new();
        reporter.encode_started(Path::new("/in/a.mp4"), Path::new("/out/a.mp4"));
        assert!(reporter.current.borrow().is_some());
        reporter.encode_progress(50.0, 5.0, 10.0);
        reporter.encode_finished(Path::new("/in/a.mp4"), true);
        assert!(reporter.current.borrow().is_none());
    }
}
