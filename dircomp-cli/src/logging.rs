// ============================================================================
// dircomp-cli/src/logging.rs
// ============================================================================
//
// LOGGING SETUP: env_logger initialization for the CLI
//
// All output, including the terminal UI, goes through the `log` crate.
// Info records are printed bare so the UI reads cleanly; every other level
// gets a timestamp and a colored level tag.
//
// USAGE:
// - default: info
// - --verbose: debug
// - RUST_LOG overrides both, e.g. RUST_LOG=ffmpeg_log=trace

use console::style;
use log::LevelFilter;
use std::io::Write;

/// Returns the current local time formatted as "HH:MM:SS".
#[must_use]
pub fn get_timestamp() -> String {
    chrono::Local::now().format("%H:%M:%S").to_string()
}

/// Initializes the global logger. Safe to call more than once; later calls
/// are ignored.
pub fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let mut builder = env_logger::Builder::new();
    builder.filter_level(level);
    if let Ok(spec) = std::env::var("RUST_LOG") {
        builder.parse_filters(&spec);
    }

    builder.format(|buf, record| {
        if record.level() == log::Level::Info {
            return writeln!(buf, "{}", record.args());
        }
        let level = match record.level() {
            log::Level::Error => style("ERROR").red().bold(),
            log::Level::Warn => style("WARN ").yellow(),
            log::Level::Debug => style("DEBUG").blue(),
            _ => style("TRACE").magenta(),
        };
        writeln!(
            buf,
            "{} {} {}",
            style(get_timestamp()).dim(),
            level,
            record.args()
        )
    });

    if builder.try_init().is_ok() {
        log::debug!("Logger initialized with level: {level}");
    }
}
