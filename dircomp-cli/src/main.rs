// dircomp-cli/src/main.rs
//
// Entry point for the dircomp binary.
//
// Responsibilities:
// - Parsing command-line arguments.
// - Initializing logging.
// - Running the compression pass.
// - Mapping the outcome to an exit code: 0 on a clean run, 1 on any
//   returned error or recorded per-file failure.

use clap::Parser;
use dircomp_cli::error::error_suggestion;
use dircomp_cli::{Cli, logging, run_compress, terminal};
use std::process;

fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    match run_compress(&cli) {
        Ok(summary) if summary.has_failures() => process::exit(1),
        Ok(_) => {}
        Err(e) => {
            let title = if e.is_configuration_error() {
                "Configuration error"
            } else {
                "Run failed"
            };
            terminal::print_error(title, &e.to_string(), error_suggestion(&e));
            process::exit(1);
        }
    }
}
