//! `pd` binary entry point.
//!
//! Parses the command line, loads configuration, installs file logging, runs
//! one command, and prints its outcome. Only the jump target (or a listing the
//! user asked for) goes to stdout; summaries and errors go to stderr.
//!
//! # Exit Status
//!
//! - `0`: success, including a cancelled selection (the current directory is
//!   printed so the wrapper's `cd` is a no-op)
//! - `1`: resolution, history, configuration, or selector failure
//! - `2`: invalid command line (reported by clap)

#![allow(clippy::multiple_crate_versions)]

use clap::Parser;
use pd::cli::Cli;
use pd::{handle_command, observability, App, Config, Outcome};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(outcome) => {
            if let Some(text) = outcome.stdout() {
                println!("{text}");
            }
            if let Some(summary) = outcome.summary() {
                eprintln!("{summary}");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            eprintln!("pd: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> pd::Result<Outcome> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(history) = &cli.history {
        config = config.with_history_file(history);
    }

    observability::init_tracing(&config);

    let command = cli.to_command();
    tracing::debug!(command = ?command, history = %config.history_file.display(), "starting");

    let mut app = App::from_config(config);
    handle_command(&mut app, &command)
}
