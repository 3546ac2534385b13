//! `libris`: interactive library catalog manager.
//!
//! # Responsibility
//! - Resolve configuration, start logging and open the catalog database.
//! - Hand stdin/stdout to the menu loop.

mod app;
mod config;
mod menu;
mod prompt;

use app::App;
use clap::Parser;
use config::Cli;
use libris_core::{init_logging, open_db, SystemClock};
use log::{error, info};
use std::io;
use std::process::ExitCode;

fn main() -> ExitCode {
    let config = match Cli::parse().resolve() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: cannot determine working directory: {err}");
            return ExitCode::FAILURE;
        }
    };

    // Logging is diagnostic only; the catalog stays usable without it.
    if let Err(err) = init_logging(&config.log_level, &config.log_dir) {
        eprintln!("warning: logging disabled: {err}");
    }

    let db = match open_db(&config.db_path) {
        Ok(db) => db,
        Err(err) => {
            error!(
                "event=cli_start module=cli status=error error_code=db_open_failed error={}",
                err
            );
            eprintln!(
                "error: cannot open catalog `{}`: {err}",
                config.db_path.display()
            );
            return ExitCode::FAILURE;
        }
    };
    info!(
        "event=cli_start module=cli status=ok version={}",
        libris_core::core_version()
    );

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut app = App::new(db, stdin.lock(), stdout.lock(), SystemClock);
    match app.run() {
        Ok(()) => {
            info!("event=cli_exit module=cli status=ok");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("event=cli_exit module=cli status=error error={}", err);
            eprintln!("error: terminal I/O failed: {err}");
            ExitCode::FAILURE
        }
    }
}
