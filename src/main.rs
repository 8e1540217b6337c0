//! # RomDrop OTA updater
//!
//! Runs on the device before the main ROM-browser program starts. Two update
//! streams are driven in sequence: the application bundle, then the content
//! catalog. The exit status is the caller contract: zero means "launch the
//! main program", one means "fatal, do not launch".

mod cli;
mod core;
mod run;

use std::process::ExitCode;

use clap::Parser;

fn main() -> ExitCode {
    let args = cli::Args::parse();
    run::init_logger(&args);

    // Print a user-friendly message on bad configuration; exit uses Display not Debug.
    let config = core::config::load(&args).unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });

    run::run(&args, &config)
}
