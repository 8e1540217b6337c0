//! Pipeline orchestration: logger init, the per-stream state machine, and
//! failure-policy mapping to the exit status.
//!
//! Streams run strictly in sequence: the application stream resolves fully
//! (success or failure) before the catalog stream starts, and both finish
//! before the caller launches the main program. That ordering is what keeps
//! the GUI from ever starting against a half-updated bundle plus a
//! mismatched catalog.

use std::process::ExitCode;

use reqwest::blocking::Client;

use crate::cli::Args;
use crate::core::config::{Config, FailurePolicy};
use crate::core::error::UpdateError;
use crate::core::stream::Stream;
use crate::core::version::VersionRecord;
use crate::core::{fetch, install, net, resolve, version};

/// Initialize env_logger from the -v/-q flags.
pub fn init_logger(args: &Args) {
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(args.log_level()),
    )
    .try_init();
}

/// Terminal state of one stream's update.
#[derive(Debug, PartialEq, Eq)]
enum StreamOutcome {
    UpToDate(String),
    /// `--check` mode stops here instead of entering FETCHING.
    UpdateAvailable { local: String, latest: String },
    Installed { from: String, to: String },
}

/// Which streams to run, in pipeline order.
fn selected_streams(args: &Args) -> Vec<Stream> {
    match args.stream {
        Some(stream) => vec![stream],
        None => vec![Stream::App, Stream::Catalog],
    }
}

/// Drive one stream through CHECK -> FETCHING -> INSTALLING.
///
/// Any error leaves the persisted version and the previous artifact in
/// place; the caller decides via policy whether it blocks launch.
fn run_stream(
    client: &Client,
    config: &Config,
    stream: Stream,
    check_only: bool,
) -> Result<StreamOutcome, UpdateError> {
    println!("Checking for {} updates...", stream.label());

    let local = VersionRecord::load(&config.version_file).get(stream);
    let latest = resolve::latest_version(client, config, stream)?;
    log::info!("{}: local {local}, latest {latest}", stream.label());

    if !version::needs_update(&local, &latest) {
        println!("{} is up to date ({latest})", stream.label());
        return Ok(StreamOutcome::UpToDate(latest));
    }
    if check_only {
        println!("{} update available: {local} -> {latest}", stream.label());
        return Ok(StreamOutcome::UpdateAvailable { local, latest });
    }

    println!("Updating {}: {local} -> {latest}", stream.label());
    let staging = fetch::staging_dir(config, stream)?;
    let artifact = fetch::fetch(client, config, stream, &latest, staging.path())?;
    install::install(config, stream, &artifact, &latest)?;
    println!("{} updated to {latest}", stream.label());

    Ok(StreamOutcome::Installed { from: local, to: latest })
}

/// Run the whole pipeline. Returns the process exit status: zero means the
/// caller may launch the main program, one means it must not.
pub fn run(args: &Args, config: &Config) -> ExitCode {
    let client = match net::client(config) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::from(1);
        }
    };

    if config.preflight && !net::preflight(&client, config) {
        eprintln!("No internet connection.");
        return ExitCode::from(1);
    }

    for stream in selected_streams(args) {
        match run_stream(&client, config, stream, args.check) {
            Ok(StreamOutcome::UpToDate(v)) => {
                log::debug!("{}: up to date at {v}", stream.label());
            }
            Ok(StreamOutcome::UpdateAvailable { local, latest }) => {
                log::info!("{}: update available {local} -> {latest}", stream.label());
            }
            Ok(StreamOutcome::Installed { from, to }) => {
                log::info!("{}: installed {from} -> {to}", stream.label());
            }
            Err(e) => {
                eprintln!("{} update failed: {e}", stream.label());
                match config.policy(stream) {
                    FailurePolicy::Fatal => return ExitCode::from(1),
                    FailurePolicy::Continue => {
                        log::warn!(
                            "continuing with the current {} version by policy",
                            stream.label()
                        );
                    }
                }
            }
        }
    }
    ExitCode::SUCCESS
}
