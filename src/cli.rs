//! CLI definitions: argument parsing and help text.

use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::core::config::FailurePolicy;
use crate::core::stream::Stream;

const AFTER_HELP: &str = "\
EXIT STATUS:
  0  proceed: launch the main program (up to date, updated, or a tolerated failure)
  1  fatal: do not launch the main program

EXAMPLES:
  romdrop-updater                        Update both streams, then exit
  romdrop-updater --check                Report available updates, change nothing
  romdrop-updater --stream catalog       Update only the catalog
  romdrop-updater --app-failure continue Launch even if the app update fails
";

/// Command-line arguments for the updater.
#[derive(Parser)]
#[command(
    author,
    version,
    about = "OTA updater for the RomDrop handheld ROM browser",
    after_help = AFTER_HELP
)]
pub struct Args {
    /// Only check whether updates are available; download and install nothing
    #[arg(long)]
    pub check: bool,

    /// Run a single stream instead of both
    #[arg(long, value_enum)]
    pub stream: Option<Stream>,

    /// Release repository (owner/name)
    #[arg(long)]
    pub repo: Option<String>,

    /// Base URL of the tag-listing API
    #[arg(long)]
    pub api_base: Option<String>,

    /// Base URL release assets are downloaded from
    #[arg(long)]
    pub download_base: Option<String>,

    /// Application install root
    #[arg(long, value_name = "PATH")]
    pub install_dir: Option<PathBuf>,

    /// Catalog file path
    #[arg(long, value_name = "PATH")]
    pub catalog: Option<PathBuf>,

    /// Version record path
    #[arg(long, value_name = "PATH")]
    pub version_file: Option<PathBuf>,

    /// Asset name of the application bundle inside a release
    #[arg(long, value_name = "NAME")]
    pub bundle_asset: Option<String>,

    /// Request timeout in seconds for metadata calls
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Skip TLS certificate verification (dangerous)
    #[arg(long)]
    pub insecure: bool,

    /// Skip the connectivity preflight
    #[arg(long)]
    pub no_preflight: bool,

    /// What an application-stream failure means for launch
    #[arg(long, value_enum)]
    pub app_failure: Option<FailurePolicy>,

    /// What a catalog-stream failure means for launch
    #[arg(long, value_enum)]
    pub catalog_failure: Option<FailurePolicy>,

    /// Increase log verbosity (use multiple times for debug)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,

    /// Reduce log output (errors only)
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,
}

impl Args {
    /// Log level based on -v/-q flags: error, warn, info, or debug.
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else if self.verbose >= 2 {
            "debug"
        } else if self.verbose >= 1 {
            "info"
        } else {
            "warn"
        }
    }
}
