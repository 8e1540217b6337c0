//! Updater configuration: environment defaults with CLI overrides.
//!
//! Everything the pipeline needs is resolved once into an explicit [`Config`]
//! and passed down; nothing below this layer reads the environment.
//! Precedence is CLI flag, then `ROMDROP_*` environment variable, then a
//! device-appropriate default.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use clap::ValueEnum;

use crate::cli::Args;
use crate::core::app;
use crate::core::stream::Stream;

/// What a stream's resolution/fetch/install failure means for launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FailurePolicy {
    /// Exit 1; the caller must not start the main program.
    Fatal,
    /// Log the failure, keep the current version, and proceed.
    Continue,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Release repository slug, `owner/name`.
    pub repo: String,
    /// Base URL of the tag-listing API.
    pub api_base: String,
    /// Base URL release assets are downloaded from.
    pub download_base: String,
    /// Directory the application bundle is installed into.
    pub install_dir: PathBuf,
    /// Path of the installed catalog file.
    pub catalog_path: PathBuf,
    /// Path of the persisted version record.
    pub version_file: PathBuf,
    /// Asset name of the application bundle inside a release.
    pub bundle_asset: String,
    /// Timeout for metadata requests (tag listing, preflight).
    pub request_timeout: Duration,
    /// Timeout for artifact downloads.
    pub download_timeout: Duration,
    /// Skip TLS certificate verification. The device trust store is known
    /// to be broken; this stays an explicit, loudly logged opt-in.
    pub insecure_tls: bool,
    /// Run the connectivity preflight before either stream.
    pub preflight: bool,
    pub app_failure: FailurePolicy,
    pub catalog_failure: FailurePolicy,
}

impl Config {
    pub fn policy(&self, stream: Stream) -> FailurePolicy {
        match stream {
            Stream::App => self.app_failure,
            Stream::Catalog => self.catalog_failure,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid repository '{0}': expected owner/name")]
    InvalidRepo(String),
    #[error("invalid value for {var}: '{value}'")]
    InvalidEnv { var: &'static str, value: String },
}

fn env_or(var: &str, default: &str) -> String {
    env::var(var).unwrap_or_else(|_| default.to_string())
}

fn env_flag(var: &str) -> bool {
    matches!(env::var(var).as_deref(), Ok("1") | Ok("true") | Ok("yes"))
}

fn env_secs(var: &'static str, default: u64) -> Result<u64, ConfigError> {
    match env::var(var) {
        Ok(value) => value
            .parse()
            .map_err(|_| ConfigError::InvalidEnv { var, value }),
        Err(_) => Ok(default),
    }
}

fn env_policy(var: &'static str, default: FailurePolicy) -> Result<FailurePolicy, ConfigError> {
    match env::var(var) {
        Ok(value) => match value.as_str() {
            "fatal" => Ok(FailurePolicy::Fatal),
            "continue" => Ok(FailurePolicy::Continue),
            _ => Err(ConfigError::InvalidEnv { var, value }),
        },
        Err(_) => Ok(default),
    }
}

/// Install root default: the directory holding the running executable, like
/// the rest of the launch scripts assume.
fn default_install_dir() -> PathBuf {
    env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Build the configuration from CLI arguments and the environment.
pub fn load(args: &Args) -> Result<Config, ConfigError> {
    let repo = args
        .repo
        .clone()
        .unwrap_or_else(|| env_or("ROMDROP_REPO", app::DEFAULT_REPO));
    if repo.split('/').filter(|part| !part.is_empty()).count() != 2 {
        return Err(ConfigError::InvalidRepo(repo));
    }

    let install_dir = args
        .install_dir
        .clone()
        .or_else(|| env::var("ROMDROP_INSTALL_DIR").ok().map(PathBuf::from))
        .unwrap_or_else(default_install_dir);

    let catalog_path = args
        .catalog
        .clone()
        .or_else(|| env::var("ROMDROP_CATALOG").ok().map(PathBuf::from))
        .unwrap_or_else(|| install_dir.join("assets").join(app::CATALOG_FILE));

    let version_file = args
        .version_file
        .clone()
        .or_else(|| env::var("ROMDROP_VERSION_FILE").ok().map(PathBuf::from))
        .unwrap_or_else(|| install_dir.join(app::VERSION_FILE));

    let request_timeout = match args.timeout {
        Some(secs) => secs,
        None => env_secs("ROMDROP_TIMEOUT_SECS", 15)?,
    };
    let download_timeout = env_secs("ROMDROP_DOWNLOAD_TIMEOUT_SECS", 600)?;

    let app_failure = match args.app_failure {
        Some(policy) => policy,
        None => env_policy("ROMDROP_APP_FAILURE", FailurePolicy::Fatal)?,
    };
    let catalog_failure = match args.catalog_failure {
        Some(policy) => policy,
        None => env_policy("ROMDROP_CATALOG_FAILURE", FailurePolicy::Continue)?,
    };

    Ok(Config {
        repo,
        api_base: args
            .api_base
            .clone()
            .unwrap_or_else(|| env_or("ROMDROP_API_BASE", "https://api.github.com")),
        download_base: args
            .download_base
            .clone()
            .unwrap_or_else(|| env_or("ROMDROP_DOWNLOAD_BASE", "https://github.com")),
        install_dir,
        catalog_path,
        version_file,
        bundle_asset: args
            .bundle_asset
            .clone()
            .unwrap_or_else(|| env_or("ROMDROP_BUNDLE_ASSET", app::DEFAULT_BUNDLE_ASSET)),
        request_timeout: Duration::from_secs(request_timeout),
        download_timeout: Duration::from_secs(download_timeout),
        insecure_tls: args.insecure || env_flag("ROMDROP_INSECURE_TLS"),
        preflight: !args.no_preflight,
        app_failure,
        catalog_failure,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn args(argv: &[&str]) -> Args {
        let mut full = vec!["romdrop-updater"];
        full.extend_from_slice(argv);
        Args::parse_from(full)
    }

    #[test]
    fn cli_flags_override_defaults() {
        let config = load(&args(&[
            "--repo",
            "owner/name",
            "--install-dir",
            "/tmp/bundle",
            "--timeout",
            "3",
            "--insecure",
        ]))
        .expect("config");
        assert_eq!(config.repo, "owner/name");
        assert_eq!(config.install_dir, PathBuf::from("/tmp/bundle"));
        assert_eq!(config.catalog_path, PathBuf::from("/tmp/bundle/assets/catalog.db"));
        assert_eq!(config.version_file, PathBuf::from("/tmp/bundle/version.txt"));
        assert_eq!(config.request_timeout, Duration::from_secs(3));
        assert!(config.insecure_tls);
        assert!(config.preflight);
    }

    #[test]
    fn repo_without_owner_is_rejected() {
        let err = load(&args(&["--repo", "noslash"])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidRepo(_)));
    }

    #[test]
    fn default_policies_are_fatal_app_continue_catalog() {
        let config = load(&args(&[])).expect("config");
        assert_eq!(config.policy(Stream::App), FailurePolicy::Fatal);
        assert_eq!(config.policy(Stream::Catalog), FailurePolicy::Continue);
    }

    #[test]
    fn policies_are_configurable_per_stream() {
        let config = load(&args(&[
            "--app-failure",
            "continue",
            "--catalog-failure",
            "fatal",
        ]))
        .expect("config");
        assert_eq!(config.policy(Stream::App), FailurePolicy::Continue);
        assert_eq!(config.policy(Stream::Catalog), FailurePolicy::Fatal);
    }
}
