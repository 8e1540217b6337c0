//! Artifact fetcher: downloads a versioned release asset into staging.
//!
//! Nothing at a final path is touched here. The payload is streamed into a
//! file inside a staging directory created on the same filesystem as the
//! destination, so the installer can promote it with a rename instead of a
//! copy. A failed download removes only its own partial staging file.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use reqwest::blocking::Client;
use tempfile::TempDir;

use crate::core::config::Config;
use crate::core::error::UpdateError;
use crate::core::stream::Stream;

/// Asset file name for `(stream, version)` in a release.
pub fn artifact_file_name(config: &Config, stream: Stream, version: &str) -> String {
    match stream {
        Stream::App => config.bundle_asset.clone(),
        Stream::Catalog => format!("catalog-{version}.db"),
    }
}

/// Download URL for `(repo, stream, version)`, matching the release naming
/// convention: plain version tag for the application, `<version>-db` tag and
/// a versioned file name for the catalog.
pub fn artifact_url(config: &Config, stream: Stream, version: &str) -> String {
    format!(
        "{}/{}/releases/download/{}/{}",
        config.download_base,
        config.repo,
        stream.release_tag(version),
        artifact_file_name(config, stream, version)
    )
}

/// Directory that sibling staging paths for `path` should live in. Falls
/// back to the current directory for bare relative paths.
pub(crate) fn staging_anchor(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// Create the staging directory for `stream` next to its destination.
pub fn staging_dir(config: &Config, stream: Stream) -> Result<TempDir, UpdateError> {
    let anchor = match stream {
        Stream::App => staging_anchor(&config.install_dir).to_path_buf(),
        Stream::Catalog => {
            let parent = staging_anchor(&config.catalog_path).to_path_buf();
            fs::create_dir_all(&parent)
                .map_err(|e| UpdateError::Fetch(format!("could not create {}: {e}", parent.display())))?;
            parent
        }
    };
    tempfile::Builder::new()
        .prefix(".ota-staging-")
        .tempdir_in(&anchor)
        .map_err(|e| UpdateError::Fetch(format!("could not create staging directory: {e}")))
}

/// Download the artifact for `(stream, version)` into `staging`.
///
/// Fails on any transport, TLS, or non-2xx condition; the existing artifact
/// and the version record are left byte-for-byte unchanged.
pub fn fetch(
    client: &Client,
    config: &Config,
    stream: Stream,
    version: &str,
    staging: &Path,
) -> Result<PathBuf, UpdateError> {
    let url = artifact_url(config, stream, version);
    log::info!("downloading {} artifact from {url}", stream.label());

    let mut response = client
        .get(&url)
        .timeout(config.download_timeout)
        .send()
        .map_err(UpdateError::fetch)?;
    let status = response.status();
    if !status.is_success() {
        return Err(UpdateError::Fetch(format!("{url} returned {status}")));
    }

    let path = staging.join(artifact_file_name(config, stream, version));
    let mut file = fs::File::create(&path).map_err(UpdateError::fetch)?;
    let copied = io::copy(&mut response, &mut file).and_then(|_| file.sync_all());
    if let Err(e) = copied {
        drop(file);
        let _ = fs::remove_file(&path);
        return Err(UpdateError::Fetch(format!("download interrupted: {e}")));
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config;
    use clap::Parser;

    fn test_config() -> Config {
        config::load(&crate::cli::Args::parse_from([
            "romdrop-updater",
            "--repo",
            "romdrop/RomDrop",
            "--install-dir",
            "/opt/romdrop",
        ]))
        .expect("config")
    }

    #[test]
    fn application_url_uses_plain_tag_and_bundle_asset() {
        let config = test_config();
        assert_eq!(
            artifact_url(&config, Stream::App, "v1.2.0"),
            "https://github.com/romdrop/RomDrop/releases/download/v1.2.0/RomDrop.zip"
        );
    }

    #[test]
    fn catalog_url_uses_db_tag_and_versioned_file() {
        let config = test_config();
        assert_eq!(
            artifact_url(&config, Stream::Catalog, "v1.0.0"),
            "https://github.com/romdrop/RomDrop/releases/download/v1.0.0-db/catalog-v1.0.0.db"
        );
    }

    #[test]
    fn staging_anchor_falls_back_to_current_dir() {
        assert_eq!(staging_anchor(Path::new("/opt/romdrop")), Path::new("/opt"));
        assert_eq!(staging_anchor(Path::new("catalog.db")), Path::new("."));
    }
}
