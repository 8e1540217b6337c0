//! Installer: promotes a fully downloaded artifact into its final location
//! and persists the new version.
//!
//! Both streams stage first and touch the previous artifact last. The
//! catalog is a single `rename` over the old file. The bundle is extracted
//! into a sibling staging directory and swapped in with two renames; the
//! window between them is the one remaining non-crash-safe moment (the
//! device has no spare partition for a blue-green swap), far smaller than a
//! wipe-then-extract.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::core::config::Config;
use crate::core::error::UpdateError;
use crate::core::fetch;
use crate::core::stream::Stream;
use crate::core::version::VersionRecord;

/// Replace the artifact for `stream` with `artifact` and persist `version`.
///
/// The version record is loaded before any filesystem change and rewritten
/// field-wise after it, so the other stream's line survives even the bundle
/// swap that carries the record file away with the old root.
pub fn install(
    config: &Config,
    stream: Stream,
    artifact: &Path,
    version: &str,
) -> Result<(), UpdateError> {
    let mut record = VersionRecord::load(&config.version_file);
    match stream {
        Stream::App => install_bundle(config, artifact)?,
        Stream::Catalog => install_catalog(config, artifact)?,
    }
    record.set(stream, version);
    record
        .save(&config.version_file)
        .map_err(UpdateError::install)
}

/// Extract the bundle beside the install root, then swap the root.
fn install_bundle(config: &Config, archive: &Path) -> Result<(), UpdateError> {
    let root = &config.install_dir;
    let Some(name) = root.file_name() else {
        return Err(UpdateError::Install(format!(
            "install root {} has no directory name to swap",
            root.display()
        )));
    };

    let staged = tempfile::Builder::new()
        .prefix(".ota-extract-")
        .tempdir_in(fetch::staging_anchor(root))
        .map_err(UpdateError::install)?;
    extract_archive(archive, staged.path())?;
    let new_root = bundle_root(staged.path())?;

    let previous = root.with_file_name(format!("{}.old", name.to_string_lossy()));
    let had_previous = root.exists();
    if had_previous {
        if previous.exists() {
            // Leftover from an interrupted earlier swap.
            fs::remove_dir_all(&previous).map_err(UpdateError::install)?;
        }
        fs::rename(root, &previous).map_err(UpdateError::install)?;
    }
    if let Err(e) = fs::rename(&new_root, root) {
        if had_previous {
            let _ = fs::rename(&previous, root);
        }
        return Err(UpdateError::install(e));
    }
    if had_previous {
        // Best-effort: a stale .old directory is cleaned up on the next swap.
        let _ = fs::remove_dir_all(&previous);
    }
    Ok(())
}

/// Rename the staged catalog file over the previous one. Atomic on the same
/// filesystem; the old catalog is never deleted ahead of time.
fn install_catalog(config: &Config, artifact: &Path) -> Result<(), UpdateError> {
    let target = &config.catalog_path;
    if let Some(parent) = target.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(UpdateError::install)?;
    }
    fs::rename(artifact, target).map_err(UpdateError::install)
}

fn extract_archive(archive: &Path, dest: &Path) -> Result<(), UpdateError> {
    let file = fs::File::open(archive).map_err(UpdateError::install)?;
    let mut zip = zip::ZipArchive::new(file).map_err(UpdateError::install)?;
    for index in 0..zip.len() {
        let mut entry = zip.by_index(index).map_err(UpdateError::install)?;
        let Some(relative) = entry.enclosed_name() else {
            return Err(UpdateError::Install(format!(
                "archive entry '{}' escapes the extraction root",
                entry.name()
            )));
        };
        let out = dest.join(relative);
        if entry.is_dir() {
            fs::create_dir_all(&out).map_err(UpdateError::install)?;
            continue;
        }
        if let Some(parent) = out.parent() {
            fs::create_dir_all(parent).map_err(UpdateError::install)?;
        }
        let mut outfile = fs::File::create(&out).map_err(UpdateError::install)?;
        io::copy(&mut entry, &mut outfile).map_err(UpdateError::install)?;
        #[cfg(unix)]
        if let Some(mode) = entry.unix_mode() {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&out, fs::Permissions::from_mode(mode))
                .map_err(UpdateError::install)?;
        }
    }
    Ok(())
}

/// Flatten one level of nesting: if the archive wrapped everything in a
/// single directory, that directory is the new root.
fn bundle_root(staged: &Path) -> Result<PathBuf, UpdateError> {
    let entries: Vec<_> = fs::read_dir(staged)
        .map_err(UpdateError::install)?
        .collect::<Result<_, _>>()
        .map_err(UpdateError::install)?;
    if entries.len() == 1 {
        let only = &entries[0];
        if only.file_type().map_err(UpdateError::install)?.is_dir() {
            return Ok(only.path());
        }
    }
    Ok(staged.to_path_buf())
}
