//! Version normalization, comparison, and the persisted version record.
//!
//! The record is a two-line text file: line 1 holds the installed application
//! version, line 2 the installed catalog version. A missing file, missing
//! line, or unparsable line reads as [`NEVER_UPDATED`], which forces a safe
//! re-fetch instead of blocking the update.

use std::fs;
use std::io;
use std::path::Path;

use crate::core::stream::Stream;

/// Version reported for a stream that has never been installed.
pub const NEVER_UPDATED: &str = "v0.0.0";

/// Prepend the leading `v` if missing. Idempotent.
pub fn normalize(version: &str) -> String {
    let v = version.trim();
    if v.starts_with('v') {
        v.to_string()
    } else {
        format!("v{v}")
    }
}

/// Whether `local` and `latest` name different versions after normalization.
///
/// Deliberately string inequality, not semantic ordering: the remote listing
/// is the source of truth, so any difference means the local copy must be
/// brought in line with it.
pub fn needs_update(local: &str, latest: &str) -> bool {
    normalize(local) != normalize(latest)
}

/// Parse a version string (with or without the `v` prefix) for numeric
/// ordering. `None` if it is not a valid semantic version.
pub fn parse(version: &str) -> Option<semver::Version> {
    semver::Version::parse(normalize(version).trim_start_matches('v')).ok()
}

/// The on-disk record of the last successfully installed version per stream.
///
/// Updated field-wise: one line is replaced and the others are written back
/// unchanged, so installing one stream never erases the other's version.
#[derive(Debug, Clone, Default)]
pub struct VersionRecord {
    lines: Vec<String>,
}

impl VersionRecord {
    /// Read the record from `path`. Never fails; an absent or unreadable
    /// file yields an empty record.
    pub fn load(path: &Path) -> Self {
        let lines = match fs::read_to_string(path) {
            Ok(content) => content.lines().map(str::to_string).collect(),
            Err(_) => Vec::new(),
        };
        VersionRecord { lines }
    }

    /// Installed version for `stream`, or [`NEVER_UPDATED`] if the line is
    /// absent, blank, or not a valid version.
    pub fn get(&self, stream: Stream) -> String {
        match self.lines.get(stream.line_index()) {
            Some(line) if parse(line).is_some() => normalize(line),
            _ => NEVER_UPDATED.to_string(),
        }
    }

    /// Set `stream`'s line, padding with empty lines so line addressing
    /// stays stable when the other stream has never been installed.
    pub fn set(&mut self, stream: Stream, version: &str) {
        let idx = stream.line_index();
        while self.lines.len() <= idx {
            self.lines.push(String::new());
        }
        self.lines[idx] = normalize(version);
    }

    /// Write the record to `path`, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let mut content = self.lines.join("\n");
        content.push('\n');
        fs::write(path, content)
    }
}
