//! The two update streams: the application bundle and the content catalog.

use clap::ValueEnum;

/// Marker suffix that partitions remote tags into the two streams.
pub const DB_MARKER: &str = "-db";

/// An independently versioned update target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Stream {
    /// The executable bundle, shipped as a zip archive.
    App,
    /// The content catalog, shipped as a single database file.
    Catalog,
}

impl Stream {
    /// Human-readable name for logs and user-facing messages.
    pub fn label(self) -> &'static str {
        match self {
            Stream::App => "application",
            Stream::Catalog => "catalog",
        }
    }

    /// Line index of this stream in the version record.
    pub fn line_index(self) -> usize {
        match self {
            Stream::App => 0,
            Stream::Catalog => 1,
        }
    }

    /// Whether a remote tag belongs to this stream.
    pub fn matches_tag(self, tag: &str) -> bool {
        match self {
            Stream::App => !tag.ends_with(DB_MARKER),
            Stream::Catalog => tag.ends_with(DB_MARKER),
        }
    }

    /// Strip the stream marker from a tag so versions compare across streams.
    pub fn strip_marker(self, tag: &str) -> &str {
        match self {
            Stream::App => tag,
            Stream::Catalog => tag.strip_suffix(DB_MARKER).unwrap_or(tag),
        }
    }

    /// Release tag publishing the artifact for `version` on this stream.
    pub fn release_tag(self, version: &str) -> String {
        match self {
            Stream::App => version.to_string(),
            Stream::Catalog => format!("{version}{DB_MARKER}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_partition_by_db_suffix() {
        assert!(Stream::App.matches_tag("v1.2.0"));
        assert!(!Stream::App.matches_tag("v1.2.0-db"));
        assert!(Stream::Catalog.matches_tag("v1.2.0-db"));
        assert!(!Stream::Catalog.matches_tag("v1.2.0"));
    }

    #[test]
    fn catalog_marker_is_stripped() {
        assert_eq!(Stream::Catalog.strip_marker("v1.0.0-db"), "v1.0.0");
        assert_eq!(Stream::App.strip_marker("v1.0.0"), "v1.0.0");
    }

    #[test]
    fn release_tag_reattaches_marker_for_catalog() {
        assert_eq!(Stream::App.release_tag("v1.2.0"), "v1.2.0");
        assert_eq!(Stream::Catalog.release_tag("v1.2.0"), "v1.2.0-db");
    }
}
