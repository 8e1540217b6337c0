//! Updater error taxonomy.
//!
//! Three stages can fail, and callers treat them differently: resolution and
//! fetch failures leave everything on disk untouched and may be tolerated by
//! policy, while an install failure means the replace itself went wrong.

/// Errors from the update pipeline.
#[derive(Debug, thiserror::Error)]
pub enum UpdateError {
    /// The remote tag listing was unreachable, returned no matching tag for
    /// the stream, or contained a tag that does not parse as a version.
    #[error("version resolution failed: {0}")]
    Resolution(String),

    /// The artifact download failed after a version was resolved. The
    /// existing artifact and the version record are untouched.
    #[error("download failed: {0}")]
    Fetch(String),

    /// A filesystem operation (extract, rename, remove) failed while
    /// replacing the artifact.
    #[error("install failed: {0}")]
    Install(String),
}

impl UpdateError {
    pub fn resolution(err: impl std::fmt::Display) -> Self {
        UpdateError::Resolution(err.to_string())
    }

    pub fn fetch(err: impl std::fmt::Display) -> Self {
        UpdateError::Fetch(err.to_string())
    }

    pub fn install(err: impl std::fmt::Display) -> Self {
        UpdateError::Install(err.to_string())
    }
}
