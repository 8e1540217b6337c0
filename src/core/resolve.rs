//! Version resolver: queries the remote tag listing and derives the latest
//! version for a stream.
//!
//! Tags ending in `-db` belong to the catalog stream, everything else to the
//! application stream. The newest candidate is the numeric semver maximum,
//! not the first listing entry, so a reordered listing cannot downgrade a
//! device; a candidate that does not parse as a version is an error rather
//! than being silently skipped.

use reqwest::blocking::Client;
use serde::Deserialize;

use crate::core::config::Config;
use crate::core::error::UpdateError;
use crate::core::stream::Stream;
use crate::core::version;

/// One entry of the remote tag listing. Only the name is read.
#[derive(Debug, Deserialize)]
pub struct RemoteTag {
    pub name: String,
}

pub fn tags_url(config: &Config) -> String {
    format!("{}/repos/{}/tags", config.api_base, config.repo)
}

/// Fetch the tag listing and resolve the latest version for `stream`.
pub fn latest_version(
    client: &Client,
    config: &Config,
    stream: Stream,
) -> Result<String, UpdateError> {
    let url = tags_url(config);
    log::debug!("fetching tag listing from {url}");
    let response = client.get(&url).send().map_err(UpdateError::resolution)?;
    let status = response.status();
    if !status.is_success() {
        return Err(UpdateError::Resolution(format!(
            "tag listing {url} returned {status}"
        )));
    }
    let body = response.text().map_err(UpdateError::resolution)?;
    let tags: Vec<RemoteTag> = serde_json::from_str(&body)
        .map_err(|e| UpdateError::Resolution(format!("malformed tag listing: {e}")))?;
    select_latest(&tags, stream)
}

/// Pick the newest tag for `stream` out of the listing.
///
/// The catalog marker is stripped before normalization so the returned
/// version string is comparable across streams.
pub fn select_latest(tags: &[RemoteTag], stream: Stream) -> Result<String, UpdateError> {
    let mut best: Option<(semver::Version, String)> = None;
    for tag in tags {
        if !stream.matches_tag(&tag.name) {
            continue;
        }
        let candidate = version::normalize(stream.strip_marker(&tag.name));
        let Some(parsed) = version::parse(&candidate) else {
            return Err(UpdateError::Resolution(format!(
                "malformed {} tag '{}'",
                stream.label(),
                tag.name
            )));
        };
        if best.as_ref().is_none_or(|(top, _)| parsed > *top) {
            best = Some((parsed, candidate));
        }
    }
    best.map(|(_, candidate)| candidate).ok_or_else(|| {
        UpdateError::Resolution(format!("no {} tags in the remote listing", stream.label()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(names: &[&str]) -> Vec<RemoteTag> {
        names
            .iter()
            .map(|name| RemoteTag {
                name: name.to_string(),
            })
            .collect()
    }

    #[test]
    fn application_stream_ignores_db_tags() {
        let listing = tags(&["v1.2.0", "v1.0.0-db"]);
        assert_eq!(select_latest(&listing, Stream::App).unwrap(), "v1.2.0");
    }

    #[test]
    fn catalog_stream_strips_the_marker() {
        let listing = tags(&["v2.0.0", "v1.0.0-db"]);
        assert_eq!(select_latest(&listing, Stream::Catalog).unwrap(), "v1.0.0");
    }

    #[test]
    fn selection_is_numeric_not_positional() {
        let listing = tags(&["v1.9.0", "v1.10.0"]);
        assert_eq!(select_latest(&listing, Stream::App).unwrap(), "v1.10.0");
        let listing = tags(&["v1.10.0", "v1.9.0"]);
        assert_eq!(select_latest(&listing, Stream::App).unwrap(), "v1.10.0");
    }

    #[test]
    fn missing_v_prefix_is_normalized() {
        let listing = tags(&["1.3.0"]);
        assert_eq!(select_latest(&listing, Stream::App).unwrap(), "v1.3.0");
    }

    #[test]
    fn malformed_tag_is_a_resolution_error() {
        let listing = tags(&["vNaN", "v1.0.0"]);
        let err = select_latest(&listing, Stream::App).unwrap_err();
        assert!(matches!(err, UpdateError::Resolution(_)), "got {err:?}");
    }

    #[test]
    fn empty_listing_is_a_resolution_error() {
        let err = select_latest(&[], Stream::Catalog).unwrap_err();
        assert!(matches!(err, UpdateError::Resolution(_)));
        // No catalog tags at all is distinct from "up to date".
        let listing = tags(&["v1.0.0", "v2.0.0"]);
        let err = select_latest(&listing, Stream::Catalog).unwrap_err();
        assert!(matches!(err, UpdateError::Resolution(_)));
    }
}
