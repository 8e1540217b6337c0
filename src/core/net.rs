//! Shared blocking HTTP client and the connectivity preflight.

use reqwest::blocking::Client;

use crate::core::app;
use crate::core::config::Config;
use crate::core::error::UpdateError;
use crate::core::resolve;

/// Build the blocking client used for every request in the pipeline.
///
/// Redirects are followed (release asset downloads bounce through a CDN) and
/// timeouts are explicit: the default per-request timeout covers metadata
/// calls, downloads override it per request.
pub fn client(config: &Config) -> Result<Client, UpdateError> {
    let mut builder = Client::builder()
        .user_agent(format!("{}/{}", app::NAME, app::VERSION))
        .connect_timeout(config.request_timeout)
        .timeout(config.request_timeout)
        .redirect(reqwest::redirect::Policy::limited(10));
    if config.insecure_tls {
        log::warn!("TLS certificate verification is disabled");
        builder = builder.danger_accept_invalid_certs(true);
    }
    builder
        .build()
        .map_err(|e| UpdateError::Fetch(format!("could not build HTTP client: {e}")))
}

/// Cheap reachability check against the tag-listing endpoint before either
/// stream runs. Any HTTP response counts as reachable; only a transport
/// failure means offline.
pub fn preflight(client: &Client, config: &Config) -> bool {
    let url = resolve::tags_url(config);
    match client.head(&url).send() {
        Ok(_) => true,
        Err(e) => {
            log::error!("connectivity preflight failed for {url}: {e}");
            false
        }
    }
}
