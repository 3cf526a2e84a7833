//! Best-effort search-engine notification
//!
//! After a successful save the index URL is submitted to each configured ping
//! endpoint with a plain HTTP GET. Failures are advisory: they are reported,
//! but the files already written stay valid.

use std::time::Duration;

use url::Url;

use crate::error::{Error, Result};

/// Default ping endpoints notified by
/// [`SitemapIndex::ping_search_engines`](crate::SitemapIndex::ping_search_engines)
pub const SEARCH_ENGINE_PING_URLS: &[&str] = &[
    "https://www.google.com/ping",
    "https://www.bing.com/ping",
];

/// Timeout applied to each ping request
const PING_TIMEOUT: Duration = Duration::from_secs(10);

/// Build the full ping URL for an endpoint, with the sitemap-index URL as a
/// percent-encoded `sitemap` query parameter
pub(crate) fn build_ping_url(endpoint: &str, index_url: &str) -> Result<Url> {
    let mut url = Url::parse(endpoint)?;
    url.query_pairs_mut().append_pair("sitemap", index_url);
    Ok(url)
}

/// Notify every endpoint, collecting failures into one advisory error
pub(crate) fn ping_all(endpoints: &[String], index_url: &str) -> Result<()> {
    let client = reqwest::blocking::Client::builder()
        .timeout(PING_TIMEOUT)
        .build()
        .map_err(|err| Error::Notification(err.to_string()))?;

    let mut failures = Vec::new();
    for endpoint in endpoints {
        match ping_one(&client, endpoint, index_url) {
            Ok(()) => tracing::info!(endpoint = %endpoint, "search engine notified"),
            Err(err) => {
                tracing::warn!(endpoint = %endpoint, error = %err, "search engine ping failed");
                failures.push(format!("{endpoint}: {err}"));
            }
        }
    }

    if failures.is_empty() {
        Ok(())
    } else {
        Err(Error::Notification(failures.join("; ")))
    }
}

fn ping_one(client: &reqwest::blocking::Client, endpoint: &str, index_url: &str) -> Result<()> {
    let url = build_ping_url(endpoint, index_url)?;
    let response = client
        .get(url)
        .send()
        .map_err(|err| Error::Notification(err.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(Error::Notification(format!("unexpected status {status}")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_ping_url_encodes_parameter() {
        let url = build_ping_url(
            "https://www.google.com/ping",
            "https://www.example.com/sitemap_index.xml",
        )
        .unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.google.com/ping?sitemap=https%3A%2F%2Fwww.example.com%2Fsitemap_index.xml"
        );
    }

    #[test]
    fn test_build_ping_url_rejects_invalid_endpoint() {
        assert!(build_ping_url("not a url", "https://www.example.com/s.xml").is_err());
    }

    #[test]
    fn test_default_endpoints_parse() {
        for endpoint in SEARCH_ENGINE_PING_URLS {
            assert!(Url::parse(endpoint).is_ok());
        }
    }
}
