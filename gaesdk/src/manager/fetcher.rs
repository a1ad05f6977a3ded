//! Remote version discovery over HTTP.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::Url;
use tracing::debug;

use super::download::build_client;
use super::error::{ManagerError, ManagerResult};
use super::listing::{ListingPage, RemoteListing};
use super::traits::ReleaseSource;
use super::version::{parse_release, SdkVersion};
use super::ManagerConfig;

/// Reads the newest version and the archive listing from HTTP endpoints.
#[derive(Debug)]
pub struct HttpReleaseSource {
    client: Client,
    version_url: String,
    listing_url: String,
    platform: String,
}

impl HttpReleaseSource {
    /// Create a source for explicit endpoints.
    pub fn new(
        version_url: impl Into<String>,
        listing_url: impl Into<String>,
        platform: impl Into<String>,
        timeout: Option<Duration>,
    ) -> ManagerResult<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            version_url: version_url.into(),
            listing_url: listing_url.into(),
            platform: platform.into(),
        })
    }

    /// Create a source for the endpoints in `config`.
    pub fn from_config(config: &ManagerConfig) -> ManagerResult<Self> {
        Self::new(
            config.version_url.clone(),
            config.listing_url.clone(),
            config.platform.clone(),
            config.timeout,
        )
    }

    /// Listing URL for the page starting after `marker`.
    fn page_url(&self, marker: Option<&str>) -> ManagerResult<String> {
        let Some(marker) = marker else {
            return Ok(self.listing_url.clone());
        };
        let mut url = Url::parse(&self.listing_url).map_err(|e| ManagerError::FetchFailed {
            url: self.listing_url.clone(),
            reason: e.to_string(),
        })?;
        url.query_pairs_mut().append_pair("marker", marker);
        Ok(url.into())
    }

    /// GET `url` and return the body as text.
    fn fetch_text(&self, url: &str) -> ManagerResult<String> {
        debug!(url, "fetching");
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| ManagerError::FetchFailed {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ManagerError::FetchFailed {
                url: url.to_string(),
                reason: format!("GET request failed with status {}", status),
            });
        }

        response.text().map_err(|e| ManagerError::FetchFailed {
            url: url.to_string(),
            reason: format!("Read error: {}", e),
        })
    }
}

impl ReleaseSource for HttpReleaseSource {
    fn latest_version(&self) -> ManagerResult<SdkVersion> {
        let body = self.fetch_text(&self.version_url)?;
        parse_release(&body, &self.version_url)
    }

    fn remote_listing(&self) -> ManagerResult<RemoteListing> {
        let mut keys = Vec::new();
        let mut marker: Option<String> = None;

        loop {
            let url = self.page_url(marker.as_deref())?;
            let body = self.fetch_text(&url)?;
            let page = ListingPage::parse(&body, &url)?;
            keys.extend(page.keys);

            match page.next_marker {
                Some(next) if marker.as_deref() != Some(next.as_str()) => {
                    debug!(marker = %next, "listing is truncated, fetching next page");
                    marker = Some(next);
                }
                _ => break,
            }
        }

        let listing = RemoteListing::from_keys(keys, &self.platform, &self.listing_url)?;
        debug!(archives = listing.len(), "parsed remote listing");
        Ok(listing)
    }
}
