//! Remote archive listing.
//!
//! The storage bucket answers a plain GET with an XML document enumerating
//! its object keys:
//!
//! ```text
//! <ListBucketResult>
//!   <Contents><Key>featured/go_appengine_sdk_linux_amd64-1.9.98.zip</Key>...</Contents>
//!   ...
//! </ListBucketResult>
//! ```
//!
//! Only keys under `featured/` that carry the archive prefix for the
//! configured platform become candidate versions.
//!
//! Listings are paged. A truncated page sets `<IsTruncated>true</IsTruncated>`
//! and the next page starts after `<NextMarker>` (or the last key returned).

use regex::Regex;
use serde::Deserialize;

use super::error::{ManagerError, ManagerResult};
use super::naming::{archive_prefix, FEATURED_MARKER};
use super::version::SdkVersion;

#[derive(Debug, Deserialize)]
struct ListBucketResult {
    #[serde(rename = "IsTruncated", default)]
    is_truncated: bool,
    #[serde(rename = "NextMarker", default)]
    next_marker: Option<String>,
    #[serde(rename = "Contents", default)]
    contents: Vec<ListEntry>,
}

/// One page of a bucket listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ListingPage {
    pub keys: Vec<String>,
    /// Marker for the following page, `None` on the last page.
    pub next_marker: Option<String>,
}

impl ListingPage {
    pub fn parse(body: &str, url: &str) -> ManagerResult<Self> {
        let result: ListBucketResult =
            quick_xml::de::from_str(body).map_err(|e| ManagerError::ListingParseFailed {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let keys: Vec<String> = result.contents.into_iter().map(|entry| entry.key).collect();
        let next_marker = if result.is_truncated {
            result
                .next_marker
                .filter(|m| !m.is_empty())
                .or_else(|| keys.last().cloned())
        } else {
            None
        };

        Ok(Self { keys, next_marker })
    }
}

#[derive(Debug, Deserialize)]
struct ListEntry {
    #[serde(rename = "Key")]
    key: String,
}

/// One archive found in the listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteArchive {
    /// Storage path of the archive.
    pub key: String,
    /// Version extracted from the key.
    pub version: SdkVersion,
}

/// Archives available remotely, sorted by key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteListing {
    archives: Vec<RemoteArchive>,
}

impl RemoteListing {
    /// Parse a single-page bucket listing body.
    ///
    /// `url` only appears in the error when the body is not a listing.
    pub fn parse(body: &str, platform: &str, url: &str) -> ManagerResult<Self> {
        let page = ListingPage::parse(body, url)?;
        Self::from_keys(page.keys, platform, url)
    }

    /// Build a listing from raw object keys, possibly gathered over several pages.
    pub fn from_keys(keys: Vec<String>, platform: &str, url: &str) -> ManagerResult<Self> {
        let prefix = archive_prefix(platform);
        let pattern = Regex::new(&format!(r"{}(.+)\.zip$", regex::escape(&prefix))).map_err(
            |e| ManagerError::ListingParseFailed {
                url: url.to_string(),
                reason: e.to_string(),
            },
        )?;

        let mut archives: Vec<RemoteArchive> = keys
            .into_iter()
            .filter(|key| key.contains(FEATURED_MARKER) && key.contains(&prefix))
            .filter_map(|key| {
                let version = pattern
                    .captures(&key)
                    .and_then(|caps| caps.get(1))
                    .map(|m| SdkVersion::normalized(m.as_str()))?;
                Some(RemoteArchive { key, version })
            })
            .collect();

        archives.sort_by(|a, b| a.key.cmp(&b.key));

        Ok(Self { archives })
    }

    /// Archives in listing order.
    pub fn archives(&self) -> &[RemoteArchive] {
        &self.archives
    }

    /// Versions in listing order.
    pub fn versions(&self) -> impl Iterator<Item = &SdkVersion> {
        self.archives.iter().map(|a| &a.version)
    }

    /// Whether `version` is available.
    pub fn contains(&self, version: &SdkVersion) -> bool {
        self.versions().any(|v| v == version)
    }

    pub fn is_empty(&self) -> bool {
        self.archives.is_empty()
    }

    pub fn len(&self) -> usize {
        self.archives.len()
    }
}
