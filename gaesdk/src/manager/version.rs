//! SDK version tokens and the `release:` payload parser.
//!
//! Both the remote `VERSION` endpoint and the `VERSION` file inside an
//! installed SDK use the same format:
//!
//! ```text
//! release: "1.9.98"
//! timestamp: 1636596238
//! api_versions: ['go1']
//! ```

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use super::error::{ManagerError, ManagerResult};

/// Key of the line carrying the version.
const RELEASE_KEY: &str = "release";

/// A version identifier, compared by exact string equality.
///
/// An empty version means nothing is installed.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SdkVersion(String);

impl SdkVersion {
    /// Wrap a version exactly as given.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Build a version by dropping everything but digits and dots.
    ///
    /// # Examples
    ///
    /// ```
    /// use gaesdk::manager::SdkVersion;
    ///
    /// assert_eq!(SdkVersion::normalized(" \"1.9.98\"\r").as_str(), "1.9.98");
    /// ```
    pub fn normalized(raw: &str) -> Self {
        Self(non_version_chars().replace_all(raw, "").into_owned())
    }

    /// The empty version.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SdkVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What the operator asked to install.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum VersionRequest {
    /// Resolve the newest version from the remote endpoint.
    #[default]
    Latest,
    /// Install this version, taken verbatim.
    Exact(SdkVersion),
}

impl VersionRequest {
    /// Interpret a raw `--version` value.
    ///
    /// A missing value, an empty string and `latest` all mean [`VersionRequest::Latest`].
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            None | Some("") | Some("latest") => Self::Latest,
            Some(v) => Self::Exact(SdkVersion::new(v)),
        }
    }
}

fn non_version_chars() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^0-9.]+").expect("static regex is valid"))
}

/// Extract the normalized version from a `release:` payload.
///
/// `origin` names where the payload came from and only appears in the error.
pub fn parse_release(body: &str, origin: &str) -> ManagerResult<SdkVersion> {
    body.lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(key, _)| *key == RELEASE_KEY)
        .map(|(_, value)| SdkVersion::normalized(value))
        .ok_or_else(|| ManagerError::ReleaseNotFound {
            origin: origin.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_release_plain() {
        let v = parse_release("release: 1.9.98\n", "test").unwrap();
        assert_eq!(v.as_str(), "1.9.98");
    }

    #[test]
    fn test_parse_release_sdk_file_format() {
        let body = "release: \"1.9.98\"\ntimestamp: 1636596238\napi_versions: ['go1']\n";
        let v = parse_release(body, "test").unwrap();
        assert_eq!(v, SdkVersion::new("1.9.98"));
    }

    #[test]
    fn test_parse_release_crlf() {
        let v = parse_release("timestamp: 1\r\nrelease: \"1.9.70\"\r\n", "test").unwrap();
        assert_eq!(v.as_str(), "1.9.70");
    }

    #[test]
    fn test_parse_release_missing() {
        let err = parse_release("timestamp: 1\napi_versions: ['go1']\n", "remote").unwrap_err();
        assert!(matches!(err, ManagerError::ReleaseNotFound { origin } if origin == "remote"));
    }

    #[test]
    fn test_parse_release_key_must_match_exactly() {
        assert!(parse_release(" release: 1.0\nreleases: 2.0\n", "test").is_err());
    }

    #[test]
    fn test_parse_release_skips_lines_without_colon() {
        let v = parse_release("release\nrelease: 2.0.1", "test").unwrap();
        assert_eq!(v.as_str(), "2.0.1");
    }

    #[test]
    fn test_version_request_parse() {
        assert_eq!(VersionRequest::parse(None), VersionRequest::Latest);
        assert_eq!(VersionRequest::parse(Some("")), VersionRequest::Latest);
        assert_eq!(VersionRequest::parse(Some("latest")), VersionRequest::Latest);
        assert_eq!(
            VersionRequest::parse(Some("1.9.50")),
            VersionRequest::Exact(SdkVersion::new("1.9.50"))
        );
    }

    #[test]
    fn test_explicit_version_is_verbatim() {
        let VersionRequest::Exact(v) = VersionRequest::parse(Some("v1.9-beta")) else {
            panic!("expected exact request");
        };
        assert_eq!(v.as_str(), "v1.9-beta");
    }

    proptest! {
        #[test]
        fn normalized_only_keeps_digits_and_dots(raw in ".*") {
            let v = SdkVersion::normalized(&raw);
            prop_assert!(v.as_str().chars().all(|c| c.is_ascii_digit() || c == '.'));
        }

        #[test]
        fn normalized_is_idempotent(raw in ".*") {
            let once = SdkVersion::normalized(&raw);
            prop_assert_eq!(SdkVersion::normalized(once.as_str()), once);
        }
    }
}
