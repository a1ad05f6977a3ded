//! Configuration for the SDK manager.

use std::path::PathBuf;
use std::time::Duration;

use super::naming::DEFAULT_PLATFORM;
use super::version::VersionRequest;

/// Default endpoint publishing the newest release.
pub const DEFAULT_VERSION_URL: &str =
    "https://storage.googleapis.com/appengine-sdks/featured/VERSION";

/// Default location archives are downloaded from.
pub const DEFAULT_ARCHIVE_BASE_URL: &str = "https://storage.googleapis.com/appengine-sdks/featured";

/// Default bucket listing endpoint, narrowed to the featured archives.
pub const DEFAULT_LISTING_URL: &str =
    "https://storage.googleapis.com/appengine-sdks/?prefix=featured/";

/// How the archive is fetched and expanded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DownloadStrategy {
    /// HTTP download and zip expansion inside the process.
    #[default]
    Native,
    /// Download with `curl`, expand with `unzip`.
    Curl,
    /// Download with `wget`, expand with `unzip`.
    Wget,
}

impl DownloadStrategy {
    /// Parse a strategy name as used in the config file and on the command line.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "native" => Some(Self::Native),
            "curl" => Some(Self::Curl),
            "wget" => Some(Self::Wget),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Native => "native",
            Self::Curl => "curl",
            Self::Wget => "wget",
        }
    }
}

/// Configuration for the SDK manager.
#[derive(Debug, Clone)]
pub struct ManagerConfig {
    /// Directory that contains (or will contain) `go_appengine`.
    pub install_dir: PathBuf,

    /// Directory the archive is downloaded to before extraction.
    pub staging_dir: PathBuf,

    /// URL of the `release:` payload naming the newest version.
    pub version_url: String,

    /// Base URL archives are downloaded from.
    pub archive_base_url: String,

    /// URL of the bucket listing.
    pub listing_url: String,

    /// Archive platform, e.g. `linux_amd64`.
    pub platform: String,

    /// HTTP request timeout. `None` waits indefinitely.
    pub timeout: Option<Duration>,

    /// How the archive is fetched and expanded.
    pub strategy: DownloadStrategy,

    /// Whether to keep the downloaded archive after installation.
    pub keep_archive: bool,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            install_dir: PathBuf::from("."),
            staging_dir: std::env::temp_dir().join("gaesdk"),
            version_url: DEFAULT_VERSION_URL.to_string(),
            archive_base_url: DEFAULT_ARCHIVE_BASE_URL.to_string(),
            listing_url: DEFAULT_LISTING_URL.to_string(),
            platform: DEFAULT_PLATFORM.to_string(),
            timeout: None,
            strategy: DownloadStrategy::default(),
            keep_archive: false,
        }
    }
}

impl ManagerConfig {
    /// Create a new configuration with the given install directory.
    pub fn new(install_dir: PathBuf) -> Self {
        Self {
            install_dir,
            ..Default::default()
        }
    }

    /// Set the staging directory.
    pub fn with_staging_dir(mut self, path: PathBuf) -> Self {
        self.staging_dir = path;
        self
    }

    /// Set the version endpoint.
    pub fn with_version_url(mut self, url: impl Into<String>) -> Self {
        self.version_url = url.into();
        self
    }

    /// Set the archive base URL.
    pub fn with_archive_base_url(mut self, url: impl Into<String>) -> Self {
        self.archive_base_url = url.into();
        self
    }

    /// Set the listing endpoint.
    pub fn with_listing_url(mut self, url: impl Into<String>) -> Self {
        self.listing_url = url.into();
        self
    }

    /// Set the archive platform.
    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = platform.into();
        self
    }

    /// Set the HTTP timeout.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the download strategy.
    pub fn with_strategy(mut self, strategy: DownloadStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Enable or disable keeping the downloaded archive.
    pub fn with_keep_archive(mut self, keep: bool) -> Self {
        self.keep_archive = keep;
        self
    }
}

/// One update run, as requested by the operator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateRequest {
    /// Version to install.
    pub version: VersionRequest,

    /// Reinstall even when the installed version already matches.
    pub force: bool,

    /// Check an explicitly requested version against the remote listing
    /// before touching the installation.
    pub validate_requested: bool,
}

impl UpdateRequest {
    pub fn new(version: VersionRequest) -> Self {
        Self {
            version,
            ..Default::default()
        }
    }

    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn with_validation(mut self, validate: bool) -> Self {
        self.validate_requested = validate;
        self
    }
}
