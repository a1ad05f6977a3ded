//! Configuration file handling.
//!
//! Settings live in an INI file, by default `<config_dir>/gaesdk/config.ini`.
//! A missing file is not an error; every key has a built-in default.
//!
//! ```ini
//! [sdk]
//! version_url = https://storage.googleapis.com/appengine-sdks/featured/VERSION
//! archive_base_url = https://storage.googleapis.com/appengine-sdks/featured
//! listing_url = https://storage.googleapis.com/appengine-sdks/?prefix=featured/
//! platform = linux_amd64
//!
//! [install]
//! directory = /opt/google
//!
//! [download]
//! strategy = native
//! staging_dir = /tmp/gaesdk
//! keep_archive = false
//! timeout_secs = 0
//!
//! [logging]
//! file = /var/log/gaesdk.log
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use ini::{Ini, Properties};
use thiserror::Error;

use crate::manager::naming::DEFAULT_PLATFORM;
use crate::manager::{
    DownloadStrategy, ManagerConfig, DEFAULT_ARCHIVE_BASE_URL, DEFAULT_LISTING_URL,
    DEFAULT_VERSION_URL,
};

/// Errors raised while loading the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: ini::Error,
    },

    #[error("invalid value for {section}.{key}: {value:?} ({reason})")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },
}

/// `[sdk]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SdkSection {
    pub version_url: String,
    pub archive_base_url: String,
    pub listing_url: String,
    pub platform: String,
}

impl Default for SdkSection {
    fn default() -> Self {
        Self {
            version_url: DEFAULT_VERSION_URL.to_string(),
            archive_base_url: DEFAULT_ARCHIVE_BASE_URL.to_string(),
            listing_url: DEFAULT_LISTING_URL.to_string(),
            platform: DEFAULT_PLATFORM.to_string(),
        }
    }
}

/// `[install]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallSection {
    /// Install directory; the CLI falls back to the working directory.
    pub directory: Option<PathBuf>,
}

/// `[download]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadSection {
    pub strategy: DownloadStrategy,
    pub staging_dir: Option<PathBuf>,
    pub keep_archive: bool,
    /// `None` (or `0` in the file) disables the timeout.
    pub timeout: Option<Duration>,
}

/// `[logging]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoggingSection {
    /// Also append logs to this file.
    pub file: Option<PathBuf>,
}

/// Parsed configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFile {
    pub sdk: SdkSection,
    pub install: InstallSection,
    pub download: DownloadSection,
    pub logging: LoggingSection,
}

/// Default location of the configuration file.
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("gaesdk")
        .join("config.ini")
}

impl ConfigFile {
    /// Load the file at the default location.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&config_file_path())
    }

    /// Load the file at `path`, or defaults if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_ini(&ini)
    }

    /// Parse configuration from INI text.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_str(text).map_err(|e| ConfigError::Read {
            path: PathBuf::from("<string>"),
            source: ini::Error::Parse(e),
        })?;
        Self::from_ini(&ini)
    }

    fn from_ini(ini: &Ini) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(section) = ini.section(Some("sdk")) {
            let sdk = &mut config.sdk;
            set_string(section, "version_url", &mut sdk.version_url);
            set_string(section, "archive_base_url", &mut sdk.archive_base_url);
            set_string(section, "listing_url", &mut sdk.listing_url);
            set_string(section, "platform", &mut sdk.platform);
        }

        if let Some(section) = ini.section(Some("install")) {
            config.install.directory = get_path(section, "directory");
        }

        if let Some(section) = ini.section(Some("download")) {
            let download = &mut config.download;
            if let Some(value) = get_value(section, "strategy") {
                download.strategy = DownloadStrategy::from_name(value).ok_or_else(|| {
                    invalid("download", "strategy", value, "expected native, curl or wget")
                })?;
            }
            download.staging_dir = get_path(section, "staging_dir");
            if let Some(value) = get_value(section, "keep_archive") {
                download.keep_archive = parse_bool(value).ok_or_else(|| {
                    invalid("download", "keep_archive", value, "expected a boolean")
                })?;
            }
            if let Some(value) = get_value(section, "timeout_secs") {
                let secs: u64 = value.parse().map_err(|_| {
                    invalid("download", "timeout_secs", value, "expected whole seconds")
                })?;
                download.timeout = (secs > 0).then_some(Duration::from_secs(secs));
            }
        }

        if let Some(section) = ini.section(Some("logging")) {
            config.logging.file = get_path(section, "file");
        }

        Ok(config)
    }

    /// Build the manager configuration for `install_dir`.
    pub fn to_manager_config(&self, install_dir: PathBuf) -> ManagerConfig {
        let mut config = ManagerConfig::new(install_dir)
            .with_version_url(self.sdk.version_url.clone())
            .with_archive_base_url(self.sdk.archive_base_url.clone())
            .with_listing_url(self.sdk.listing_url.clone())
            .with_platform(self.sdk.platform.clone())
            .with_strategy(self.download.strategy)
            .with_keep_archive(self.download.keep_archive)
            .with_timeout(self.download.timeout);

        if let Some(staging) = &self.download.staging_dir {
            config = config.with_staging_dir(staging.clone());
        }
        config
    }
}

fn get_value<'a>(section: &'a Properties, key: &str) -> Option<&'a str> {
    section.get(key).map(str::trim).filter(|v| !v.is_empty())
}

fn get_path(section: &Properties, key: &str) -> Option<PathBuf> {
    get_value(section, key).map(PathBuf::from)
}

fn set_string(section: &Properties, key: &str, target: &mut String) {
    if let Some(value) = get_value(section, key) {
        *target = value.to_string();
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
