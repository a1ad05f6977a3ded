//! Centralized SDK naming conventions.
//!
//! This module is the single source of truth for every name the manager
//! builds:
//! - The installation folder (`go_appengine`)
//! - The version marker file (`go_appengine/VERSION`)
//! - Archive filenames (e.g., `go_appengine_sdk_linux_amd64-1.9.98.zip`)
//! - Backup folder names (e.g., `go_appengine-1.9.90`)

use std::path::{Path, PathBuf};

use super::version::SdkVersion;

/// Name of the installation folder inside the install directory.
pub const SDK_DIR_NAME: &str = "go_appengine";

/// Name of the version marker file inside [`SDK_DIR_NAME`].
pub const VERSION_FILE_NAME: &str = "VERSION";

/// Storage path segment that holds released archives.
pub const FEATURED_MARKER: &str = "featured/";

/// Default target platform of the archive.
pub const DEFAULT_PLATFORM: &str = "linux_amd64";

/// Archive filename prefix for a platform, up to and including the dash.
///
/// # Examples
///
/// ```
/// use gaesdk::manager::naming::archive_prefix;
///
/// assert_eq!(archive_prefix("linux_amd64"), "go_appengine_sdk_linux_amd64-");
/// ```
pub fn archive_prefix(platform: &str) -> String {
    format!("go_appengine_sdk_{}-", platform)
}

/// Archive filename for a platform and version.
///
/// # Examples
///
/// ```
/// use gaesdk::manager::SdkVersion;
/// use gaesdk::manager::naming::archive_filename;
///
/// assert_eq!(
///     archive_filename("linux_amd64", &SdkVersion::new("1.9.98")),
///     "go_appengine_sdk_linux_amd64-1.9.98.zip"
/// );
/// ```
pub fn archive_filename(platform: &str, version: &SdkVersion) -> String {
    format!("{}{}.zip", archive_prefix(platform), version)
}

/// Download URL of an archive under `base_url`.
pub fn archive_url(base_url: &str, platform: &str, version: &SdkVersion) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        archive_filename(platform, version)
    )
}

/// Path of the installation folder.
pub fn sdk_dir(install_dir: &Path) -> PathBuf {
    install_dir.join(SDK_DIR_NAME)
}

/// Path of the version marker file.
pub fn version_file(install_dir: &Path) -> PathBuf {
    sdk_dir(install_dir).join(VERSION_FILE_NAME)
}

/// Path the installation folder is renamed to when backing up `version`.
pub fn backup_dir(install_dir: &Path, version: &SdkVersion) -> PathBuf {
    install_dir.join(format!("{}-{}", SDK_DIR_NAME, version))
}
