//! Error types for the SDK manager.

use std::io;
use std::path::PathBuf;

/// Result type for manager operations.
pub type ManagerResult<T> = Result<T, ManagerError>;

/// Errors that can occur while checking, downloading or installing the SDK.
#[derive(Debug)]
pub enum ManagerError {
    /// Failed to read a file or directory.
    ReadFailed { path: PathBuf, source: io::Error },

    /// Failed to write a file.
    WriteFailed { path: PathBuf, source: io::Error },

    /// Failed to create a directory.
    CreateDirFailed { path: PathBuf, source: io::Error },

    /// Failed to rename the installation to its backup name.
    RenameFailed {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },

    /// The backup destination is already taken.
    BackupExists(PathBuf),

    /// Failed to fetch a version payload or listing.
    FetchFailed { url: String, reason: String },

    /// The payload does not contain a `release` line.
    ReleaseNotFound { origin: String },

    /// Failed to decode the remote archive listing.
    ListingParseFailed { url: String, reason: String },

    /// The requested version is not in the remote listing.
    VersionNotAvailable { version: String },

    /// Failed to download the SDK archive.
    DownloadFailed { url: String, reason: String },

    /// Archive could not be opened, read or expanded.
    ExtractionFailed { path: PathBuf, reason: String },

    /// The HTTP client could not be constructed.
    HttpClient(String),
}

impl std::fmt::Display for ManagerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ReadFailed { path, source } => {
                write!(f, "failed to read {}: {}", path.display(), source)
            }
            Self::WriteFailed { path, source } => {
                write!(f, "failed to write {}: {}", path.display(), source)
            }
            Self::CreateDirFailed { path, source } => {
                write!(
                    f,
                    "failed to create directory {}: {}",
                    path.display(),
                    source
                )
            }
            Self::RenameFailed { from, to, source } => {
                write!(
                    f,
                    "failed to rename {} to {}: {}",
                    from.display(),
                    to.display(),
                    source
                )
            }
            Self::BackupExists(path) => {
                write!(
                    f,
                    "backup destination {} already exists; move it away and retry",
                    path.display()
                )
            }
            Self::FetchFailed { url, reason } => {
                write!(f, "failed to fetch {}: {}", url, reason)
            }
            Self::ReleaseNotFound { origin } => {
                write!(f, "no release line found in {}", origin)
            }
            Self::ListingParseFailed { url, reason } => {
                write!(f, "failed to parse archive listing from {}: {}", url, reason)
            }
            Self::VersionNotAvailable { version } => {
                write!(f, "version {} is not available remotely", version)
            }
            Self::DownloadFailed { url, reason } => {
                write!(f, "failed to download {}: {}", url, reason)
            }
            Self::ExtractionFailed { path, reason } => {
                write!(f, "failed to extract {}: {}", path.display(), reason)
            }
            Self::HttpClient(msg) => write!(f, "HTTP client error: {}", msg),
        }
    }
}

impl std::error::Error for ManagerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ReadFailed { source, .. } => Some(source),
            Self::WriteFailed { source, .. } => Some(source),
            Self::CreateDirFailed { source, .. } => Some(source),
            Self::RenameFailed { source, .. } => Some(source),
            _ => None,
        }
    }
}
