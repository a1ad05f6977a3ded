//! Seams between the update workflow and its collaborators.
//!
//! The [`SdkUpdater`](super::SdkUpdater) only talks to these traits, so the
//! network and archive handling can be swapped (in-process or external
//! tools) or replaced by fakes in tests.

use std::path::Path;

use super::error::ManagerResult;
use super::listing::RemoteListing;
use super::version::SdkVersion;

/// Download progress callback: `(bytes_downloaded, total_bytes)`.
///
/// `total_bytes` is 0 when the server does not announce a length.
pub type ProgressCallback = Box<dyn Fn(u64, u64) + Send + Sync>;

/// Source of remote version information.
pub trait ReleaseSource {
    /// Resolve the newest published version.
    fn latest_version(&self) -> ManagerResult<SdkVersion>;

    /// Enumerate the archives published remotely.
    fn remote_listing(&self) -> ManagerResult<RemoteListing>;
}

/// Fetches an archive to a local file.
pub trait ArchiveDownloader {
    /// Download `url` into `dest`, returning the number of bytes written.
    fn download(
        &self,
        url: &str,
        dest: &Path,
        progress: Option<&ProgressCallback>,
    ) -> ManagerResult<u64>;
}

/// Expands an archive onto disk.
pub trait ArchiveExtractor {
    /// Extract every entry of `archive` under `dest_dir`, returning the number
    /// of files written.
    fn extract(&self, archive: &Path, dest_dir: &Path) -> ManagerResult<usize>;
}

impl<T: ReleaseSource + ?Sized> ReleaseSource for Box<T> {
    fn latest_version(&self) -> ManagerResult<SdkVersion> {
        (**self).latest_version()
    }

    fn remote_listing(&self) -> ManagerResult<RemoteListing> {
        (**self).remote_listing()
    }
}

impl<T: ArchiveDownloader + ?Sized> ArchiveDownloader for Box<T> {
    fn download(
        &self,
        url: &str,
        dest: &Path,
        progress: Option<&ProgressCallback>,
    ) -> ManagerResult<u64> {
        (**self).download(url, dest, progress)
    }
}

impl<T: ArchiveExtractor + ?Sized> ArchiveExtractor for Box<T> {
    fn extract(&self, archive: &Path, dest_dir: &Path) -> ManagerResult<usize> {
        (**self).extract(archive, dest_dir)
    }
}
