//! SDK manager: checks, downloads and installs the App Engine Go SDK.
//!
//! # Architecture
//!
//! ```text
//! SdkUpdater (updater)
//!     │
//!     ├── ReleaseSource ──────── HttpReleaseSource (fetcher, listing)
//!     ├── LocalSdkStore (store)
//!     ├── backup_installation (backup)
//!     ├── ArchiveDownloader ──── HttpDownloader | CommandDownloader (download)
//!     └── ArchiveExtractor ───── ZipExtractor | ShellExtractor (extractor)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use gaesdk::manager::{ManagerConfig, UpdateRequest, build_updater};
//!
//! let config = ManagerConfig::new("/opt/google".into());
//! let updater = build_updater(config)?;
//! let outcome = updater.run(&UpdateRequest::default())?;
//! ```

mod backup;
mod config;
pub mod download;
mod error;
mod extractor;
mod fetcher;
mod listing;
pub mod naming;
mod store;
mod traits;
mod updater;
mod version;

pub use backup::backup_installation;
pub use config::{
    DownloadStrategy, ManagerConfig, UpdateRequest, DEFAULT_ARCHIVE_BASE_URL,
    DEFAULT_LISTING_URL, DEFAULT_VERSION_URL,
};
pub use download::{CommandDownloader, DownloadTool, HttpDownloader};
pub use error::{ManagerError, ManagerResult};
pub use extractor::{ShellExtractor, ZipExtractor};
pub use fetcher::HttpReleaseSource;
pub use listing::{RemoteArchive, RemoteListing};
pub use store::LocalSdkStore;
pub use traits::{ArchiveDownloader, ArchiveExtractor, ProgressCallback, ReleaseSource};
pub use updater::{decide, InstallReport, SdkUpdater, UpdateOutcome, UpdatePlan};
pub use version::{parse_release, SdkVersion, VersionRequest};

/// Updater wired with the collaborators selected by `config.strategy`.
pub type DefaultUpdater =
    SdkUpdater<HttpReleaseSource, Box<dyn ArchiveDownloader>, Box<dyn ArchiveExtractor>>;

/// Build an updater for `config`, choosing in-process or external tools.
pub fn build_updater(config: ManagerConfig) -> ManagerResult<DefaultUpdater> {
    let source = HttpReleaseSource::from_config(&config)?;

    let (downloader, extractor): (Box<dyn ArchiveDownloader>, Box<dyn ArchiveExtractor>) =
        match config.strategy {
            DownloadStrategy::Native => (
                Box::new(HttpDownloader::with_timeout(config.timeout)?),
                Box::new(ZipExtractor::new()),
            ),
            DownloadStrategy::Curl => (
                Box::new(CommandDownloader::new(DownloadTool::Curl)),
                Box::new(ShellExtractor::new()),
            ),
            DownloadStrategy::Wget => (
                Box::new(CommandDownloader::new(DownloadTool::Wget)),
                Box::new(ShellExtractor::new()),
            ),
        };

    Ok(SdkUpdater::new(config, source, downloader, extractor))
}
