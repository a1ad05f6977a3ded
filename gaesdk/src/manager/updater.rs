//! Update workflow.
//!
//! Orchestrates one run:
//! 1. Resolve the target version (remote lookup or explicit request)
//! 2. Read the installed version
//! 3. Decide between skipping, installing, or backing up then installing
//! 4. Download the archive to the staging directory
//! 5. Expand it into the install directory
//! 6. Remove the staged archive

use std::fs;
use std::path::PathBuf;

use tracing::{info, warn};

use super::backup::backup_installation;
use super::config::{ManagerConfig, UpdateRequest};
use super::error::{ManagerError, ManagerResult};
use super::listing::RemoteListing;
use super::naming;
use super::store::LocalSdkStore;
use super::traits::{ArchiveDownloader, ArchiveExtractor, ProgressCallback, ReleaseSource};
use super::version::{SdkVersion, VersionRequest};

/// What a run will do once both versions are known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdatePlan {
    /// The requested version is already installed.
    UpToDate,
    /// Nothing is installed; install directly.
    Install,
    /// Move the current installation aside, then install.
    BackupAndInstall,
}

/// Decide what to do given the installed and target versions.
///
/// A forced run over an identical version still backs up first, the same
/// way an upgrade does.
pub fn decide(local: &SdkVersion, target: &SdkVersion, force: bool) -> UpdatePlan {
    if local.is_empty() {
        UpdatePlan::Install
    } else if local == target && !force {
        UpdatePlan::UpToDate
    } else {
        UpdatePlan::BackupAndInstall
    }
}

/// Summary of a completed installation.
#[derive(Debug, Clone)]
pub struct InstallReport {
    /// Version now installed.
    pub version: SdkVersion,
    /// Version that was installed before, empty if none.
    pub previous: SdkVersion,
    /// Where the previous installation was moved to.
    pub backup_path: Option<PathBuf>,
    /// Size of the downloaded archive.
    pub bytes_downloaded: u64,
    /// Number of files written.
    pub files_extracted: usize,
}

/// Result of an update run.
#[derive(Debug, Clone)]
pub enum UpdateOutcome {
    /// The installed version already matches; nothing was touched.
    UpToDate { version: SdkVersion },
    /// A new installation was written.
    Installed(InstallReport),
}

/// SDK updater.
///
/// Owns its collaborators; all state for a run comes from the
/// [`ManagerConfig`] given at construction and the [`UpdateRequest`] given
/// to [`SdkUpdater::run`].
pub struct SdkUpdater<R, D, E> {
    config: ManagerConfig,
    source: R,
    downloader: D,
    extractor: E,
    progress: Option<ProgressCallback>,
}

impl<R, D, E> SdkUpdater<R, D, E>
where
    R: ReleaseSource,
    D: ArchiveDownloader,
    E: ArchiveExtractor,
{
    pub fn new(config: ManagerConfig, source: R, downloader: D, extractor: E) -> Self {
        Self {
            config,
            source,
            downloader,
            extractor,
            progress: None,
        }
    }

    /// Report download progress to `callback`.
    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress = Some(callback);
        self
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    /// Local installation this updater manages.
    pub fn store(&self) -> LocalSdkStore {
        LocalSdkStore::new(self.config.install_dir.clone())
    }

    /// Archives published remotely.
    pub fn remote_versions(&self) -> ManagerResult<RemoteListing> {
        self.source.remote_listing()
    }

    /// Run the update.
    pub fn run(&self, request: &UpdateRequest) -> ManagerResult<UpdateOutcome> {
        let target = self.resolve_target(request)?;

        let store = self.store();
        let local = store.installed_version()?;

        match decide(&local, &target, request.force) {
            UpdatePlan::UpToDate => {
                info!(
                    "You are already using version {} at {}",
                    local,
                    store.sdk_dir().display()
                );
                Ok(UpdateOutcome::UpToDate { version: local })
            }
            UpdatePlan::Install => {
                info!("No versions found in {}", self.config.install_dir.display());
                self.install(target, local, None)
            }
            UpdatePlan::BackupAndInstall => {
                info!(
                    "Found version {} installed in {}",
                    local,
                    self.config.install_dir.display()
                );
                info!("Backing up your old version");
                let backup = backup_installation(&self.config.install_dir, &local)?;
                self.install(target, local, Some(backup))
            }
        }
    }

    fn resolve_target(&self, request: &UpdateRequest) -> ManagerResult<SdkVersion> {
        match &request.version {
            VersionRequest::Latest => {
                info!("Searching latest version of sdk");
                let version = self.source.latest_version()?;
                if version.is_empty() {
                    return Err(ManagerError::ReleaseNotFound {
                        origin: self.config.version_url.clone(),
                    });
                }
                info!("Found version: {}", version);
                Ok(version)
            }
            VersionRequest::Exact(version) => {
                if request.validate_requested {
                    let listing = self.source.remote_listing()?;
                    if !listing.contains(version) {
                        return Err(ManagerError::VersionNotAvailable {
                            version: version.to_string(),
                        });
                    }
                }
                info!("Using: {}", version);
                Ok(version.clone())
            }
        }
    }

    fn install(
        &self,
        version: SdkVersion,
        previous: SdkVersion,
        backup_path: Option<PathBuf>,
    ) -> ManagerResult<UpdateOutcome> {
        let url = naming::archive_url(
            &self.config.archive_base_url,
            &self.config.platform,
            &version,
        );
        let archive = self
            .config
            .staging_dir
            .join(naming::archive_filename(&self.config.platform, &version));

        info!("Downloading {}", url);
        let bytes_downloaded = self
            .downloader
            .download(&url, &archive, self.progress.as_ref())?;

        info!("Extracting to {}", self.config.install_dir.display());
        let files_extracted = self.extractor.extract(&archive, &self.config.install_dir)?;

        if self.config.keep_archive {
            info!("Keeping archive at {}", archive.display());
        } else if let Err(e) = fs::remove_file(&archive) {
            warn!("Could not remove {}: {}", archive.display(), e);
        }

        Ok(UpdateOutcome::Installed(InstallReport {
            version,
            previous,
            backup_path,
            bytes_downloaded,
            files_extracted,
        }))
    }
}
