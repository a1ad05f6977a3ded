//! Update command - bring the local SDK to the requested version.

use std::path::PathBuf;

use gaesdk::config::ConfigFile;
use gaesdk::manager::{build_updater, UpdateOutcome, UpdateRequest, VersionRequest};
use tracing::{debug, info};

use super::common::{download_bar, progress_callback, resolve_manager_config, DownloaderArg};
use crate::error::CliError;

/// Arguments for the update command.
#[derive(Debug, Clone, Default)]
pub struct UpdateArgs {
    pub version: Option<String>,
    pub install: Option<PathBuf>,
    pub force: bool,
    pub check_available: bool,
    pub downloader: Option<DownloaderArg>,
    pub keep_archive: bool,
}

impl UpdateArgs {
    fn request(&self) -> UpdateRequest {
        UpdateRequest::new(VersionRequest::parse(self.version.as_deref()))
            .with_force(self.force)
            .with_validation(self.check_available)
    }
}

/// Run the update command.
pub fn run(args: UpdateArgs, config: &ConfigFile) -> Result<(), CliError> {
    let request = args.request();
    let manager_config =
        resolve_manager_config(args.install, args.downloader, args.keep_archive, config)?;
    debug!(
        "Install directory {}, strategy {}",
        manager_config.install_dir.display(),
        manager_config.strategy.name()
    );

    let bar = download_bar();
    let updater = build_updater(manager_config)?.with_progress(progress_callback(bar.clone()));
    let outcome = updater.run(&request);
    // Still drawn if the download failed part way.
    bar.finish_and_clear();

    if let UpdateOutcome::Installed(report) = outcome? {
        info!(
            "Installed version {} ({} files, {} bytes downloaded)",
            report.version, report.files_extracted, report.bytes_downloaded
        );
        if let Some(backup) = report.backup_path {
            info!("Previous version {} kept at {}", report.previous, backup.display());
        }
    }
    Ok(())
}
