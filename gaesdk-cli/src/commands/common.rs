//! Common types and utilities shared across CLI commands.

use std::path::PathBuf;
use std::sync::Once;

use clap::ValueEnum;
use gaesdk::config::ConfigFile;
use gaesdk::manager::{DownloadStrategy, ManagerConfig, ProgressCallback};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use crate::error::CliError;

/// Download strategy selection for CLI arguments.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum DownloaderArg {
    /// Built-in HTTP client and zip reader
    Native,
    /// External `curl` plus `unzip`
    Curl,
    /// External `wget` plus `unzip`
    Wget,
}

impl From<DownloaderArg> for DownloadStrategy {
    fn from(arg: DownloaderArg) -> Self {
        match arg {
            DownloaderArg::Native => DownloadStrategy::Native,
            DownloaderArg::Curl => DownloadStrategy::Curl,
            DownloaderArg::Wget => DownloadStrategy::Wget,
        }
    }
}

/// Install directory: CLI > config > working directory.
pub fn resolve_install_dir(
    cli_dir: Option<PathBuf>,
    config: &ConfigFile,
) -> Result<PathBuf, CliError> {
    match cli_dir.or_else(|| config.install.directory.clone()) {
        Some(dir) => Ok(dir),
        None => std::env::current_dir().map_err(CliError::WorkingDir),
    }
}

/// Build the manager configuration from CLI overrides and the config file.
pub fn resolve_manager_config(
    install: Option<PathBuf>,
    downloader: Option<DownloaderArg>,
    keep_archive: bool,
    config: &ConfigFile,
) -> Result<ManagerConfig, CliError> {
    let install_dir = resolve_install_dir(install, config)?;
    let mut manager = config.to_manager_config(install_dir);

    if let Some(arg) = downloader {
        manager = manager.with_strategy(arg.into());
    }
    if keep_archive {
        manager = manager.with_keep_archive(true);
    }
    Ok(manager)
}

/// Byte progress bar for the archive download.
///
/// Starts hidden; [`progress_callback`] shows it on the first report.
pub fn download_bar() -> ProgressBar {
    let style = ProgressStyle::default_bar()
        .template("{prefix:.bold.cyan} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("━╸━");
    ProgressBar::with_draw_target(None, ProgressDrawTarget::hidden())
        .with_style(style)
        .with_prefix("Downloading")
}

/// Adapt a progress bar to the updater's progress callback.
///
/// The bar is cleared once the download completes, before extraction logs.
pub fn progress_callback(bar: ProgressBar) -> ProgressCallback {
    let shown = Once::new();
    Box::new(move |downloaded, total| {
        if bar.is_finished() {
            return;
        }
        shown.call_once(|| bar.set_draw_target(ProgressDrawTarget::stderr()));
        if total > 0 && bar.length() != Some(total) {
            bar.set_length(total);
        }
        bar.set_position(downloaded);
        if total > 0 && downloaded >= total {
            bar.finish_and_clear();
        }
    })
}
