//! List command - print the SDK versions available remotely.

use std::path::PathBuf;

use gaesdk::config::ConfigFile;
use gaesdk::manager::build_updater;
use tracing::warn;

use super::common::resolve_manager_config;
use crate::error::CliError;

/// Run the list command, one version per line on stdout.
pub fn run(install: Option<PathBuf>, config: &ConfigFile) -> Result<(), CliError> {
    let manager_config = resolve_manager_config(install, None, false, config)?;
    let listing_url = manager_config.listing_url.clone();
    let updater = build_updater(manager_config)?;

    let listing = updater.remote_versions()?;
    if listing.is_empty() {
        warn!("No versions found in {}", listing_url);
        return Ok(());
    }

    let installed = updater.store().installed_version()?;
    for version in listing.versions() {
        if *version == installed {
            println!("{} (installed)", version);
        } else {
            println!("{}", version);
        }
    }
    Ok(())
}
