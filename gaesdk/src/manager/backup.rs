//! Backup of the previous installation.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use super::error::{ManagerError, ManagerResult};
use super::naming;
use super::version::SdkVersion;

/// Rename `<install>/go_appengine` to `<install>/go_appengine-<version>`.
///
/// Existing backups are never merged or overwritten; a taken destination is
/// reported as [`ManagerError::BackupExists`] and left for the operator.
pub fn backup_installation(install_dir: &Path, version: &SdkVersion) -> ManagerResult<PathBuf> {
    let source = naming::sdk_dir(install_dir);
    let target = naming::backup_dir(install_dir, version);

    if target.exists() {
        return Err(ManagerError::BackupExists(target));
    }

    fs::rename(&source, &target).map_err(|e| ManagerError::RenameFailed {
        from: source.clone(),
        to: target.clone(),
        source: e,
    })?;

    info!("Backed up {} to {}", source.display(), target.display());
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_backup_renames_installation() {
        let temp = TempDir::new().unwrap();
        let sdk = temp.path().join("go_appengine");
        fs::create_dir_all(&sdk).unwrap();
        fs::write(sdk.join("VERSION"), "release: 1.9.90\n").unwrap();

        let backup = backup_installation(temp.path(), &SdkVersion::new("1.9.90")).unwrap();

        assert_eq!(backup, temp.path().join("go_appengine-1.9.90"));
        assert!(!sdk.exists());
        assert!(backup.join("VERSION").exists());
    }

    #[test]
    fn test_backup_refuses_existing_destination() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("go_appengine")).unwrap();
        fs::create_dir_all(temp.path().join("go_appengine-1.9.90")).unwrap();

        let err = backup_installation(temp.path(), &SdkVersion::new("1.9.90")).unwrap_err();

        assert!(matches!(err, ManagerError::BackupExists(_)));
        assert!(temp.path().join("go_appengine").exists());
    }

    #[test]
    fn test_backup_without_installation_fails() {
        let temp = TempDir::new().unwrap();

        let err = backup_installation(temp.path(), &SdkVersion::new("1.9.90")).unwrap_err();
        assert!(matches!(err, ManagerError::RenameFailed { .. }));
    }
}
