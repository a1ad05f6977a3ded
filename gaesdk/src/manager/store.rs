//! Local installation state.

use std::fs;
use std::io;
use std::path::PathBuf;

use super::error::{ManagerError, ManagerResult};
use super::naming;
use super::version::{parse_release, SdkVersion};

/// View of the SDK installed under an install directory.
///
/// Nothing is cached; every query reads the disk again.
#[derive(Debug, Clone)]
pub struct LocalSdkStore {
    install_dir: PathBuf,
}

impl LocalSdkStore {
    pub fn new(install_dir: impl Into<PathBuf>) -> Self {
        Self {
            install_dir: install_dir.into(),
        }
    }

    /// The `go_appengine` folder.
    pub fn sdk_dir(&self) -> PathBuf {
        naming::sdk_dir(&self.install_dir)
    }

    /// The `go_appengine/VERSION` marker file.
    pub fn version_file(&self) -> PathBuf {
        naming::version_file(&self.install_dir)
    }

    /// Version of the installed SDK.
    ///
    /// Returns the empty version when no marker file exists. A marker that
    /// cannot be read or has no `release` line is an error.
    pub fn installed_version(&self) -> ManagerResult<SdkVersion> {
        let path = self.version_file();
        let body = match fs::read_to_string(&path) {
            Ok(body) => body,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(SdkVersion::none()),
            Err(e) => return Err(ManagerError::ReadFailed { path, source: e }),
        };

        parse_release(&body, &path.display().to_string())
    }
}
