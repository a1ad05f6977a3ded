//! Archive extraction for SDK installation.
//!
//! This module handles:
//! - Expanding zip archives in-process, entry by entry, keeping permission bits
//! - Expanding through the system `unzip` tool as a fallback

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;
use std::process::Command;

use tracing::{debug, info};
use zip::ZipArchive;

use super::error::{ManagerError, ManagerResult};
use super::traits::ArchiveExtractor;

/// Mode for directory entries that carry no permission bits.
const DEFAULT_DIR_MODE: u32 = 0o755;

/// Mode for file entries that carry no permission bits.
const DEFAULT_FILE_MODE: u32 = 0o644;

/// Buffer size for copying entry contents (64KB).
const BUFFER_SIZE: usize = 64 * 1024;

/// In-process zip extractor.
///
/// Entries are written in archive order. The first failing entry aborts the
/// extraction; entries already written stay on disk.
#[derive(Debug, Default)]
pub struct ZipExtractor;

impl ZipExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Copy one entry's bytes to `path`, distinguishing read from write failures.
    fn copy_entry(
        &self,
        entry: &mut impl Read,
        archive: &Path,
        name: &str,
        path: &Path,
        mode: u32,
    ) -> ManagerResult<()> {
        let file = create_file(path, mode).map_err(|e| ManagerError::WriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;
        let mut writer = BufWriter::new(file);
        let mut buffer = vec![0u8; BUFFER_SIZE];

        loop {
            let bytes_read = entry
                .read(&mut buffer)
                .map_err(|e| ManagerError::ExtractionFailed {
                    path: archive.to_path_buf(),
                    reason: format!("failed to read entry {}: {}", name, e),
                })?;

            if bytes_read == 0 {
                break;
            }

            writer
                .write_all(&buffer[..bytes_read])
                .map_err(|e| ManagerError::WriteFailed {
                    path: path.to_path_buf(),
                    source: e,
                })?;
        }

        writer.flush().map_err(|e| ManagerError::WriteFailed {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

impl ArchiveExtractor for ZipExtractor {
    fn extract(&self, archive: &Path, dest_dir: &Path) -> ManagerResult<usize> {
        let file = File::open(archive).map_err(|e| ManagerError::ReadFailed {
            path: archive.to_path_buf(),
            source: e,
        })?;

        let mut zip = ZipArchive::new(file).map_err(|e| ManagerError::ExtractionFailed {
            path: archive.to_path_buf(),
            reason: e.to_string(),
        })?;

        let mut files = 0;

        for index in 0..zip.len() {
            let mut entry = zip
                .by_index(index)
                .map_err(|e| ManagerError::ExtractionFailed {
                    path: archive.to_path_buf(),
                    reason: e.to_string(),
                })?;

            let name = entry.name().to_string();
            let relative = entry
                .enclosed_name()
                .ok_or_else(|| ManagerError::ExtractionFailed {
                    path: archive.to_path_buf(),
                    reason: format!("entry {} escapes the destination directory", name),
                })?;
            let path = dest_dir.join(relative);

            if entry.is_dir() {
                let mode = entry_mode(entry.unix_mode(), DEFAULT_DIR_MODE);
                create_dir(&path, mode).map_err(|e| ManagerError::CreateDirFailed {
                    path: path.clone(),
                    source: e,
                })?;
                info!("creating: {}", path.display());
            } else {
                if let Some(parent) = path.parent() {
                    create_dir(parent, DEFAULT_DIR_MODE).map_err(|e| {
                        ManagerError::CreateDirFailed {
                            path: parent.to_path_buf(),
                            source: e,
                        }
                    })?;
                }
                let mode = entry_mode(entry.unix_mode(), DEFAULT_FILE_MODE);
                self.copy_entry(&mut entry, archive, &name, &path, mode)?;
                info!("inflating: {}", path.display());
                files += 1;
            }
        }

        Ok(files)
    }
}

/// Shell-based extractor using the system `unzip` tool.
#[derive(Debug, Default)]
pub struct ShellExtractor;

impl ShellExtractor {
    pub fn new() -> Self {
        Self
    }

    /// List archive members without extracting.
    pub fn list_contents(&self, archive: &Path) -> ManagerResult<Vec<String>> {
        let output = Command::new("unzip")
            .arg("-Z1")
            .arg(archive)
            .output()
            .map_err(|e| ManagerError::ExtractionFailed {
                path: archive.to_path_buf(),
                reason: format!("Failed to run unzip: {}", e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ManagerError::ExtractionFailed {
                path: archive.to_path_buf(),
                reason: format!("unzip list failed: {}", stderr.trim()),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(stdout.lines().map(|s| s.to_string()).collect())
    }
}

impl ArchiveExtractor for ShellExtractor {
    fn extract(&self, archive: &Path, dest_dir: &Path) -> ManagerResult<usize> {
        fs::create_dir_all(dest_dir).map_err(|e| ManagerError::CreateDirFailed {
            path: dest_dir.to_path_buf(),
            source: e,
        })?;

        debug!(archive = %archive.display(), "running unzip");
        let output = Command::new("unzip")
            .args(["-o", "-q"])
            .arg(archive)
            .arg("-d")
            .arg(dest_dir)
            .output()
            .map_err(|e| ManagerError::ExtractionFailed {
                path: archive.to_path_buf(),
                reason: format!("Failed to run unzip: {}", e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ManagerError::ExtractionFailed {
                path: archive.to_path_buf(),
                reason: format!("unzip extraction failed: {}", stderr.trim()),
            });
        }

        let files = self
            .list_contents(archive)?
            .iter()
            .filter(|name| !name.ends_with('/'))
            .count();
        Ok(files)
    }
}

/// Permission bits of an entry, falling back to `default`.
fn entry_mode(stored: Option<u32>, default: u32) -> u32 {
    match stored {
        Some(mode) if mode & 0o777 != 0 => mode & 0o7777,
        _ => default,
    }
}

#[cfg(unix)]
fn create_dir(path: &Path, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;

    fs::DirBuilder::new().recursive(true).mode(mode).create(path)
}

#[cfg(not(unix))]
fn create_dir(path: &Path, _mode: u32) -> io::Result<()> {
    fs::DirBuilder::new().recursive(true).create(path)
}

#[cfg(unix)]
fn create_file(path: &Path, mode: u32) -> io::Result<File> {
    use std::os::unix::fs::OpenOptionsExt;

    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(mode)
        .open(path)
}

#[cfg(not(unix))]
fn create_file(path: &Path, _mode: u32) -> io::Result<File> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
}
