//! HTTP-based archive downloader.
//!
//! Streams the response body to disk through a fixed-size buffer so the
//! archive never has to fit in memory.

use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::Path;
use std::time::Duration;

use reqwest::blocking::Client;
use tracing::debug;

use crate::manager::error::{ManagerError, ManagerResult};
use crate::manager::traits::{ArchiveDownloader, ProgressCallback};

/// Buffer size for reading/writing during downloads (64KB).
const BUFFER_SIZE: usize = 64 * 1024;

/// User agent sent with every request.
const USER_AGENT: &str = concat!("gaesdk/", env!("CARGO_PKG_VERSION"));

/// Build the blocking client shared by the fetcher and the downloader.
///
/// `None` disables the request timeout entirely.
pub(crate) fn build_client(timeout: Option<Duration>) -> ManagerResult<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| ManagerError::HttpClient(e.to_string()))
}

/// In-process archive downloader.
#[derive(Debug)]
pub struct HttpDownloader {
    client: Client,
    pub(crate) timeout: Option<Duration>,
}

impl HttpDownloader {
    /// Create a downloader without a request timeout.
    pub fn new() -> ManagerResult<Self> {
        Self::with_timeout(None)
    }

    /// Create a downloader with a request timeout.
    pub fn with_timeout(timeout: Option<Duration>) -> ManagerResult<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            timeout,
        })
    }

    /// Create the destination file, including missing parent directories.
    fn prepare_destination(&self, dest: &Path) -> ManagerResult<File> {
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).map_err(|e| ManagerError::CreateDirFailed {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        File::create(dest).map_err(|e| ManagerError::WriteFailed {
            path: dest.to_path_buf(),
            source: e,
        })
    }

    /// Stream the download to the destination file.
    fn stream_download(
        &self,
        url: &str,
        file: File,
        dest: &Path,
        progress: Option<&ProgressCallback>,
    ) -> ManagerResult<u64> {
        let mut response = self
            .client
            .get(url)
            .send()
            .map_err(|e| ManagerError::DownloadFailed {
                url: url.to_string(),
                reason: if e.is_timeout() {
                    format!("timed out after {:?}", self.timeout.unwrap_or_default())
                } else {
                    e.to_string()
                },
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ManagerError::DownloadFailed {
                url: url.to_string(),
                reason: format!("GET request failed with status {}", status),
            });
        }

        let total_size = response.content_length().unwrap_or(0);
        debug!(url, total_size, "downloading archive");

        let mut writer = BufWriter::new(file);
        let mut buffer = vec![0u8; BUFFER_SIZE];
        let mut downloaded = 0u64;

        loop {
            let bytes_read =
                response
                    .read(&mut buffer)
                    .map_err(|e| ManagerError::DownloadFailed {
                        url: url.to_string(),
                        reason: format!("Read error: {}", e),
                    })?;

            if bytes_read == 0 {
                break;
            }

            writer
                .write_all(&buffer[..bytes_read])
                .map_err(|e| ManagerError::WriteFailed {
                    path: dest.to_path_buf(),
                    source: e,
                })?;

            downloaded += bytes_read as u64;

            if let Some(cb) = progress {
                cb(downloaded, total_size);
            }
        }

        writer.flush().map_err(|e| ManagerError::WriteFailed {
            path: dest.to_path_buf(),
            source: e,
        })?;

        // Without a Content-Length the callback never saw a total; close it out.
        if total_size == 0 {
            if let Some(cb) = progress {
                cb(downloaded, downloaded);
            }
        }

        Ok(downloaded)
    }
}

impl ArchiveDownloader for HttpDownloader {
    fn download(
        &self,
        url: &str,
        dest: &Path,
        progress: Option<&ProgressCallback>,
    ) -> ManagerResult<u64> {
        let file = self.prepare_destination(dest)?;
        self.stream_download(url, file, dest, progress)
    }
}
