//! Download through an external program.
//!
//! Fallback for hosts where the in-process client cannot reach the archive
//! (proxies, custom TLS setups) but `curl` or `wget` can.

use std::fs;
use std::path::Path;
use std::process::Command;

use tracing::debug;

use crate::manager::error::{ManagerError, ManagerResult};
use crate::manager::traits::{ArchiveDownloader, ProgressCallback};

/// Supported download programs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadTool {
    Curl,
    Wget,
}

impl DownloadTool {
    /// Executable name.
    pub fn program(&self) -> &'static str {
        match self {
            Self::Curl => "curl",
            Self::Wget => "wget",
        }
    }

    /// Arguments that fetch `url` into `dest`, failing on HTTP errors.
    fn args(&self, url: &str, dest: &Path) -> Vec<String> {
        let dest = dest.display().to_string();
        match self {
            Self::Curl => vec![
                "--fail".to_string(),
                "--silent".to_string(),
                "--show-error".to_string(),
                "--location".to_string(),
                "--output".to_string(),
                dest,
                url.to_string(),
            ],
            Self::Wget => vec![
                "--quiet".to_string(),
                "--output-document".to_string(),
                dest,
                url.to_string(),
            ],
        }
    }
}

/// Downloader that shells out to [`DownloadTool`].
#[derive(Debug, Clone)]
pub struct CommandDownloader {
    tool: DownloadTool,
}

impl CommandDownloader {
    pub fn new(tool: DownloadTool) -> Self {
        Self { tool }
    }

    pub fn tool(&self) -> DownloadTool {
        self.tool
    }
}

impl ArchiveDownloader for CommandDownloader {
    fn download(
        &self,
        url: &str,
        dest: &Path,
        progress: Option<&ProgressCallback>,
    ) -> ManagerResult<u64> {
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).map_err(|e| ManagerError::CreateDirFailed {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        debug!(program = self.tool.program(), url, "running external downloader");
        let output = Command::new(self.tool.program())
            .args(self.tool.args(url, dest))
            .output()
            .map_err(|e| ManagerError::DownloadFailed {
                url: url.to_string(),
                reason: format!("Failed to run {}: {}", self.tool.program(), e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ManagerError::DownloadFailed {
                url: url.to_string(),
                reason: format!(
                    "{} exited with {}: {}",
                    self.tool.program(),
                    output.status,
                    stderr.trim()
                ),
            });
        }

        let size = fs::metadata(dest)
            .map_err(|e| ManagerError::ReadFailed {
                path: dest.to_path_buf(),
                source: e,
            })?
            .len();

        // The tool gives no incremental feedback; report completion once.
        if let Some(cb) = progress {
            cb(size, size);
        }

        Ok(size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    use mockito::Server;
    use tempfile::TempDir;

    fn curl_available() -> bool {
        Command::new("curl").arg("--version").output().is_ok()
    }

    #[test]
    fn test_curl_args() {
        let args = DownloadTool::Curl.args("https://example.com/a.zip", Path::new("/tmp/a.zip"));
        assert_eq!(args.last().unwrap(), "https://example.com/a.zip");
        assert!(args.contains(&"--fail".to_string()));
        assert!(args.contains(&"/tmp/a.zip".to_string()));
    }

    #[test]
    fn test_wget_args() {
        let args = DownloadTool::Wget.args("https://example.com/a.zip", Path::new("/tmp/a.zip"));
        assert_eq!(
            args,
            vec!["--quiet", "--output-document", "/tmp/a.zip", "https://example.com/a.zip"]
        );
    }

    #[test]
    fn test_program_names() {
        assert_eq!(CommandDownloader::new(DownloadTool::Curl).tool().program(), "curl");
        assert_eq!(DownloadTool::Wget.program(), "wget");
    }

    #[test]
    fn test_curl_download_writes_body() {
        if !curl_available() {
            eprintln!("curl not found, skipping");
            return;
        }

        let mut server = Server::new();
        let mock = server
            .mock("GET", "/featured/sdk.zip")
            .with_body("archive bytes")
            .create();

        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("staging/sdk.zip");
        let reported = Arc::new(AtomicU64::new(0));
        let seen = reported.clone();
        let progress: ProgressCallback = Box::new(move |done, _total| {
            seen.store(done, Ordering::SeqCst);
        });

        let size = CommandDownloader::new(DownloadTool::Curl)
            .download(
                &format!("{}/featured/sdk.zip", server.url()),
                &dest,
                Some(&progress),
            )
            .unwrap();

        mock.assert();
        assert_eq!(size, 13);
        assert_eq!(fs::read_to_string(&dest).unwrap(), "archive bytes");
        assert_eq!(reported.load(Ordering::SeqCst), 13);
    }

    #[test]
    fn test_curl_http_error_carries_stderr() {
        if !curl_available() {
            eprintln!("curl not found, skipping");
            return;
        }

        let mut server = Server::new();
        server
            .mock("GET", "/featured/missing.zip")
            .with_status(404)
            .create();

        let temp = TempDir::new().unwrap();
        let err = CommandDownloader::new(DownloadTool::Curl)
            .download(
                &format!("{}/featured/missing.zip", server.url()),
                &temp.path().join("missing.zip"),
                None,
            )
            .unwrap_err();

        match err {
            ManagerError::DownloadFailed { reason, .. } => {
                assert!(reason.starts_with("curl exited with"), "reason: {}", reason);
                assert!(reason.contains("404"), "reason: {}", reason);
            }
            other => panic!("expected DownloadFailed, got {:?}", other),
        }
    }
}
