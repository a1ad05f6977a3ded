//! Archive download strategies.
//!
//! - [`HttpDownloader`] streams the archive in-process (`http`)
//! - [`CommandDownloader`] delegates to `curl` or `wget` (`command`)
//!
//! Both implement [`ArchiveDownloader`](super::traits::ArchiveDownloader).

mod command;
mod http;

pub use command::{CommandDownloader, DownloadTool};
pub use http::HttpDownloader;

pub(crate) use http::build_client;
