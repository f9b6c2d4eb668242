//! Configuration structures and defaults for the downloader.
//!
//! # Examples
//!
//! ```rust
//! use http_relay::downloader::{DownloaderConfig, Storage};
//!
//! let config = DownloaderConfig::default();
//! assert_eq!(config.storage, Storage::Disk);
//! assert_eq!(config.concurrent_downloads, 32);
//! ```

use crate::http::HttpClientConfig;

use reqwest::header::HeaderMap;
use std::path::PathBuf;
use std::time::Duration;

/// Where downloaded bodies are stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Storage {
    /// Write the body to the destination file and return its path.
    #[default]
    Disk,
    /// Keep the body in memory and return it as a blob.
    Memory,
}

/// Configuration structure for the downloader
#[derive(Clone, Debug)]
pub struct DownloaderConfig {
    /// Base directory for relative file paths without a `file_directory`.
    ///
    /// When unset such paths are used as given, relative to the working directory.
    pub directory: Option<PathBuf>,
    /// Where downloaded bodies are stored.
    pub storage: Storage,
    /// Number of maximum concurrent downloads in [`Downloader::download_all`].
    ///
    /// [`Downloader::download_all`]: crate::Downloader::download_all
    pub concurrent_downloads: usize,
    /// Custom HTTP headers sent with every request.
    pub headers: Option<HeaderMap>,
    /// Optional proxy configuration.
    pub proxy: Option<reqwest::Proxy>,
    /// Default connect timeout, unless a request sets its own.
    pub connect_timeout: Option<Duration>,
    /// Default read timeout, unless a request sets its own.
    pub read_timeout: Option<Duration>,
}

impl Default for DownloaderConfig {
    fn default() -> Self {
        Self {
            directory: None,
            storage: Storage::Disk,
            concurrent_downloads: 32,
            headers: None,
            proxy: None,
            connect_timeout: None,
            read_timeout: None,
        }
    }
}

impl DownloaderConfig {
    /// HTTP client settings derived from this configuration.
    pub fn http_client_config(&self) -> HttpClientConfig {
        HttpClientConfig {
            proxy: self.proxy.clone(),
            headers: self.headers.clone(),
            connect_timeout: self.connect_timeout,
            read_timeout: self.read_timeout,
            disable_redirects: false,
        }
    }
}
