//! Builder pattern implementation for creating Downloader instances.
//!
//! # Examples
//!
//! ## Basic Builder Usage
//!
//! ```rust
//! use http_relay::downloader::DownloaderBuilder;
//! use std::path::PathBuf;
//! use std::time::Duration;
//!
//! # fn example() -> Result<(), http_relay::Error> {
//! let downloader = DownloaderBuilder::new()
//!     .directory(PathBuf::from("./downloads"))
//!     .concurrent_downloads(5)
//!     .connect_timeout(Duration::from_secs(10))
//!     .build()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Keeping Bodies in Memory
//!
//! ```rust
//! use http_relay::downloader::{DownloaderBuilder, Storage};
//!
//! # fn example() -> Result<(), http_relay::Error> {
//! let downloader = DownloaderBuilder::new().storage(Storage::Memory).build()?;
//! assert_eq!(downloader.storage(), Storage::Memory);
//! # Ok(())
//! # }
//! ```

use super::config::{DownloaderConfig, Storage};
use super::downloader::Downloader;
use crate::error::Result;
use crate::http::{ReqwestTransport, Transport};

use reqwest::header::{HeaderMap, HeaderValue, IntoHeaderName};
use std::path::PathBuf;
use std::time::Duration;

/// A builder used to create a [`Downloader`].
///
/// ```rust
/// # fn main() -> Result<(), http_relay::Error> {
/// use http_relay::downloader::DownloaderBuilder;
///
/// let d = DownloaderBuilder::new().directory("downloads".into()).build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct DownloaderBuilder {
    config: DownloaderConfig,
}

impl DownloaderBuilder {
    /// Creates a builder with the default options.
    pub fn new() -> Self {
        DownloaderBuilder::default()
    }

    /// Sets the base directory for relative file paths.
    pub fn directory(mut self, directory: PathBuf) -> Self {
        self.config.directory = Some(directory);
        self
    }

    /// Sets where downloaded bodies are stored.
    pub fn storage(mut self, storage: Storage) -> Self {
        self.config.storage = storage;
        self
    }

    /// Set the number of concurrent downloads.
    pub fn concurrent_downloads(mut self, concurrent_downloads: usize) -> Self {
        self.config.concurrent_downloads = concurrent_downloads;
        self
    }

    /// Route every request through `proxy`.
    pub fn proxy(mut self, proxy: reqwest::Proxy) -> Self {
        self.config.proxy = Some(proxy);
        self
    }

    /// Default connect timeout for requests that do not set one.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = Some(timeout);
        self
    }

    /// Default read timeout for requests that do not set one.
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.config.read_timeout = Some(timeout);
        self
    }

    /// Helper method to get or create a new HeaderMap.
    fn new_header(&self) -> HeaderMap {
        match self.config.headers {
            Some(ref h) => h.to_owned(),
            _ => HeaderMap::new(),
        }
    }

    /// Add the http headers.
    ///
    /// You can call `.headers()` multiple times and all `HeaderMap` will be merged into a single one.
    ///
    /// # Example
    ///
    /// ```
    /// use reqwest::header::{self, HeaderValue, HeaderMap};
    /// use http_relay::downloader::DownloaderBuilder;
    ///
    /// let ua = HeaderValue::from_str("curl/7.87").expect("Invalid UA");
    ///
    /// let builder = DownloaderBuilder::new()
    ///     .headers(HeaderMap::from_iter([(header::USER_AGENT, ua)]));
    /// ```
    ///
    /// See also [`header()`].
    ///
    /// [`header()`]: DownloaderBuilder::header
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        let mut new = self.new_header();
        new.extend(headers);

        self.config.headers = Some(new);
        self
    }

    /// Add the http header
    ///
    /// # Example
    ///
    /// ```
    /// use reqwest::header::{self, HeaderValue};
    /// use http_relay::downloader::DownloaderBuilder;
    ///
    /// let auth = HeaderValue::from_str("Basic aGk6MTIzNDU2Cg==").expect("Invalid auth");
    ///
    /// let builder = DownloaderBuilder::new()
    ///     .header(header::USER_AGENT, HeaderValue::from_static("http-relay"))
    ///     .header(header::AUTHORIZATION, auth);
    /// ```
    pub fn header<K: IntoHeaderName>(mut self, name: K, value: HeaderValue) -> Self {
        let mut new = self.new_header();

        new.insert(name, value);

        self.config.headers = Some(new);
        self
    }

    /// Gets the configuration built so far.
    pub fn config(&self) -> &DownloaderConfig {
        &self.config
    }

    /// Create the [`Downloader`] backed by `reqwest`.
    pub fn build(self) -> Result<Downloader> {
        let transport = ReqwestTransport::new(self.config.http_client_config())?;
        Ok(Downloader::new(self.config, transport))
    }

    /// Create the [`Downloader`] backed by another transport.
    ///
    /// Headers, proxy and timeouts are `reqwest` client settings and are
    /// left to `transport`.
    pub fn build_with_transport<T: Transport>(self, transport: T) -> Downloader<T> {
        Downloader::new(self.config, transport)
    }
}
