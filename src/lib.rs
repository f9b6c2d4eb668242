//! http-relay validates HTTP request descriptions, runs them through a
//! pluggable HTTP client, and relays download progress as discrete events.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use http_relay::{progress::channel, DownloadOptions, DownloaderBuilder, Error};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Error> {
//! let downloader = DownloaderBuilder::new().build()?;
//! let (sender, mut receiver) = channel();
//! tokio::spawn(async move {
//!     while let Some(event) = receiver.recv().await {
//!         println!("{} / {}", event.bytes(), event.content_length());
//!     }
//! });
//!
//! let options = DownloadOptions::new("https://example.com/f.zip", "f.zip").with_progress(true);
//! let result = downloader.download(&options, &sender).await?;
//! println!("{:?}", result.path());
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - [`request`] - Request options and their normalization
//! - [`downloader`] - The `Downloader`, its builder and the `Requester` interface
//! - [`download`] - Per-download lifecycle and results
//! - [`http`] - The `Transport` capability and its `reqwest` implementation
//! - [`progress`] - Progress events and sinks
//! - [`error`] - Centralized error handling with the `Error` enum
//! - [`utils`] - Shared utility functions

pub mod download;
pub mod downloader;
pub mod error;
pub mod http;
pub mod progress;
pub mod request;
pub mod utils;

pub use download::{DownloadResult, Transfer, TransferState};
pub use downloader::{
    Downloader, DownloaderBuilder, HttpResponse, Requester, ResponseData, Storage,
};
pub use error::{Error, Result};
pub use http::{create_http_client, HttpClientConfig, ReqwestTransport, Transport};
pub use progress::{ContentLength, ProgressEmitter, ProgressEvent};
pub use request::{
    DownloadOptions, Method, ParamValue, RequestBody, RequestOptions, ResponseType,
};
