//! Downloader module containing the progress relay, the requester, the
//! builder and configuration.
//!
//! # Overview
//!
//! - `downloader` - Core [`Downloader`] struct running downloads and relaying progress
//! - `requester` - The [`Requester`] trait for plain requests
//! - `builder` - [`DownloaderBuilder`] for flexible configuration using the builder pattern
//! - `config` - Configuration structures and the [`Storage`] mode
//!
//! # Examples
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use http_relay::downloader::DownloaderBuilder;
//! use http_relay::DownloadOptions;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let downloader = DownloaderBuilder::new().build()?;
//!
//! let options = DownloadOptions::new("https://example.com/f.zip", "f.zip").with_progress(true);
//! let result = downloader
//!     .download(&options, &|event: http_relay::ProgressEvent| {
//!         println!("{} bytes", event.bytes());
//!     })
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod config;
#[allow(clippy::module_inception)]
pub mod downloader;
pub mod requester;

pub use builder::DownloaderBuilder;
pub use config::{DownloaderConfig, Storage};
pub use downloader::Downloader;
pub use requester::{HttpResponse, Requester, ResponseData};
