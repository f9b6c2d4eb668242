//! HTTP module containing the native client capability.
//!
//! # Overview
//!
//! - [`client`] - `reqwest` client creation and middleware configuration
//! - [`transport`] - The [`Transport`] trait and its `reqwest` implementation
//!
//! # Examples
//!
//! ## Plugging in another transport
//!
//! ```rust
//! use async_trait::async_trait;
//! use http_relay::http::{Transport, TransportResponse};
//! use http_relay::request::PreparedRequest;
//! use http_relay::{DownloaderBuilder, Error, Result};
//!
//! struct Offline;
//!
//! #[async_trait]
//! impl Transport for Offline {
//!     async fn send(&self, _request: &PreparedRequest) -> Result<TransportResponse> {
//!         Err(Error::Transfer { message: "offline".into(), source: None })
//!     }
//! }
//!
//! let downloader = DownloaderBuilder::new().build_with_transport(Offline);
//! # let _ = downloader;
//! ```

pub mod client;
pub mod transport;

pub use client::{create_http_client, HttpClientConfig};
pub use transport::{ByteStream, ReqwestTransport, Transport, TransportResponse};
