//! Request descriptions and their normalization.
//!
//! - [`options`] - Caller-facing [`RequestOptions`] and [`DownloadOptions`]
//! - [`normalize`] - Validation into a [`PreparedRequest`]
//!
//! # Examples
//!
//! ```rust
//! use http_relay::request::{prepare_download, DownloadOptions};
//!
//! let options = DownloadOptions::new("https://example.com/f.zip", "f.zip");
//! let prepared = prepare_download(&options)?;
//! assert_eq!(prepared.url.as_str(), "https://example.com/f.zip");
//! # Ok::<(), http_relay::Error>(())
//! ```

pub mod normalize;
pub mod options;

pub use normalize::{parse_url, prepare_download, prepare_request, PreparedRequest};
pub use options::{DownloadOptions, Method, ParamValue, RequestBody, RequestOptions, ResponseType};
