//! HTTP client setup and middleware configuration.
//!
//! This module builds the `reqwest` client that backs [`ReqwestTransport`].
//! Timeouts, redirects and proxying are all enforced by `reqwest` itself;
//! every request is traced through `reqwest-tracing`.
//!
//! [`ReqwestTransport`]: crate::http::ReqwestTransport
//!
//! # Examples
//!
//! ```rust
//! use http_relay::http::{create_http_client, HttpClientConfig};
//! use reqwest::header::{HeaderMap, USER_AGENT};
//! use std::time::Duration;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut headers = HeaderMap::new();
//! headers.insert(USER_AGENT, "MyApp/1.0".parse()?);
//!
//! let config = HttpClientConfig {
//!     headers: Some(headers),
//!     connect_timeout: Some(Duration::from_secs(5)),
//!     ..HttpClientConfig::default()
//! };
//!
//! let client = create_http_client(config)?;
//! # Ok(())
//! # }
//! ```

use reqwest::{header::HeaderMap, redirect, Proxy};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_tracing::TracingMiddleware;
use std::time::Duration;

/// Configuration for HTTP client setup.
#[derive(Debug, Clone, Default)]
pub struct HttpClientConfig {
    /// Optional proxy configuration.
    pub proxy: Option<Proxy>,
    /// Default headers to include with all requests.
    pub headers: Option<HeaderMap>,
    /// Maximum time to establish a connection.
    pub connect_timeout: Option<Duration>,
    /// Maximum idle time between two reads of the response.
    pub read_timeout: Option<Duration>,
    /// Return redirect responses as-is instead of following them.
    pub disable_redirects: bool,
}

/// Creates an HTTP client with middleware configuration.
///
/// This function sets up a reqwest client with:
/// - Tracing middleware for request/response logging
/// - Optional proxy support
/// - Optional default headers
/// - Optional connect and read timeouts
/// - A redirect policy that follows redirects unless disabled
///
/// # Example
///
/// ```rust
/// use http_relay::http::client::{create_http_client, HttpClientConfig};
///
/// let client = create_http_client(HttpClientConfig::default()).unwrap();
/// ```
pub fn create_http_client(
    config: HttpClientConfig,
) -> Result<ClientWithMiddleware, reqwest::Error> {
    let mut inner_client_builder = reqwest::Client::builder();

    if let Some(proxy) = config.proxy {
        inner_client_builder = inner_client_builder.proxy(proxy);
    }

    if let Some(headers) = config.headers {
        inner_client_builder = inner_client_builder.default_headers(headers);
    }

    if let Some(timeout) = config.connect_timeout {
        inner_client_builder = inner_client_builder.connect_timeout(timeout);
    }

    if let Some(timeout) = config.read_timeout {
        inner_client_builder = inner_client_builder.read_timeout(timeout);
    }

    if config.disable_redirects {
        inner_client_builder = inner_client_builder.redirect(redirect::Policy::none());
    }

    let inner_client = inner_client_builder.build()?;

    let client = ClientBuilder::new(inner_client)
        // Trace HTTP requests. See the tracing crate to make use of these traces.
        .with(TracingMiddleware::default())
        .build();

    Ok(client)
}
