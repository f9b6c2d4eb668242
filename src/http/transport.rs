//! The native client capability.
//!
//! A [`Transport`] takes a validated [`PreparedRequest`] and returns the
//! response head plus a stream of body chunks. TLS, redirects, chunked
//! encoding and timeouts all live behind this trait. A [`Downloader`] is
//! built around exactly one transport, chosen when it is constructed.
//!
//! [`Downloader`]: crate::Downloader

use super::client::{create_http_client, HttpClientConfig};
use crate::error::{Error, Result};
use crate::request::PreparedRequest;

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{BoxStream, StreamExt};
use reqwest::{header::HeaderMap, StatusCode, Url};
use reqwest_middleware::ClientWithMiddleware;
use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;
use std::time::Duration;
use tracing::debug;

/// Stream of response body chunks.
pub type ByteStream = BoxStream<'static, Result<Bytes>>;

/// Response head and body returned by a [`Transport`].
pub struct TransportResponse {
    pub status: StatusCode,
    /// Final URL, after any redirects.
    pub url: Url,
    pub headers: HeaderMap,
    pub body: ByteStream,
}

impl fmt::Debug for TransportResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransportResponse")
            .field("status", &self.status)
            .field("url", &self.url)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

/// Sends prepared requests over the network.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends `request` and returns once the response head has arrived.
    ///
    /// Failures to connect, to negotiate TLS or to receive the head surface
    /// as [`Error::Transfer`](crate::Error::Transfer). Non-success statuses
    /// are not errors at this level.
    async fn send(&self, request: &PreparedRequest) -> Result<TransportResponse>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct ClientKey {
    connect_timeout: Option<Duration>,
    read_timeout: Option<Duration>,
    disable_redirects: bool,
}

/// [`Transport`] backed by `reqwest`.
///
/// Timeouts and the redirect policy are client-level settings in `reqwest`.
/// Requests that override them get a dedicated client, cached per
/// combination of settings.
pub struct ReqwestTransport {
    config: HttpClientConfig,
    default_client: ClientWithMiddleware,
    clients: Mutex<HashMap<ClientKey, ClientWithMiddleware>>,
}

impl fmt::Debug for ReqwestTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReqwestTransport")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ReqwestTransport {
    /// Creates a transport whose default client is built from `config`.
    pub fn new(config: HttpClientConfig) -> Result<Self> {
        let default_client = create_http_client(config.clone())?;
        Ok(Self {
            config,
            default_client,
            clients: Mutex::new(HashMap::new()),
        })
    }

    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    fn default_key(&self) -> ClientKey {
        ClientKey {
            connect_timeout: self.config.connect_timeout,
            read_timeout: self.config.read_timeout,
            disable_redirects: self.config.disable_redirects,
        }
    }

    fn client_for(&self, request: &PreparedRequest) -> Result<ClientWithMiddleware> {
        let defaults = self.default_key();
        let key = ClientKey {
            connect_timeout: request.connect_timeout.or(defaults.connect_timeout),
            read_timeout: request.read_timeout.or(defaults.read_timeout),
            disable_redirects: request.disable_redirects || defaults.disable_redirects,
        };
        if key == defaults {
            return Ok(self.default_client.clone());
        }

        let mut clients = self.clients.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(client) = clients.get(&key) {
            return Ok(client.clone());
        }

        debug!("Building HTTP client for {:?}", key);
        let client = create_http_client(HttpClientConfig {
            connect_timeout: key.connect_timeout,
            read_timeout: key.read_timeout,
            disable_redirects: key.disable_redirects,
            ..self.config.clone()
        })?;
        clients.insert(key, client.clone());
        Ok(client)
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &PreparedRequest) -> Result<TransportResponse> {
        let client = self.client_for(request)?;

        let mut req = client
            .request(request.method.clone(), request.url.clone())
            .headers(request.headers.clone());
        if let Some(body) = &request.body {
            req = req.body(body.clone());
        }

        debug!("{} {}", request.method, request.url);
        let res = req.send().await?;

        Ok(TransportResponse {
            status: res.status(),
            url: res.url().clone(),
            headers: res.headers().clone(),
            body: res.bytes_stream().map(|chunk| chunk.map_err(Error::from)).boxed(),
        })
    }
}
