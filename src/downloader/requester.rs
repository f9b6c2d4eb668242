//! Plain HTTP requests.
//!
//! [`Requester`] is the thin request interface: send a [`RequestOptions`],
//! get back the status, headers and a body shaped by the requested
//! [`ResponseType`]. Unlike downloads, a non-success status is returned to
//! the caller rather than raised.
//!
//! # Examples
//!
//! ```rust,no_run
//! use http_relay::{DownloaderBuilder, Requester, RequestOptions, ResponseData, ResponseType};
//!
//! # async fn example() -> Result<(), http_relay::Error> {
//! let downloader = DownloaderBuilder::new().build()?;
//! let options = RequestOptions::new("https://httpbin.org/get").with_response_type(ResponseType::Json);
//!
//! let response = downloader.request(&options).await?;
//! if let ResponseData::Json(value) = response.data {
//!     println!("{} -> {}", response.status, value);
//! }
//! # Ok(())
//! # }
//! ```

use super::downloader::Downloader;
use crate::error::Result;
use crate::http::Transport;
use crate::request::{prepare_request, RequestOptions, ResponseType};

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use futures::stream::StreamExt;
use reqwest::header::{HeaderMap, CONTENT_TYPE};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// Response body, shaped according to the request's response type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResponseData {
    Json(serde_json::Value),
    Text(String),
    Bytes(Bytes),
}

/// Response returned by a [`Requester`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HttpResponse {
    pub status: u16,
    /// Header names are lowercase; repeated headers are joined with `", "`.
    pub headers: BTreeMap<String, String>,
    /// Final URL, after any redirects.
    pub url: String,
    pub data: ResponseData,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends plain HTTP requests.
#[async_trait]
pub trait Requester {
    async fn request(&self, options: &RequestOptions) -> Result<HttpResponse>;
}

#[async_trait]
impl<T: Transport> Requester for Downloader<T> {
    async fn request(&self, options: &RequestOptions) -> Result<HttpResponse> {
        let request = prepare_request(options)?;
        let response = self.transport.send(&request).await?;

        let mut body = BytesMut::new();
        let mut stream = response.body;
        while let Some(chunk) = stream.next().await {
            body.extend_from_slice(&chunk?);
        }
        debug!(
            "{} {} -> {} ({} bytes)",
            request.method,
            request.url,
            response.status,
            body.len()
        );

        Ok(HttpResponse {
            status: response.status.as_u16(),
            headers: flatten_headers(&response.headers),
            url: response.url.to_string(),
            data: shape_body(&response.headers, request.response_type, body.freeze())?,
        })
    }
}

fn flatten_headers(headers: &HeaderMap) -> BTreeMap<String, String> {
    let mut flat: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in headers {
        let value = String::from_utf8_lossy(value.as_bytes());
        flat.entry(name.as_str().to_string())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(&value);
            })
            .or_insert_with(|| value.into_owned());
    }
    flat
}

/// Shapes a response body.
///
/// A JSON `Content-Type` always yields [`ResponseData::Json`], whatever
/// `response_type` asked for. An empty JSON body is `null`.
pub(crate) fn shape_body(
    headers: &HeaderMap,
    response_type: ResponseType,
    body: Bytes,
) -> Result<ResponseData> {
    let json_content = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.to_ascii_lowercase().contains("application/json"));

    match response_type {
        ResponseType::Json => parse_json(&body),
        _ if json_content => parse_json(&body),
        ResponseType::ArrayBuffer | ResponseType::Blob => Ok(ResponseData::Bytes(body)),
        ResponseType::Text | ResponseType::Document => {
            Ok(ResponseData::Text(String::from_utf8_lossy(&body).into_owned()))
        }
    }
}

fn parse_json(body: &[u8]) -> Result<ResponseData> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(ResponseData::Json(serde_json::Value::Null));
    }
    Ok(ResponseData::Json(serde_json::from_slice(body)?))
}
