//! Options normalization.
//!
//! Turns caller-supplied options into a [`PreparedRequest`] the transport can
//! send as-is, or fails with [`Error::Validation`]. Nothing in here performs
//! I/O. The checks run in a fixed order: URL presence, then (for downloads)
//! file path presence, then URL syntax.

use super::options::{DownloadOptions, ParamValue, RequestBody, RequestOptions, ResponseType};
use crate::error::{Error, Result};

use bytes::Bytes;
use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE},
    Url,
};
use std::time::Duration;

pub const MISSING_URL: &str = "Must provide a URL";
pub const MISSING_FILE_PATH: &str = "Must provide a file path to download the file to";
pub const INVALID_URL: &str = "Invalid URL";

/// A validated request, ready to be handed to a [`Transport`](crate::http::Transport).
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    /// Target URL with the query parameters already applied.
    pub url: Url,
    pub method: reqwest::Method,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
    pub read_timeout: Option<Duration>,
    pub connect_timeout: Option<Duration>,
    pub disable_redirects: bool,
    pub response_type: ResponseType,
}

/// Validates and shapes options for a plain request.
pub fn prepare_request(options: &RequestOptions) -> Result<PreparedRequest> {
    let raw = require_url(options)?;
    shape(raw, options)
}

/// Validates and shapes options for a download.
pub fn prepare_download(options: &DownloadOptions) -> Result<PreparedRequest> {
    let raw = require_url(&options.request)?;
    match options.file_path.as_deref() {
        Some(path) if !path.is_empty() => (),
        _ => return Err(Error::validation(MISSING_FILE_PATH)),
    }
    shape(raw, &options.request)
}

fn require_url(options: &RequestOptions) -> Result<&str> {
    options
        .url
        .as_deref()
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .ok_or_else(|| Error::validation(MISSING_URL))
}

/// Parses `raw` as an absolute http(s) URL.
pub fn parse_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw).map_err(|_| Error::validation(INVALID_URL))?;
    match url.scheme() {
        "http" | "https" if url.has_host() => Ok(url),
        _ => Err(Error::validation(INVALID_URL)),
    }
}

fn shape(raw: &str, options: &RequestOptions) -> Result<PreparedRequest> {
    let mut url = parse_url(raw)?;
    apply_params(&mut url, &options.params, options.should_encode_url_params);

    let mut headers = header_map(&options.headers)?;
    let body = options
        .data
        .as_ref()
        .map(|data| encode_body(data, &mut headers))
        .transpose()?;

    Ok(PreparedRequest {
        url,
        method: options.method.into(),
        headers,
        body,
        read_timeout: options.read_timeout,
        connect_timeout: options.connect_timeout,
        disable_redirects: options.disable_redirects,
        response_type: options.response_type.unwrap_or_default(),
    })
}

/// Appends `params` to the URL's existing query, in order.
///
/// With `encode` set the pairs are form-urlencoded; otherwise they are joined
/// verbatim so that values which are already encoded survive untouched.
pub fn apply_params(url: &mut Url, params: &[(String, ParamValue)], encode: bool) {
    if params.is_empty() {
        return;
    }

    let pairs = params
        .iter()
        .flat_map(|(key, value)| value.values().iter().map(move |v| (key.as_str(), v.as_str())));
    let existing = url.query().unwrap_or_default().to_string();

    let query = if encode {
        form_urlencoded::Serializer::new(existing)
            .extend_pairs(pairs)
            .finish()
    } else {
        pairs.fold(existing, |mut query, (key, value)| {
            if !query.is_empty() {
                query.push('&');
            }
            query.push_str(key);
            query.push('=');
            query.push_str(value);
            query
        })
    };

    url.set_query(Some(&query));
}

fn header_map(headers: &[(String, String)]) -> Result<HeaderMap> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let invalid = || Error::validation(format!("Invalid header: {}", name));
        let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid())?;
        let header_value = HeaderValue::from_str(value).map_err(|_| invalid())?;
        map.append(header_name, header_value);
    }
    Ok(map)
}

fn encode_body(data: &RequestBody, headers: &mut HeaderMap) -> Result<Bytes> {
    match data {
        RequestBody::Text(text) => Ok(Bytes::from(text.clone())),
        RequestBody::Bytes(bytes) => Ok(bytes.clone()),
        RequestBody::Json(value) => {
            headers
                .entry(CONTENT_TYPE)
                .or_insert(HeaderValue::from_static("application/json"));
            serde_json::to_vec(value)
                .map(Bytes::from)
                .map_err(|e| Error::validation(format!("Invalid request body: {}", e)))
        }
        RequestBody::Form(fields) => {
            headers
                .entry(CONTENT_TYPE)
                .or_insert(HeaderValue::from_static("application/x-www-form-urlencoded"));
            let encoded = form_urlencoded::Serializer::new(String::new())
                .extend_pairs(fields)
                .finish();
            Ok(Bytes::from(encoded))
        }
    }
}
