//! Caller-facing request descriptions.
//!
//! [`RequestOptions`] and [`DownloadOptions`] mirror the option objects the
//! host bridge hands over, and deserialize from the same camelCase JSON.
//! They are plain data: nothing here is validated until the options go
//! through [`crate::request::normalize`].
//!
//! # Examples
//!
//! ```rust
//! use http_relay::request::{DownloadOptions, Method, RequestOptions};
//! use std::time::Duration;
//!
//! let request = RequestOptions::new("https://example.com/api")
//!     .with_method(Method::Post)
//!     .with_header("Accept", "application/json")
//!     .with_param("page", "2")
//!     .with_read_timeout(Duration::from_secs(10));
//!
//! let download = DownloadOptions::new("https://example.com/f.zip", "f.zip").with_progress(true);
//! assert!(download.progress);
//! # let _ = request;
//! ```

use crate::error::Error;

use bytes::Bytes;
use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// HTTP verbs understood by the bridge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum Method {
    #[default]
    Get,
    Head,
    Post,
    Put,
    Delete,
    Trace,
    Options,
    Connect,
    Patch,
}

impl Method {
    /// All verbs, in the order the host bridge enumerates them.
    pub const ALL: [Method; 9] = [
        Method::Get,
        Method::Head,
        Method::Post,
        Method::Put,
        Method::Delete,
        Method::Trace,
        Method::Options,
        Method::Connect,
        Method::Patch,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Head => "HEAD",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Trace => "TRACE",
            Method::Options => "OPTIONS",
            Method::Connect => "CONNECT",
            Method::Patch => "PATCH",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        Method::ALL
            .into_iter()
            .find(|m| m.as_str() == upper)
            .ok_or_else(|| Error::validation(format!("Invalid method: {}", s)))
    }
}

impl TryFrom<String> for Method {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Head => reqwest::Method::HEAD,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
            Method::Trace => reqwest::Method::TRACE,
            Method::Options => reqwest::Method::OPTIONS,
            Method::Connect => reqwest::Method::CONNECT,
            Method::Patch => reqwest::Method::PATCH,
        }
    }
}

/// Hint describing how a response body should be handed back.
///
/// A response whose `Content-Type` is JSON is always parsed as JSON,
/// whatever this hint says.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseType {
    ArrayBuffer,
    Blob,
    Json,
    #[default]
    Text,
    Document,
}

/// A query parameter value: either a single string or a list of strings.
///
/// List values expand to one `key=value` pair per element.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Single(String),
    Many(Vec<String>),
}

impl ParamValue {
    pub fn values(&self) -> &[String] {
        match self {
            ParamValue::Single(value) => std::slice::from_ref(value),
            ParamValue::Many(values) => values,
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Single(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Single(value)
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(values: Vec<String>) -> Self {
        ParamValue::Many(values)
    }
}

impl From<Vec<&str>> for ParamValue {
    fn from(values: Vec<&str>) -> Self {
        ParamValue::Many(values.into_iter().map(String::from).collect())
    }
}

/// Request payload.
///
/// From JSON, a string becomes [`RequestBody::Text`] and anything else
/// [`RequestBody::Json`]. Raw bytes and form fields can only be built in code.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RequestBody {
    Text(String),
    Json(serde_json::Value),
    #[serde(skip_deserializing)]
    Bytes(Bytes),
    #[serde(skip_deserializing)]
    Form(Vec<(String, String)>),
}

/// Description of a single HTTP request.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestOptions {
    /// Target URL. Required; checked by the normalizer.
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub method: Method,
    /// Headers in insertion order.
    #[serde(default, deserialize_with = "pairs::deserialize")]
    pub headers: Vec<(String, String)>,
    /// Query parameters in insertion order.
    #[serde(default, deserialize_with = "pairs::deserialize")]
    pub params: Vec<(String, ParamValue)>,
    #[serde(default)]
    pub data: Option<RequestBody>,
    /// Maximum idle time between two reads. Milliseconds on the wire.
    #[serde(default, deserialize_with = "millis::deserialize")]
    pub read_timeout: Option<Duration>,
    /// Maximum time to establish the connection. Milliseconds on the wire.
    #[serde(default, deserialize_with = "millis::deserialize")]
    pub connect_timeout: Option<Duration>,
    #[serde(default)]
    pub disable_redirects: bool,
    #[serde(default)]
    pub response_type: Option<ResponseType>,
    /// Form-urlencode `params` when appending them to the URL.
    #[serde(default = "default_true")]
    pub should_encode_url_params: bool,
}

fn default_true() -> bool {
    true
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            url: None,
            method: Method::default(),
            headers: Vec::new(),
            params: Vec::new(),
            data: None,
            read_timeout: None,
            connect_timeout: None,
            disable_redirects: false,
            response_type: None,
            should_encode_url_params: true,
        }
    }
}

impl RequestOptions {
    /// Creates options for a GET request to `url`.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Appends a header. Headers keep the order they were added in.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Appends a query parameter.
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }

    pub fn with_data(mut self, data: RequestBody) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = Some(timeout);
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    pub fn with_disable_redirects(mut self, disable: bool) -> Self {
        self.disable_redirects = disable;
        self
    }

    pub fn with_response_type(mut self, response_type: ResponseType) -> Self {
        self.response_type = Some(response_type);
        self
    }

    /// Set to `false` to append params verbatim, e.g. when they are already encoded.
    pub fn with_encode_url_params(mut self, encode: bool) -> Self {
        self.should_encode_url_params = encode;
        self
    }
}

/// Description of a file download.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadOptions {
    #[serde(flatten)]
    pub request: RequestOptions,
    /// Where the file should be written. Required.
    #[serde(default)]
    pub file_path: Option<String>,
    /// Base directory for a relative `file_path`.
    #[serde(default)]
    pub file_directory: Option<PathBuf>,
    /// Emit a progress event for every chunk received.
    #[serde(default)]
    pub progress: bool,
}

impl DownloadOptions {
    /// Creates options downloading `url` into `file_path`, without progress events.
    pub fn new(url: impl Into<String>, file_path: impl Into<String>) -> Self {
        Self {
            request: RequestOptions::new(url),
            file_path: Some(file_path.into()),
            file_directory: None,
            progress: false,
        }
    }

    pub fn with_request(mut self, request: RequestOptions) -> Self {
        self.request = request;
        self
    }

    pub fn with_file_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.file_directory = Some(directory.into());
        self
    }

    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    /// The URL as supplied by the caller, if any.
    pub fn url(&self) -> Option<&str> {
        self.request.url.as_deref()
    }
}

/// Deserializes a JSON object into an ordered list of pairs.
mod pairs {
    use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
    use std::fmt;
    use std::marker::PhantomData;

    pub(super) fn deserialize<'de, D, V>(deserializer: D) -> Result<Vec<(String, V)>, D::Error>
    where
        D: Deserializer<'de>,
        V: Deserialize<'de>,
    {
        struct PairsVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for PairsVisitor<V> {
            type Value = Vec<(String, V)>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map")
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E> {
                Ok(Vec::new())
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut pairs = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry::<String, V>()? {
                    pairs.push(entry);
                }
                Ok(pairs)
            }
        }

        deserializer.deserialize_any(PairsVisitor(PhantomData))
    }
}

mod millis {
    use serde::{Deserialize, Deserializer};
    use std::time::Duration;

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_millis))
    }
}
