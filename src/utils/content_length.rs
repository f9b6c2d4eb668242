//! Content length extraction utilities.

use crate::progress::ContentLength;

use reqwest::header::{HeaderMap, CONTENT_LENGTH};

/// Extract the advertised body size from the `Content-Length` header.
///
/// A missing header, or one that does not hold an u64, yields
/// [`ContentLength::Unknown`]. A header of `0` is a known, empty body.
///
/// # Example
///
/// ```rust
/// use http_relay::progress::ContentLength;
/// use http_relay::utils::content_length_from_headers;
/// use reqwest::header::{HeaderMap, HeaderValue, CONTENT_LENGTH};
///
/// let mut headers = HeaderMap::new();
/// assert_eq!(content_length_from_headers(&headers), ContentLength::Unknown);
///
/// headers.insert(CONTENT_LENGTH, HeaderValue::from_static("2048"));
/// assert_eq!(content_length_from_headers(&headers), ContentLength::Known(2048));
/// ```
pub fn content_length_from_headers(headers: &HeaderMap) -> ContentLength {
    headers
        .get(CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok())
        .into()
}
