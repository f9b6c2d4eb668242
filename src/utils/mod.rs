//! Shared utility functions.
//!
//! - [`content_length`] - Content length extraction from response headers

pub mod content_length;

pub use content_length::content_length_from_headers;
