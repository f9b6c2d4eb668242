use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{self, StreamExt};
use http_relay::http::{Transport, TransportResponse};
use http_relay::request::PreparedRequest;
use http_relay::{Error, ProgressEvent, Result};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_LENGTH};
use reqwest::{StatusCode, Url};
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

// Common test constants
pub const TEST_URL: &str = "https://example.com/f.zip";
pub const TEST_FILE: &str = "f.zip";
pub const TEST_USER_AGENT: &str = "http-relay-test-agent";

/// Creates a temporary directory for testing purposes
pub fn create_temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temporary directory")
}

/// Creates test file content of specified size
pub fn create_test_content(size: usize) -> Vec<u8> {
    (0..size).map(|i| (i % 256) as u8).collect()
}

/// Asserts that a file has the expected content
pub fn assert_file_content(path: &Path, expected: &[u8]) {
    let content = fs::read(path).expect("Failed to read file");
    assert_eq!(content, expected, "File content mismatch at path: {:?}", path);
}

/// One item of a scripted response body.
#[derive(Clone)]
pub enum Step {
    Chunk(Bytes),
    Fail(&'static str),
}

/// A transport replaying a fixed response, counting how often it was called.
pub struct ScriptedTransport {
    status: StatusCode,
    content_length: Option<u64>,
    steps: Vec<Step>,
    fail_on_send: Option<&'static str>,
    calls: AtomicUsize,
    last_request: Mutex<Option<PreparedRequest>>,
}

impl ScriptedTransport {
    /// Serves `body` in chunks of `chunk_size`, advertising its length.
    pub fn chunked(body: &[u8], chunk_size: usize) -> Self {
        let steps = body
            .chunks(chunk_size)
            .map(|c| Step::Chunk(Bytes::copy_from_slice(c)))
            .collect();
        Self::with_steps(steps, Some(body.len() as u64))
    }

    pub fn with_steps(steps: Vec<Step>, content_length: Option<u64>) -> Self {
        Self {
            status: StatusCode::OK,
            content_length,
            steps,
            fail_on_send: None,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Fails every request before any response arrives.
    pub fn unreachable(message: &'static str) -> Self {
        Self {
            fail_on_send: Some(message),
            ..Self::with_steps(Vec::new(), None)
        }
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<PreparedRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: &PreparedRequest) -> Result<TransportResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());

        if let Some(message) = self.fail_on_send {
            return Err(Error::Transfer {
                message: message.to_string(),
                source: None,
            });
        }

        let mut headers = HeaderMap::new();
        if let Some(len) = self.content_length {
            headers.insert(CONTENT_LENGTH, HeaderValue::from(len));
        }

        let items: Vec<Result<Bytes>> = self
            .steps
            .iter()
            .map(|step| match step {
                Step::Chunk(bytes) => Ok(bytes.clone()),
                Step::Fail(message) => Err(Error::Transfer {
                    message: message.to_string(),
                    source: None,
                }),
            })
            .collect();

        Ok(TransportResponse {
            status: self.status,
            url: Url::parse(request.url.as_str()).unwrap(),
            headers,
            body: stream::iter(items).boxed(),
        })
    }
}

/// A closure sink recording every event it receives.
pub fn recording_emitter() -> (impl Fn(ProgressEvent) + Send + Sync, Arc<Mutex<Vec<ProgressEvent>>>) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = {
        let events = events.clone();
        move |event: ProgressEvent| events.lock().unwrap().push(event)
    };
    (sink, events)
}

/// Bytes values of the recorded events.
pub fn recorded_bytes(events: &Arc<Mutex<Vec<ProgressEvent>>>) -> Vec<u64> {
    events.lock().unwrap().iter().map(|e| e.bytes()).collect()
}

/// Creates test headers with common user agent
pub fn create_test_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        reqwest::header::USER_AGENT,
        HeaderValue::from_static(TEST_USER_AGENT),
    );
    headers
}
