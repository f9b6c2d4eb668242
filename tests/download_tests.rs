//! Tests for the download progress relay.
//!
//! These run the `Downloader` against a scripted transport so that chunk
//! boundaries, content lengths and failures are deterministic.

use bytes::Bytes;
use http_relay::progress::{ContentLength, NoProgress};
use http_relay::{DownloadOptions, DownloadResult, DownloaderBuilder, RequestOptions, Storage};
use reqwest::StatusCode;
use std::sync::Arc;

mod common;
use common::helpers::*;

#[tokio::test]
async fn test_three_chunks_with_progress() {
    let temp_dir = create_temp_dir();
    let content = create_test_content(300);
    let transport = ScriptedTransport::chunked(&content, 100);
    let downloader = DownloaderBuilder::new()
        .directory(temp_dir.path().to_path_buf())
        .build_with_transport(transport);
    let (sink, events) = recording_emitter();

    let options = DownloadOptions::new(TEST_URL, TEST_FILE).with_progress(true);
    let result = downloader.download(&options, &sink).await.unwrap();

    assert_eq!(result, DownloadResult::Path(temp_dir.path().join(TEST_FILE)));
    assert_file_content(&temp_dir.path().join(TEST_FILE), &content);

    assert_eq!(recorded_bytes(&events), vec![100, 200, 300]);
    for event in events.lock().unwrap().iter() {
        assert_eq!(event.url(), TEST_URL);
        assert_eq!(event.content_length(), ContentLength::Known(300));
        assert_eq!(
            serde_json::to_value(event).unwrap()["type"],
            serde_json::json!("DOWNLOAD")
        );
    }
}

#[tokio::test]
async fn test_relative_path_without_directory_is_kept_as_given() {
    let temp_dir = create_temp_dir();
    let transport = ScriptedTransport::chunked(&create_test_content(10), 10);
    let downloader = DownloaderBuilder::new().build_with_transport(transport);

    let options = DownloadOptions::new(TEST_URL, TEST_FILE)
        .with_file_directory(temp_dir.path());
    assert_eq!(downloader.destination(&options), temp_dir.path().join(TEST_FILE));

    let bare = DownloadOptions::new(TEST_URL, TEST_FILE);
    assert_eq!(downloader.destination(&bare), std::path::PathBuf::from(TEST_FILE));
}

#[tokio::test]
async fn test_without_progress_emits_nothing_and_yields_same_result() {
    let content = create_test_content(300);

    let temp_dir = create_temp_dir();
    let downloader = DownloaderBuilder::new()
        .directory(temp_dir.path().to_path_buf())
        .build_with_transport(ScriptedTransport::chunked(&content, 100));

    let (sink, events) = recording_emitter();
    let quiet = DownloadOptions::new(TEST_URL, TEST_FILE);
    let quiet_result = downloader.download(&quiet, &sink).await.unwrap();
    assert!(events.lock().unwrap().is_empty());

    let loud = quiet.clone().with_progress(true);
    let loud_result = downloader.download(&loud, &sink).await.unwrap();
    assert_eq!(recorded_bytes(&events), vec![100, 200, 300]);

    assert_eq!(quiet_result, loud_result);
    assert_file_content(&temp_dir.path().join(TEST_FILE), &content);
}

#[tokio::test]
async fn test_missing_url_never_reaches_transport() {
    let transport = ScriptedTransport::chunked(b"unused", 6);
    let downloader = DownloaderBuilder::new().build_with_transport(transport);
    let (sink, events) = recording_emitter();

    let options = DownloadOptions {
        file_path: Some(TEST_FILE.to_string()),
        progress: true,
        ..DownloadOptions::default()
    };
    let err = downloader.download(&options, &sink).await.unwrap_err();

    assert!(err.is_validation());
    assert_eq!(err.to_string(), "Must provide a URL");
    assert_eq!(downloader.transport().calls(), 0);
    assert!(events.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_file_path_never_reaches_transport() {
    let transport = ScriptedTransport::chunked(b"unused", 6);
    let downloader = DownloaderBuilder::new().build_with_transport(transport);

    let options = DownloadOptions {
        request: RequestOptions::new(TEST_URL),
        ..DownloadOptions::default()
    };
    let err = downloader.download(&options, &NoProgress).await.unwrap_err();

    assert!(err.is_validation());
    assert_eq!(
        err.to_string(),
        "Must provide a file path to download the file to"
    );
    assert_eq!(downloader.transport().calls(), 0);
}

#[tokio::test]
async fn test_invalid_url_never_reaches_transport() {
    let downloader =
        DownloaderBuilder::new().build_with_transport(ScriptedTransport::chunked(b"x", 1));

    for url in ["::not a url::", "example.com/f.zip", "file:///etc/passwd"] {
        let options = DownloadOptions::new(url, TEST_FILE);
        let err = downloader.download(&options, &NoProgress).await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid URL", "{url}");
    }
    assert_eq!(downloader.transport().calls(), 0);
}

#[tokio::test]
async fn test_unknown_content_length() {
    let temp_dir = create_temp_dir();
    let content = create_test_content(250);
    let transport = ScriptedTransport::with_steps(
        content
            .chunks(100)
            .map(|c| Step::Chunk(Bytes::copy_from_slice(c)))
            .collect(),
        None,
    );
    let downloader = DownloaderBuilder::new()
        .directory(temp_dir.path().to_path_buf())
        .build_with_transport(transport);
    let (sink, events) = recording_emitter();

    let options = DownloadOptions::new(TEST_URL, TEST_FILE).with_progress(true);
    downloader.download(&options, &sink).await.unwrap();

    assert_eq!(recorded_bytes(&events), vec![100, 200, 250]);
    assert!(events
        .lock()
        .unwrap()
        .iter()
        .all(|e| e.content_length() == ContentLength::Unknown));
}

#[tokio::test]
async fn test_empty_chunks_keep_bytes_strictly_increasing() {
    let temp_dir = create_temp_dir();
    let transport = ScriptedTransport::with_steps(
        vec![
            Step::Chunk(Bytes::new()),
            Step::Chunk(Bytes::from_static(b"abc")),
            Step::Chunk(Bytes::new()),
            Step::Chunk(Bytes::from_static(b"de")),
        ],
        Some(5),
    );
    let downloader = DownloaderBuilder::new()
        .directory(temp_dir.path().to_path_buf())
        .build_with_transport(transport);
    let (sink, events) = recording_emitter();

    let options = DownloadOptions::new(TEST_URL, TEST_FILE).with_progress(true);
    downloader.download(&options, &sink).await.unwrap();

    assert_eq!(recorded_bytes(&events), vec![3, 5]);
    assert_file_content(&temp_dir.path().join(TEST_FILE), b"abcde");
}

#[tokio::test]
async fn test_empty_body_with_zero_length() {
    let temp_dir = create_temp_dir();
    let transport = ScriptedTransport::with_steps(Vec::new(), Some(0));
    let downloader = DownloaderBuilder::new()
        .directory(temp_dir.path().to_path_buf())
        .build_with_transport(transport);
    let (sink, events) = recording_emitter();

    let options = DownloadOptions::new(TEST_URL, TEST_FILE).with_progress(true);
    let result = downloader.download(&options, &sink).await.unwrap();

    assert!(events.lock().unwrap().is_empty());
    assert_file_content(result.path().unwrap(), b"");
}

#[tokio::test]
async fn test_memory_storage_returns_blob() {
    let temp_dir = create_temp_dir();
    let content = create_test_content(300);
    let downloader = DownloaderBuilder::new()
        .directory(temp_dir.path().to_path_buf())
        .storage(Storage::Memory)
        .build_with_transport(ScriptedTransport::chunked(&content, 100));
    let (sink, events) = recording_emitter();

    let options = DownloadOptions::new(TEST_URL, TEST_FILE).with_progress(true);
    let result = downloader.download(&options, &sink).await.unwrap();

    assert_eq!(result, DownloadResult::Blob(Bytes::from(content)));
    assert!(result.path().is_none());
    assert_eq!(recorded_bytes(&events), vec![100, 200, 300]);
    assert!(!temp_dir.path().join(TEST_FILE).exists());
}

#[tokio::test]
async fn test_memory_storage_ignores_oversized_content_length() {
    let transport = ScriptedTransport::with_steps(
        vec![Step::Chunk(Bytes::from_static(b"abc"))],
        Some(u64::MAX),
    );
    let downloader = DownloaderBuilder::new()
        .storage(Storage::Memory)
        .build_with_transport(transport);
    let (sink, events) = recording_emitter();

    let options = DownloadOptions::new(TEST_URL, TEST_FILE).with_progress(true);
    let result = downloader.download(&options, &sink).await.unwrap();

    assert_eq!(result, DownloadResult::Blob(Bytes::from_static(b"abc")));
    assert_eq!(recorded_bytes(&events), vec![3]);
    assert_eq!(
        events.lock().unwrap()[0].content_length(),
        ContentLength::Known(u64::MAX)
    );
}

#[tokio::test]
async fn test_send_failure_is_transfer_error() {
    let downloader = DownloaderBuilder::new()
        .build_with_transport(ScriptedTransport::unreachable("connection refused"));

    let options = DownloadOptions::new(TEST_URL, TEST_FILE);
    let err = downloader.download(&options, &NoProgress).await.unwrap_err();

    assert!(err.is_transfer());
    assert_eq!(err.to_string(), "connection refused");
    assert_eq!(downloader.transport().calls(), 1);
}

#[tokio::test]
async fn test_http_error_status_is_transfer_error() {
    let temp_dir = create_temp_dir();
    let downloader = DownloaderBuilder::new()
        .directory(temp_dir.path().to_path_buf())
        .build_with_transport(
            ScriptedTransport::chunked(b"not found", 9).with_status(StatusCode::NOT_FOUND),
        );

    let options = DownloadOptions::new(TEST_URL, TEST_FILE);
    let err = downloader.download(&options, &NoProgress).await.unwrap_err();

    assert!(err.is_transfer());
    assert!(err.to_string().contains("404"));
    assert!(!temp_dir.path().join(TEST_FILE).exists());
}

#[tokio::test]
async fn test_stream_failure_removes_partial_file() {
    let temp_dir = create_temp_dir();
    let transport = ScriptedTransport::with_steps(
        vec![
            Step::Chunk(Bytes::from_static(&[1; 100])),
            Step::Chunk(Bytes::from_static(&[2; 100])),
            Step::Fail("connection reset by peer"),
        ],
        Some(300),
    );
    let downloader = DownloaderBuilder::new()
        .directory(temp_dir.path().to_path_buf())
        .build_with_transport(transport);
    let (sink, events) = recording_emitter();

    let options = DownloadOptions::new(TEST_URL, TEST_FILE).with_progress(true);
    let err = downloader.download(&options, &sink).await.unwrap_err();

    assert!(err.is_transfer());
    assert_eq!(err.to_string(), "connection reset by peer");
    assert_eq!(recorded_bytes(&events), vec![100, 200]);
    assert!(!temp_dir.path().join(TEST_FILE).exists());
}

#[tokio::test]
async fn test_unwritable_destination_is_transfer_error() {
    let temp_dir = create_temp_dir();
    let blocker = temp_dir.path().join("blocker");
    std::fs::write(&blocker, b"file, not a directory").unwrap();

    let downloader = DownloaderBuilder::new()
        .directory(blocker)
        .build_with_transport(ScriptedTransport::chunked(b"abc", 3));

    let options = DownloadOptions::new(TEST_URL, TEST_FILE);
    let err = downloader.download(&options, &NoProgress).await.unwrap_err();
    assert!(err.is_transfer());
}

#[tokio::test]
async fn test_existing_file_is_overwritten() {
    let temp_dir = create_temp_dir();
    let output = temp_dir.path().join(TEST_FILE);
    std::fs::write(&output, create_test_content(1000)).unwrap();

    let downloader = DownloaderBuilder::new()
        .directory(temp_dir.path().to_path_buf())
        .build_with_transport(ScriptedTransport::chunked(b"short", 2));

    let options = DownloadOptions::new(TEST_URL, TEST_FILE);
    downloader.download(&options, &NoProgress).await.unwrap();
    assert_file_content(&output, b"short");
}

#[tokio::test]
async fn test_nested_destination_directories_are_created() {
    let temp_dir = create_temp_dir();
    let downloader = DownloaderBuilder::new()
        .directory(temp_dir.path().to_path_buf())
        .build_with_transport(ScriptedTransport::chunked(b"nested", 3));

    let options = DownloadOptions::new(TEST_URL, "a/b/c.bin");
    let result = downloader.download(&options, &NoProgress).await.unwrap();

    assert_eq!(result.path(), Some(temp_dir.path().join("a/b/c.bin").as_path()));
    assert_file_content(&temp_dir.path().join("a/b/c.bin"), b"nested");
}

#[tokio::test]
async fn test_request_options_reach_transport() {
    let temp_dir = create_temp_dir();
    let downloader = DownloaderBuilder::new()
        .directory(temp_dir.path().to_path_buf())
        .build_with_transport(ScriptedTransport::chunked(b"abc", 3));

    let options = DownloadOptions::new(TEST_URL, TEST_FILE).with_request(
        RequestOptions::new(TEST_URL)
            .with_header("Authorization", "Bearer token")
            .with_param("v", "2"),
    );
    downloader.download(&options, &NoProgress).await.unwrap();

    let request = downloader.transport().last_request().unwrap();
    assert_eq!(request.url.as_str(), "https://example.com/f.zip?v=2");
    assert_eq!(request.headers["authorization"], "Bearer token");
}

#[tokio::test]
async fn test_download_all_is_independent_and_ordered() {
    let temp_dir = create_temp_dir();
    let downloader = DownloaderBuilder::new()
        .directory(temp_dir.path().to_path_buf())
        .concurrent_downloads(2)
        .build_with_transport(ScriptedTransport::chunked(&create_test_content(300), 100));
    let (sink, events) = recording_emitter();

    let downloads = vec![
        DownloadOptions::new("https://example.com/a.bin", "a.bin").with_progress(true),
        DownloadOptions::new("https://example.com/b.bin", "").with_progress(true),
        DownloadOptions::new("https://example.com/c.bin", "c.bin").with_progress(true),
    ];
    let results = downloader.download_all(&downloads, &sink).await;

    assert_eq!(results.len(), 3);
    assert_eq!(results[0].as_ref().unwrap().path(), Some(temp_dir.path().join("a.bin").as_path()));
    assert!(results[1].as_ref().unwrap_err().is_validation());
    assert_eq!(results[2].as_ref().unwrap().path(), Some(temp_dir.path().join("c.bin").as_path()));

    let events = events.lock().unwrap();
    for url in ["https://example.com/a.bin", "https://example.com/c.bin"] {
        let bytes: Vec<u64> = events.iter().filter(|e| e.url() == url).map(|e| e.bytes()).collect();
        assert_eq!(bytes, vec![100, 200, 300]);
    }
}

#[tokio::test]
async fn test_downloads_run_on_spawned_tasks() {
    let temp_dir = create_temp_dir();
    let downloader = Arc::new(
        DownloaderBuilder::new()
            .directory(temp_dir.path().to_path_buf())
            .build_with_transport(ScriptedTransport::chunked(&create_test_content(300), 100)),
    );
    let (sender, mut receiver) = http_relay::progress::channel();

    let task = {
        let downloader = downloader.clone();
        tokio::spawn(async move {
            let options = DownloadOptions::new(TEST_URL, TEST_FILE).with_progress(true);
            downloader.download(&options, &sender).await
        })
    };

    let result = task.await.unwrap().unwrap();
    assert!(result.path().is_some());

    let mut bytes = Vec::new();
    while let Some(event) = receiver.recv().await {
        bytes.push(event.bytes());
    }
    assert_eq!(bytes, vec![100, 200, 300]);
}
