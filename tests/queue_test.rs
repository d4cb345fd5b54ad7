//! The single-worker transcode queue.

#![cfg(unix)]

mod common;

use std::time::Duration;

use serial_test::serial;

use common::{wait_for, TestHarness, FAILING_FFMPEG};
use vidvault::TranscodeQueue;
use vv_core::config::RepositoryBackend;

const CONTENT: &[u8] = b"queued video bytes";

fn transcoded(h: &TestHarness, id: u64) -> bool {
    h.library
        .repo
        .find_by_id(id)
        .map(|v| v.source == format!("{id}/transcoded.mp4"))
        .unwrap_or(false)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
#[serial]
async fn jobs_run_in_submission_order() {
    let h = TestHarness::new();
    for i in 0..3 {
        h.seed(&format!("Video {i}"), "v.mkv", CONTENT);
    }

    let queue = TranscodeQueue::start(h.library.clone());
    for id in [3, 1, 2] {
        queue.submit(id).await.unwrap();
    }

    let done = wait_for(Duration::from_secs(10), || {
        (1..=3).all(|id| transcoded(&h, id)).then_some(())
    });
    assert!(done.is_some(), "queue did not finish");

    let order: Vec<String> = h
        .ffmpeg_calls()
        .iter()
        .map(|call| {
            call.split("vidvault-transcode-")
                .nth(1)
                .and_then(|rest| rest.split('-').next())
                .unwrap_or_default()
                .to_string()
        })
        .collect();
    assert_eq!(order, vec!["3", "1", "2"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
#[serial]
async fn failed_job_does_not_stop_worker() {
    let h = TestHarness::with(RepositoryBackend::Json, FAILING_FFMPEG);
    h.seed("Broken", "broken.mkv", CONTENT);

    let queue = TranscodeQueue::start(h.library.clone());
    queue.submit(1).await.unwrap();
    queue.submit(77).await.unwrap();
    // a third submit only returns once the worker is free to take it
    queue.submit(1).await.unwrap();

    assert_eq!(h.library.repo.find_by_id(1).unwrap().source, "1/video.mkv");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
#[serial]
async fn blocking_submit_from_sync_code() {
    let h = TestHarness::new();
    h.seed("Sync", "sync.mkv", CONTENT);

    let queue = TranscodeQueue::start(h.library.clone());
    let handle = queue.clone();
    tokio::task::spawn_blocking(move || handle.submit_blocking(1))
        .await
        .unwrap()
        .unwrap();

    let done = wait_for(Duration::from_secs(10), || transcoded(&h, 1).then_some(()));
    assert!(done.is_some());
}
