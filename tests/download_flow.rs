//! End-to-end tests for the download task lifecycle
//!
//! These tests exercise the whole core through the public API: submission,
//! state-machine progression, filesystem-based completion detection, durable
//! state across restarts, and the real command-backed engine.

use album_dl::{
    AlbumDownloader, Config, EngineError, FetchEngine, TaskId, TaskRecord, TaskStatus,
};
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

/// Test config rooted inside a temp directory
fn test_config(temp_dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.storage.content_root = temp_dir.path().join("content");
    config.storage.document_dir = temp_dir.path().join("documents");
    config.storage.tasks_file = temp_dir.path().join("tasks.json");
    config
}

/// Poll a task's status until it reaches a terminal state
async fn wait_for_terminal(downloader: &AlbumDownloader, task_id: TaskId) -> TaskRecord {
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            if let Some(record) = downloader.task_status(task_id).await {
                if record.status.is_terminal() {
                    return record;
                }
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("task did not reach a terminal state in time")
}

/// Stub engine that writes a document for the album before returning
struct DocumentWritingEngine {
    document_dir: PathBuf,
}

#[async_trait]
impl FetchEngine for DocumentWritingEngine {
    fn name(&self) -> &str {
        "stub-document"
    }

    async fn fetch(&self, album_id: &str) -> Result<(), EngineError> {
        tokio::fs::create_dir_all(&self.document_dir).await.unwrap();
        tokio::fs::write(
            self.document_dir.join(format!("{album_id}.pdf")),
            b"%PDF-1.4 stub",
        )
        .await
        .unwrap();
        Ok(())
    }
}

/// Stub engine that always raises
struct FailingEngine;

#[async_trait]
impl FetchEngine for FailingEngine {
    fn name(&self) -> &str {
        "stub-failing"
    }

    async fn fetch(&self, album_id: &str) -> Result<(), EngineError> {
        Err(EngineError::FetchFailed {
            album_id: album_id.to_string(),
            cause: "simulated outage".to_string(),
        })
    }
}

#[tokio::test]
async fn document_flow_completes_and_resolves() {
    let temp = tempfile::tempdir().unwrap();
    let config = test_config(&temp);
    let engine = Arc::new(DocumentWritingEngine {
        document_dir: config.storage.document_dir.clone(),
    });
    let downloader = AlbumDownloader::with_engine(config, engine).await.unwrap();

    let task_id = downloader.submit("42").await.unwrap();
    let record = wait_for_terminal(&downloader, task_id).await;

    assert_eq!(record.status, TaskStatus::Completed);
    assert_eq!(record.progress, 1.0);

    let doc = downloader.resolve_document("42").await.unwrap();
    assert!(doc.ends_with("42.pdf"));
}

#[cfg(unix)]
#[tokio::test]
async fn command_engine_flow_completes_via_image_set() {
    let temp = tempfile::tempdir().unwrap();
    let mut config = test_config(&temp);

    // A real external engine: a shell one-liner that writes one page image
    // into a decorated directory under the content root, like the opaque
    // fetcher would.
    let content_root = config.storage.content_root.display().to_string();
    config.engine.command = Some(PathBuf::from("sh"));
    config.engine.args = vec![
        "-c".to_string(),
        format!("mkdir -p \"{content_root}/${{1}}_gallery\" && printf jpeg > \"{content_root}/${{1}}_gallery/00001.jpg\""),
        "sh".to_string(),
    ];

    let downloader = AlbumDownloader::new(config).await.unwrap();

    let task_id = downloader.submit("412516").await.unwrap();
    let record = wait_for_terminal(&downloader, task_id).await;

    assert_eq!(record.status, TaskStatus::Completed);
    assert!(
        record
            .message
            .as_deref()
            .unwrap()
            .contains("may still be generating")
    );

    let (dir, images) = downloader.resolve_image_set("412516").await.unwrap();
    assert!(dir.ends_with("412516_gallery"));
    assert_eq!(images.len(), 1);
    assert_eq!(images[0].name, "00001.jpg");
}

#[cfg(unix)]
#[tokio::test]
async fn command_engine_nonzero_exit_fails_task() {
    let temp = tempfile::tempdir().unwrap();
    let mut config = test_config(&temp);
    config.engine.command = Some(PathBuf::from("false"));

    let downloader = AlbumDownloader::new(config).await.unwrap();

    let task_id = downloader.submit("42").await.unwrap();
    let record = wait_for_terminal(&downloader, task_id).await;

    assert_eq!(record.status, TaskStatus::Failed);
    assert!(record.error.is_some());
    assert!(record.progress < 1.0);
}

#[tokio::test]
async fn restart_rehydrates_terminal_tasks_identically() {
    let temp = tempfile::tempdir().unwrap();
    let config = test_config(&temp);

    let (completed_id, failed_id, before_completed, before_failed);
    {
        let engine = Arc::new(DocumentWritingEngine {
            document_dir: config.storage.document_dir.clone(),
        });
        let downloader = AlbumDownloader::with_engine(config.clone(), engine)
            .await
            .unwrap();

        completed_id = downloader.submit("42").await.unwrap();
        before_completed = wait_for_terminal(&downloader, completed_id).await;

        let failing = AlbumDownloader::with_engine(config.clone(), Arc::new(FailingEngine))
            .await
            .unwrap();
        failed_id = failing.submit("7").await.unwrap();
        before_failed = wait_for_terminal(&failing, failed_id).await;
    }

    // A fresh instance over the same state file sees both tasks unchanged
    let restarted = AlbumDownloader::with_engine(config, Arc::new(FailingEngine))
        .await
        .unwrap();

    let after_completed = restarted.task_status(completed_id).await.unwrap();
    assert_eq!(after_completed, before_completed);

    let after_failed = restarted.task_status(failed_id).await.unwrap();
    assert_eq!(after_failed, before_failed);
    assert_eq!(after_failed.status, TaskStatus::Failed);
}

#[tokio::test]
async fn restart_with_corrupted_state_starts_empty() {
    let temp = tempfile::tempdir().unwrap();
    let config = test_config(&temp);
    std::fs::write(&config.storage.tasks_file, b"definitely not json").unwrap();

    let downloader = AlbumDownloader::with_engine(config, Arc::new(FailingEngine))
        .await
        .unwrap();

    // No tasks survived, but the service is fully functional
    assert!(downloader.task_status(TaskId::generate()).await.is_none());
    let task_id = downloader.submit("42").await.unwrap();
    let record = wait_for_terminal(&downloader, task_id).await;
    assert_eq!(record.status, TaskStatus::Failed);
}

#[tokio::test]
async fn progress_never_decreases_across_observed_polls() {
    let temp = tempfile::tempdir().unwrap();
    let config = test_config(&temp);
    let engine = Arc::new(DocumentWritingEngine {
        document_dir: config.storage.document_dir.clone(),
    });
    let downloader = AlbumDownloader::with_engine(config, engine).await.unwrap();

    let task_id = downloader.submit("42").await.unwrap();

    let mut last_progress = 0.0f64;
    let final_record = tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            if let Some(record) = downloader.task_status(task_id).await {
                assert!(
                    record.progress >= last_progress,
                    "progress went backward: {} -> {}",
                    last_progress,
                    record.progress
                );
                last_progress = record.progress;
                if record.status.is_terminal() {
                    return record;
                }
            }
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    })
    .await
    .unwrap();

    assert_eq!(final_record.status, TaskStatus::Completed);
    assert_eq!(final_record.progress, 1.0);
}

#[tokio::test]
async fn many_concurrent_submissions_all_terminate() {
    let temp = tempfile::tempdir().unwrap();
    let config = test_config(&temp);
    let engine = Arc::new(DocumentWritingEngine {
        document_dir: config.storage.document_dir.clone(),
    });
    let downloader = Arc::new(AlbumDownloader::with_engine(config, engine).await.unwrap());

    let mut ids = Vec::new();
    for n in 0..10 {
        ids.push(downloader.submit(&format!("album-{n}")).await.unwrap());
    }

    // Units for different tasks never synchronize; each one must still land
    // in a terminal state with its own record intact.
    for (n, id) in ids.into_iter().enumerate() {
        let record = wait_for_terminal(&downloader, id).await;
        assert_eq!(record.status, TaskStatus::Completed);
        assert_eq!(record.album_id, format!("album-{n}"));
    }
}
