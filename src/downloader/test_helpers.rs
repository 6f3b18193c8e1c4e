//! Shared test helpers for creating AlbumDownloader instances in tests.

use crate::config::Config;
use crate::downloader::AlbumDownloader;
use crate::engine::FetchEngine;
use crate::error::EngineError;
use crate::types::{TaskId, TaskRecord};
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tempfile::tempdir;

/// Stub engine that writes a compiled document named after the album id
pub(crate) struct DocumentWritingEngine {
    pub(crate) document_dir: PathBuf,
}

#[async_trait]
impl FetchEngine for DocumentWritingEngine {
    fn name(&self) -> &str {
        "stub-document"
    }

    async fn fetch(&self, album_id: &str) -> Result<(), EngineError> {
        let path = self.document_dir.join(format!("{album_id}.pdf"));
        tokio::fs::write(&path, b"%PDF-1.4 stub").await.unwrap();
        Ok(())
    }
}

/// Stub engine that writes one image into a decorated album directory
pub(crate) struct ImageWritingEngine {
    pub(crate) content_root: PathBuf,
}

#[async_trait]
impl FetchEngine for ImageWritingEngine {
    fn name(&self) -> &str {
        "stub-images"
    }

    async fn fetch(&self, album_id: &str) -> Result<(), EngineError> {
        let dir = self.content_root.join(format!("{album_id}_some_title"));
        tokio::fs::create_dir_all(&dir).await.unwrap();
        tokio::fs::write(dir.join("00001.jpg"), b"jpeg").await.unwrap();
        Ok(())
    }
}

/// Stub engine that always raises
pub(crate) struct FailingEngine;

#[async_trait]
impl FetchEngine for FailingEngine {
    fn name(&self) -> &str {
        "stub-failing"
    }

    async fn fetch(&self, album_id: &str) -> Result<(), EngineError> {
        Err(EngineError::FetchFailed {
            album_id: album_id.to_string(),
            cause: "remote source unreachable".to_string(),
        })
    }
}

/// Stub engine that returns success without writing anything
pub(crate) struct SilentEngine;

#[async_trait]
impl FetchEngine for SilentEngine {
    fn name(&self) -> &str {
        "stub-silent"
    }

    async fn fetch(&self, _album_id: &str) -> Result<(), EngineError> {
        Ok(())
    }
}

/// Test config rooted inside a temp directory
pub(crate) fn test_config(temp_dir: &tempfile::TempDir) -> Config {
    let mut config = Config::default();
    config.storage.content_root = temp_dir.path().join("content");
    config.storage.document_dir = temp_dir.path().join("documents");
    config.storage.tasks_file = temp_dir.path().join("tasks.json");
    config
}

/// Helper to create a test AlbumDownloader with the given engine.
/// Returns the downloader and the tempdir (which must be kept alive).
pub(crate) async fn create_test_downloader(
    engine: Arc<dyn FetchEngine>,
) -> (Arc<AlbumDownloader>, tempfile::TempDir) {
    let temp_dir = tempdir().unwrap();
    let config = test_config(&temp_dir);
    let downloader = AlbumDownloader::with_engine(config, engine)
        .await
        .unwrap();
    (Arc::new(downloader), temp_dir)
}

/// Poll a task's status until it reaches a terminal state
pub(crate) async fn wait_for_terminal(
    downloader: &AlbumDownloader,
    task_id: TaskId,
) -> TaskRecord {
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            if let Some(record) = downloader.task_status(task_id).await
                && record.status.is_terminal()
            {
                return record;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("task did not reach a terminal state in time")
}
