//! Background download unit execution
//!
//! One unit runs per submitted task, independently of every other unit.
//! Units never synchronize with each other; the store serializes their
//! mutations. A unit owns all writes for its task id and drives the record
//! forward through `Downloading` into a terminal state exactly once.

use crate::artifacts::ArtifactLocator;
use crate::engine::FetchEngine;
use crate::error::{EngineError, Result};
use crate::store::TaskStore;
use crate::types::{TaskId, TaskStatus, TaskUpdate};
use std::sync::Arc;

use super::AlbumDownloader;

impl AlbumDownloader {
    /// Spawn the background unit for a newly created task
    ///
    /// Returns immediately; the unit runs to a terminal state on its own.
    /// There is no cancellation — a submitted task always finishes or fails.
    pub(crate) fn spawn_download_task(
        &self,
        task_id: TaskId,
        album_id: String,
    ) -> tokio::task::JoinHandle<()> {
        let store = Arc::clone(&self.store);
        let engine = Arc::clone(&self.engine);
        let locator = self.locator.clone();

        tokio::spawn(async move {
            // Store failures are the only errors that can escape
            // run_download_task; they must not take down anything beyond
            // this unit.
            if let Err(e) = run_download_task(&store, &locator, &*engine, task_id, &album_id).await
            {
                tracing::error!(task_id = %task_id, error = %e, "task bookkeeping failed");
            }
        })
    }
}

/// Drive one task through its state machine
async fn run_download_task(
    store: &TaskStore,
    locator: &ArtifactLocator,
    engine: &dyn FetchEngine,
    task_id: TaskId,
    album_id: &str,
) -> Result<()> {
    store
        .update(
            task_id,
            TaskUpdate {
                status: Some(TaskStatus::Downloading),
                progress: Some(0.1),
                message: Some("download started".to_string()),
                ..Default::default()
            },
        )
        .await?;

    tracing::info!(task_id = %task_id, album_id, engine = engine.name(), "fetch starting");

    match engine.fetch(album_id).await {
        Ok(()) => finish_from_artifacts(store, locator, task_id, album_id).await,
        Err(e) => {
            tracing::warn!(task_id = %task_id, album_id, error = %e, "fetch failed");
            // Progress is left where it was, not reset
            store
                .update(
                    task_id,
                    TaskUpdate {
                        status: Some(TaskStatus::Failed),
                        error: Some(e.to_string()),
                        message: Some("download failed".to_string()),
                        ..Default::default()
                    },
                )
                .await
        }
    }
}

/// Decide the terminal state from what the engine actually left on disk
///
/// The engine returned successfully, but that alone proves nothing: look for
/// the compiled document first, then for a directory of page images, and
/// fail the task if neither is discoverable.
async fn finish_from_artifacts(
    store: &TaskStore,
    locator: &ArtifactLocator,
    task_id: TaskId,
    album_id: &str,
) -> Result<()> {
    if locator.find_document(album_id).await.is_some() {
        tracing::info!(task_id = %task_id, album_id, "download complete");
        return store
            .update(
                task_id,
                TaskUpdate {
                    status: Some(TaskStatus::Completed),
                    progress: Some(1.0),
                    message: Some("download complete".to_string()),
                    ..Default::default()
                },
            )
            .await;
    }

    let has_images = match locator.find_image_set(album_id).await {
        Some(dir) => !locator.list_images(&dir).await.is_empty(),
        None => false,
    };

    if has_images {
        tracing::info!(task_id = %task_id, album_id, "images downloaded, document pending");
        return store
            .update(
                task_id,
                TaskUpdate {
                    status: Some(TaskStatus::Completed),
                    progress: Some(1.0),
                    message: Some(
                        "images downloaded; document may still be generating".to_string(),
                    ),
                    ..Default::default()
                },
            )
            .await;
    }

    let error = EngineError::NoOutput {
        album_id: album_id.to_string(),
    };
    tracing::warn!(task_id = %task_id, album_id, "engine returned but produced no output");
    store
        .update(
            task_id,
            TaskUpdate {
                status: Some(TaskStatus::Failed),
                error: Some(error.to_string()),
                message: Some("no output found".to_string()),
                ..Default::default()
            },
        )
        .await
}
