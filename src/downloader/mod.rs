//! Core orchestrator implementation
//!
//! The `AlbumDownloader` struct and its methods are organized by concern:
//! - this module — construction and the read-side query operations
//! - [`tasks`] — background download unit execution

mod tasks;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
pub(crate) mod test_helpers;

use crate::artifacts::ArtifactLocator;
use crate::config::Config;
use crate::engine::{CommandFetchEngine, FetchEngine, UnconfiguredFetchEngine};
use crate::error::{Error, Result};
use crate::store::TaskStore;
use crate::types::{AlbumInfo, ImageFile, TaskId, TaskRecord};
use std::path::PathBuf;
use std::sync::Arc;

/// Main orchestrator instance
///
/// Accepts submissions, tracks each task through its state machine via the
/// [`TaskStore`], runs fetches on background units, and reconciles final
/// state against what the [`ArtifactLocator`] actually finds on disk. The
/// engine's own return value is never the sole evidence of success: its
/// file layout and naming are not fully specified, so completion is decided
/// by filesystem inspection.
pub struct AlbumDownloader {
    /// Durable task state — the single source of truth for progress reporting
    pub(crate) store: Arc<TaskStore>,
    /// Artifact discovery over the content root and document directory
    pub(crate) locator: ArtifactLocator,
    /// The external fetch engine (trait object for pluggable implementations)
    pub(crate) engine: Arc<dyn FetchEngine>,
    /// Configuration (wrapped in Arc for sharing across tasks)
    pub(crate) config: Arc<Config>,
}

impl AlbumDownloader {
    /// Create a new AlbumDownloader instance
    ///
    /// This initializes all core components:
    /// - Creates the content root and document directories if missing
    /// - Rehydrates task state from the configured state file
    /// - Builds the fetch engine from configuration, falling back to a
    ///   stand-in that fails every fetch when no command is configured
    pub async fn new(config: Config) -> Result<Self> {
        let engine: Arc<dyn FetchEngine> = match CommandFetchEngine::from_config(&config.engine) {
            Some(engine) => Arc::new(engine),
            None => {
                tracing::warn!(
                    "no fetch command configured; submissions will be accepted but every task will fail"
                );
                Arc::new(UnconfiguredFetchEngine)
            }
        };

        Self::with_engine(config, engine).await
    }

    /// Create an AlbumDownloader with an explicit engine implementation
    ///
    /// This is the injection seam for tests and for embedders that fetch
    /// through something other than an external command.
    pub async fn with_engine(config: Config, engine: Arc<dyn FetchEngine>) -> Result<Self> {
        tokio::fs::create_dir_all(&config.storage.content_root)
            .await
            .map_err(|e| {
                Error::Io(std::io::Error::new(
                    e.kind(),
                    format!(
                        "failed to create content root '{}': {}",
                        config.storage.content_root.display(),
                        e
                    ),
                ))
            })?;
        tokio::fs::create_dir_all(&config.storage.document_dir)
            .await
            .map_err(|e| {
                Error::Io(std::io::Error::new(
                    e.kind(),
                    format!(
                        "failed to create document directory '{}': {}",
                        config.storage.document_dir.display(),
                        e
                    ),
                ))
            })?;

        let store = Arc::new(TaskStore::open(&config.storage.tasks_file).await);
        let locator = ArtifactLocator::new(&config.storage);

        tracing::info!(
            engine = engine.name(),
            content_root = %config.storage.content_root.display(),
            "album downloader initialized"
        );

        Ok(Self {
            store,
            locator,
            engine,
            config: Arc::new(config),
        })
    }

    /// Submit a download for an album
    ///
    /// Generates a fresh task id, records the task as pending, schedules its
    /// background unit, and returns immediately — the caller polls
    /// [`task_status`](Self::task_status) for progress. Submission succeeds
    /// even when the fetch is doomed (engine unconfigured, album unknown);
    /// such failures surface through the task's status, never here.
    ///
    /// Submitting the same album twice produces two independent tasks.
    pub async fn submit(&self, album_id: &str) -> Result<TaskId> {
        let task_id = TaskId::generate();
        self.store
            .create(TaskRecord::new(task_id, album_id))
            .await?;

        tracing::info!(task_id = %task_id, album_id, "download task created");
        // The unit is intentionally detached; it runs to a terminal state
        // on its own and is observed only through the store
        let _ = self.spawn_download_task(task_id, album_id.to_string());

        Ok(task_id)
    }

    /// Look up the current state of a task
    ///
    /// Pure read; never blocks on the task's background unit. The returned
    /// record reflects the last completed mutation for that task.
    pub async fn task_status(&self, task_id: TaskId) -> Option<TaskRecord> {
        self.store.get(task_id).await
    }

    /// Resolve the compiled document for an album, if it exists on disk
    pub async fn resolve_document(&self, album_id: &str) -> Option<PathBuf> {
        self.locator.find_document(album_id).await
    }

    /// Resolve an album's image directory and its image descriptors
    ///
    /// Returns `None` when no qualifying directory exists. The descriptor
    /// list is sorted by path and re-read from disk on every call.
    pub async fn resolve_image_set(&self, album_id: &str) -> Option<(PathBuf, Vec<ImageFile>)> {
        let dir = self.locator.find_image_set(album_id).await?;
        let images = self.locator.list_images(&dir).await;
        Some((dir, images))
    }

    /// List every album discoverable on disk, with artifact flags
    pub async fn list_albums(&self) -> Vec<AlbumInfo> {
        self.locator.list_albums().await
    }

    /// Get the current configuration
    ///
    /// The configuration is wrapped in an Arc, so this is a cheap clone.
    pub fn get_config(&self) -> Arc<Config> {
        Arc::clone(&self.config)
    }

    /// Spawn the REST API server in a background task
    ///
    /// The server runs concurrently with download processing and listens on
    /// the configured bind address (default: 127.0.0.1:8000).
    pub fn spawn_api_server(self: &Arc<Self>) -> tokio::task::JoinHandle<Result<()>> {
        let downloader = Arc::clone(self);
        let config = Arc::clone(&self.config);

        tokio::spawn(async move { crate::api::start_api_server(downloader, config).await })
    }
}
