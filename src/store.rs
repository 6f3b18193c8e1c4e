//! Durable task state store
//!
//! The store is the single source of truth for progress reporting. It keeps
//! the full task table in memory behind one async mutex and rewrites the
//! whole table to a JSON file on every mutation, so a status query always
//! reflects the last completed mutation. Persistence is best-effort: a
//! failed save is logged and the in-memory state stays authoritative until
//! the next successful save.

use crate::error::{Error, PersistenceError, Result, TaskError};
use crate::types::{TaskId, TaskRecord, TaskUpdate};
use chrono::Utc;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// Durable keyed store of [`TaskRecord`]s
///
/// All mutation goes through one mutex, which both serializes writers (two
/// background units finishing at the same time cannot lose each other's
/// update) and orders each save after the in-memory change it persists.
pub struct TaskStore {
    path: PathBuf,
    tasks: Mutex<HashMap<TaskId, TaskRecord>>,
}

impl TaskStore {
    /// Open the store backed by the given file, rehydrating any saved state
    ///
    /// A missing file means an empty task set. Malformed content is discarded
    /// with a warning rather than propagated — a corrupt state file must
    /// never prevent the service from starting.
    pub async fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let tasks = match load_tasks(&path).await {
            Ok(tasks) => tasks,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "discarding unreadable task state");
                HashMap::new()
            }
        };

        if !tasks.is_empty() {
            tracing::info!(path = %path.display(), count = tasks.len(), "rehydrated task state");
        }

        Self {
            path,
            tasks: Mutex::new(tasks),
        }
    }

    /// Insert a new record keyed by its task id
    ///
    /// Fails with [`TaskError::Duplicate`] if the id already exists. Given
    /// random id generation this should not happen in practice.
    pub async fn create(&self, record: TaskRecord) -> Result<()> {
        let mut tasks = self.tasks.lock().await;
        let id = record.task_id;
        if tasks.contains_key(&id) {
            return Err(Error::Task(TaskError::Duplicate { id }));
        }
        tasks.insert(id, record);
        self.persist(&tasks).await;
        Ok(())
    }

    /// Merge partial fields into an existing record and persist
    ///
    /// Refreshes `updated_at` on every merge. Fails with
    /// [`TaskError::NotFound`] for unknown ids, [`TaskError::Finished`] when
    /// the record is already terminal, and [`TaskError::InvalidTransition`]
    /// for status changes the state machine forbids.
    pub async fn update(&self, id: TaskId, update: TaskUpdate) -> Result<()> {
        let mut tasks = self.tasks.lock().await;
        let record = tasks
            .get_mut(&id)
            .ok_or(Error::Task(TaskError::NotFound { id }))?;

        if record.status.is_terminal() {
            return Err(Error::Task(TaskError::Finished {
                id,
                status: record.status,
            }));
        }

        if let Some(next) = update.status
            && next != record.status
        {
            if !record.status.can_transition_to(next) {
                return Err(Error::Task(TaskError::InvalidTransition {
                    id,
                    from: record.status,
                    to: next,
                }));
            }
            record.status = next;
        }

        if let Some(progress) = update.progress {
            record.progress = progress;
        }
        if let Some(message) = update.message {
            record.message = Some(message);
        }
        if let Some(error) = update.error {
            record.error = Some(error);
        }
        if let Some(current_image) = update.current_image {
            record.current_image = Some(current_image);
        }
        if let Some(total_images) = update.total_images {
            record.total_images = Some(total_images);
        }
        record.updated_at = Utc::now();

        self.persist(&tasks).await;
        Ok(())
    }

    /// Look up a record by task id
    pub async fn get(&self, id: TaskId) -> Option<TaskRecord> {
        self.tasks.lock().await.get(&id).cloned()
    }

    /// Write the full table to disk; log and carry on if the write fails
    async fn persist(&self, tasks: &HashMap<TaskId, TaskRecord>) {
        if let Err(e) = save_tasks(&self.path, tasks).await {
            tracing::warn!(
                path = %self.path.display(),
                error = %e,
                "failed to save task state; in-memory state remains authoritative"
            );
        }
    }
}

async fn load_tasks(
    path: &Path,
) -> std::result::Result<HashMap<TaskId, TaskRecord>, PersistenceError> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        // No file yet is the normal first start, not an error
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HashMap::new()),
        Err(e) => return Err(PersistenceError::LoadFailed(e.to_string())),
    };

    serde_json::from_slice(&bytes).map_err(|e| PersistenceError::LoadFailed(e.to_string()))
}

/// Rewrite the whole table: serialize, write a sibling temp file, rename.
///
/// The rename keeps the on-disk file whole even if the process dies
/// mid-write.
async fn save_tasks(
    path: &Path,
    tasks: &HashMap<TaskId, TaskRecord>,
) -> std::result::Result<(), PersistenceError> {
    let json = serde_json::to_vec_pretty(tasks)
        .map_err(|e| PersistenceError::SaveFailed(e.to_string()))?;

    let tmp = path.with_extension("tmp");
    tokio::fs::write(&tmp, &json)
        .await
        .map_err(|e| PersistenceError::SaveFailed(e.to_string()))?;
    tokio::fs::rename(&tmp, path)
        .await
        .map_err(|e| PersistenceError::SaveFailed(e.to_string()))?;

    Ok(())
}
