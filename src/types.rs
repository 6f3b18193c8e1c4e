//! Core types for album-dl

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use utoipa::ToSchema;
use uuid::Uuid;

/// Unique identifier for a download task
///
/// Generated at submission time and never reused. Wraps a v4 UUID so that
/// identifiers are opaque and collision-free without any central counter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct TaskId(pub Uuid);

impl TaskId {
    /// Generate a fresh random task id
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the inner UUID value
    pub fn get(&self) -> Uuid {
        self.0
    }
}

impl From<Uuid> for TaskId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for TaskId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

/// Download task status
///
/// Tasks move strictly forward: `Pending → Downloading → {Completed, Failed}`.
/// No transition leaves a terminal state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Created and waiting for its background unit to start
    Pending,
    /// The fetch engine is running
    Downloading,
    /// Output was found on disk
    Completed,
    /// The engine failed or produced no discoverable output
    Failed,
}

impl TaskStatus {
    /// Whether this status is terminal (no further transitions allowed)
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Failed)
    }

    /// Whether the state machine permits moving from `self` to `next`
    pub fn can_transition_to(&self, next: TaskStatus) -> bool {
        matches!(
            (self, next),
            (TaskStatus::Pending, TaskStatus::Downloading)
                | (TaskStatus::Downloading, TaskStatus::Completed)
                | (TaskStatus::Downloading, TaskStatus::Failed)
        )
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Downloading => "downloading",
            TaskStatus::Completed => "completed",
            TaskStatus::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// One submitted download job, tracked from submission to completion
///
/// This is both the durable representation in the task state file and the
/// view returned by the status API.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TaskRecord {
    /// Unique task identifier (primary key)
    pub task_id: TaskId,

    /// Caller-supplied album identifier; not unique across tasks
    pub album_id: String,

    /// Current position in the task state machine
    pub status: TaskStatus,

    /// Coarse progress in `[0.0, 1.0]`, non-decreasing over the task's life
    pub progress: f64,

    /// Latest informational message, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Latest error description, set when the task fails
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Index of the image currently being fetched (reserved, may stay unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_image: Option<u32>,

    /// Total number of images in the album (reserved, may stay unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_images: Option<u32>,

    /// When the task was submitted
    pub created_at: DateTime<Utc>,

    /// When the task was last mutated
    pub updated_at: DateTime<Utc>,
}

impl TaskRecord {
    /// Create a fresh pending record for a newly submitted task
    pub fn new(task_id: TaskId, album_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            task_id,
            album_id: album_id.into(),
            status: TaskStatus::Pending,
            progress: 0.0,
            message: None,
            error: None,
            current_image: None,
            total_images: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update merged into an existing [`TaskRecord`]
///
/// `None` fields are left unchanged; set fields replace the current value
/// (latest-wins for `message` and `error`). `updated_at` is refreshed by the
/// store on every merge.
#[derive(Clone, Debug, Default)]
pub struct TaskUpdate {
    /// New status; must be a legal transition from the current one
    pub status: Option<TaskStatus>,
    /// New progress value
    pub progress: Option<f64>,
    /// New informational message
    pub message: Option<String>,
    /// New error description
    pub error: Option<String>,
    /// New current-image counter
    pub current_image: Option<u32>,
    /// New total-image counter
    pub total_images: Option<u32>,
}

/// Descriptor for one image file inside an album directory
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ImageFile {
    /// File name, without any directory components
    pub name: String,

    /// Path relative to the album directory
    #[schema(value_type = String)]
    pub path: PathBuf,
}

/// One album discoverable on disk, with flags for each artifact kind
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AlbumInfo {
    /// Album identifier derived from the artifact's file or directory name
    pub album_id: String,

    /// Whether a compiled document exists for this album
    pub has_pdf: bool,

    /// Whether a directory of page images exists for this album
    pub has_images: bool,
}
