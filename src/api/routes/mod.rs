//! Route handlers for the REST API
//!
//! Handlers are organized by domain:
//! - [`downloads`] — Task submission and status polling
//! - [`albums`] — Artifact retrieval (documents, image sets, album listing)
//! - [`system`] — Root info, health, OpenAPI

use crate::types::{AlbumInfo, ImageFile, TaskId, TaskStatus};
use serde::{Deserialize, Serialize};

mod albums;
mod downloads;
mod system;

// Re-export all handlers so `routes::function_name` continues to work
pub use albums::*;
pub use downloads::*;
pub use system::*;

// ============================================================================
// Request/Response Types (shared across handlers)
// ============================================================================

/// Request body for POST /download/album
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct SubmitDownloadRequest {
    /// Identifier of the album to fetch
    pub album_id: String,
}

/// Response for POST /download/album
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct SubmitDownloadResponse {
    /// Identifier of the newly created task
    pub task_id: TaskId,
    /// The album the task will fetch
    pub album_id: String,
    /// Initial task status (always "pending")
    pub status: TaskStatus,
    /// Informational message
    pub message: String,
}

/// Response for GET /download/images/{album_id}
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct ImageListResponse {
    /// The album the images belong to
    pub album_id: String,
    /// Directory the image paths are relative to
    pub base_path: String,
    /// Image descriptors sorted by path
    pub images: Vec<ImageFile>,
    /// Number of images
    pub total: usize,
}

/// Response for GET /download/list
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct AlbumListResponse {
    /// Every album discoverable on disk
    pub albums: Vec<AlbumInfo>,
    /// Number of albums
    pub total: usize,
}
