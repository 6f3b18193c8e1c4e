//! Task submission and status handlers.

use super::{SubmitDownloadRequest, SubmitDownloadResponse};
use crate::api::AppState;
use crate::error::ApiError;
use crate::types::TaskId;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// POST /download/album - Submit an album download task
#[utoipa::path(
    post,
    path = "/download/album",
    tag = "downloads",
    request_body = SubmitDownloadRequest,
    responses(
        (status = 200, description = "Task created", body = SubmitDownloadResponse),
        (status = 500, description = "Internal server error", body = crate::error::ApiError)
    )
)]
pub async fn submit_download(
    State(state): State<AppState>,
    Json(request): Json<SubmitDownloadRequest>,
) -> Response {
    match state.downloader.submit(&request.album_id).await {
        Ok(task_id) => (
            StatusCode::OK,
            Json(SubmitDownloadResponse {
                task_id,
                album_id: request.album_id,
                // The record is created pending; the background unit may
                // advance it at any moment after this response is built
                status: crate::types::TaskStatus::Pending,
                message: "download task created".to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(album_id = %request.album_id, error = %e, "failed to create task");
            e.into_response()
        }
    }
}

/// GET /download/status/{task_id} - Get task status
#[utoipa::path(
    get,
    path = "/download/status/{task_id}",
    tag = "downloads",
    params(
        ("task_id" = String, Path, description = "Task ID returned at submission")
    ),
    responses(
        (status = 200, description = "Current task record", body = crate::types::TaskRecord),
        (status = 404, description = "Task not found", body = crate::error::ApiError)
    )
)]
pub async fn download_status(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> Response {
    // An unparseable id denotes no task, which is the same not-found
    // outcome as an unknown one
    let Ok(task_id) = task_id.parse::<TaskId>() else {
        return (
            StatusCode::NOT_FOUND,
            Json(ApiError::new("task_not_found", format!("task {task_id} not found"))),
        )
            .into_response();
    };

    match state.downloader.task_status(task_id).await {
        Some(record) => (StatusCode::OK, Json(record)).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(ApiError::new("task_not_found", format!("task {task_id} not found"))),
        )
            .into_response(),
    }
}
