//! Artifact retrieval handlers: documents, image sets, album listing.

use super::{AlbumListResponse, ImageListResponse};
use crate::api::AppState;
use crate::artifacts::{DOCUMENT_EXTENSION, media_type};
use crate::error::ApiError;
use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use std::path::{Component, PathBuf};

/// GET /download/result/{album_id} - Get the compiled document
#[utoipa::path(
    get,
    path = "/download/result/{album_id}",
    tag = "albums",
    params(
        ("album_id" = String, Path, description = "Album identifier")
    ),
    responses(
        (status = 200, description = "Document bytes", content_type = "application/pdf"),
        (status = 404, description = "Document not found", body = crate::error::ApiError)
    )
)]
pub async fn download_result(
    State(state): State<AppState>,
    Path(album_id): Path<String>,
) -> Response {
    let Some(path) = state.downloader.resolve_document(&album_id).await else {
        return not_found(format!("document for album {album_id}"));
    };

    match tokio::fs::read(&path).await {
        Ok(bytes) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "application/pdf".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{album_id}.{DOCUMENT_EXTENSION}\""),
                ),
            ],
            bytes,
        )
            .into_response(),
        Err(e) => {
            // The file disappeared between the exists-check and the read
            tracing::warn!(album_id = %album_id, path = %path.display(), error = %e, "document read failed");
            not_found(format!("document for album {album_id}"))
        }
    }
}

/// GET /download/images/{album_id} - List an album's images
#[utoipa::path(
    get,
    path = "/download/images/{album_id}",
    tag = "albums",
    params(
        ("album_id" = String, Path, description = "Album identifier")
    ),
    responses(
        (status = 200, description = "Image descriptors sorted by path", body = ImageListResponse),
        (status = 404, description = "No image directory for this album", body = crate::error::ApiError)
    )
)]
pub async fn album_images(State(state): State<AppState>, Path(album_id): Path<String>) -> Response {
    match state.downloader.resolve_image_set(&album_id).await {
        Some((dir, images)) => {
            let total = images.len();
            (
                StatusCode::OK,
                Json(ImageListResponse {
                    album_id,
                    base_path: dir.display().to_string(),
                    images,
                    total,
                }),
            )
                .into_response()
        }
        None => not_found(format!("images for album {album_id}")),
    }
}

/// GET /download/image/{album_id}/{image_path} - Get one image's bytes
#[utoipa::path(
    get,
    path = "/download/image/{album_id}/{image_path}",
    tag = "albums",
    params(
        ("album_id" = String, Path, description = "Album identifier"),
        ("image_path" = String, Path, description = "Image path relative to the album directory")
    ),
    responses(
        (status = 200, description = "Image bytes with media type from the file extension"),
        (status = 404, description = "Album or image not found", body = crate::error::ApiError)
    )
)]
pub async fn album_image(
    State(state): State<AppState>,
    Path((album_id, image_path)): Path<(String, String)>,
) -> Response {
    let Some((dir, _)) = state.downloader.resolve_image_set(&album_id).await else {
        return not_found(format!("images for album {album_id}"));
    };

    // Only plain relative components may reach under the album directory
    let relative = PathBuf::from(&image_path);
    let escapes = relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_)));
    if escapes {
        return not_found(format!("image {image_path}"));
    }

    let full_path = dir.join(&relative);
    let is_file = tokio::fs::metadata(&full_path)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false);
    if !is_file {
        return not_found(format!("image {image_path}"));
    }

    match tokio::fs::read(&full_path).await {
        Ok(bytes) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, media_type(&full_path).to_string())],
            bytes,
        )
            .into_response(),
        Err(e) => {
            tracing::warn!(album_id = %album_id, image_path = %image_path, error = %e, "image read failed");
            not_found(format!("image {image_path}"))
        }
    }
}

/// GET /download/list - List all albums discoverable on disk
#[utoipa::path(
    get,
    path = "/download/list",
    tag = "albums",
    responses(
        (status = 200, description = "Albums with artifact flags", body = AlbumListResponse)
    )
)]
pub async fn album_list(State(state): State<AppState>) -> Response {
    let albums = state.downloader.list_albums().await;
    let total = albums.len();
    (StatusCode::OK, Json(AlbumListResponse { albums, total })).into_response()
}

fn not_found(resource: String) -> Response {
    (StatusCode::NOT_FOUND, Json(ApiError::not_found(resource))).into_response()
}
