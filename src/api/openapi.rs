//! OpenAPI documentation and schema generation
//!
//! This module defines the OpenAPI specification for the album-dl REST API
//! using utoipa for compile-time spec generation.

use utoipa::OpenApi;

/// OpenAPI documentation for the album-dl REST API
///
/// The spec can be accessed via:
/// - `/openapi.json` - JSON format OpenAPI specification
/// - `/swagger-ui` - Interactive Swagger UI documentation (if enabled)
#[derive(OpenApi)]
#[openapi(
    info(
        title = "album-dl REST API",
        version = "0.1.0",
        description = "REST API for submitting album downloads, polling task status, and retrieving the resulting artifacts",
        license(
            name = "MIT OR Apache-2.0"
        )
    ),
    servers(
        (url = "http://localhost:8000", description = "Local development server")
    ),
    paths(
        // Downloads
        crate::api::routes::submit_download,
        crate::api::routes::download_status,

        // Albums
        crate::api::routes::download_result,
        crate::api::routes::album_images,
        crate::api::routes::album_image,
        crate::api::routes::album_list,

        // System
        crate::api::routes::root_info,
        crate::api::routes::health_check,
        crate::api::routes::openapi_spec,
    ),
    components(schemas(
        // Core types from types.rs
        crate::types::TaskId,
        crate::types::TaskStatus,
        crate::types::TaskRecord,
        crate::types::ImageFile,
        crate::types::AlbumInfo,

        // Config types from config.rs
        crate::config::Config,
        crate::config::StorageConfig,
        crate::config::EngineConfig,
        crate::config::ApiConfig,

        // API request/response types from routes
        crate::api::routes::SubmitDownloadRequest,
        crate::api::routes::SubmitDownloadResponse,
        crate::api::routes::ImageListResponse,
        crate::api::routes::AlbumListResponse,

        // Error types from error.rs
        crate::error::ApiError,
        crate::error::ErrorDetail,
    )),
    tags(
        (name = "downloads", description = "Task submission and status polling"),
        (name = "albums", description = "Artifact retrieval"),
        (name = "system", description = "Service info and health")
    )
)]
pub struct ApiDoc;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::OpenApi;

    #[test]
    fn test_spec_contains_all_download_paths() {
        let spec = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let paths = spec["paths"].as_object().unwrap();

        for expected in [
            "/download/album",
            "/download/status/{task_id}",
            "/download/result/{album_id}",
            "/download/images/{album_id}",
            "/download/image/{album_id}/{image_path}",
            "/download/list",
            "/health",
        ] {
            assert!(paths.contains_key(expected), "missing path {expected}");
        }
    }

    #[test]
    fn test_spec_contains_core_schemas() {
        let spec = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let schemas = spec["components"]["schemas"].as_object().unwrap();

        for expected in ["TaskRecord", "TaskStatus", "AlbumInfo", "ApiError"] {
            assert!(schemas.contains_key(expected), "missing schema {expected}");
        }
    }
}
