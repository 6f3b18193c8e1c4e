//! REST API server module
//!
//! Exposes the download service over HTTP: submitting tasks, polling their
//! status, and retrieving the artifacts a finished task produced.

use crate::{AlbumDownloader, Config, Result};
use axum::{
    Router,
    http::HeaderValue,
    routing::{get, post},
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod error_response;
pub mod openapi;
pub mod routes;
pub mod state;

pub use openapi::ApiDoc;
pub use state::AppState;

/// Create the API router with all route definitions
///
/// # Routes
///
/// ## Downloads
/// - `POST /download/album` - Submit an album download task
/// - `GET /download/status/:task_id` - Poll task status
///
/// ## Albums
/// - `GET /download/result/:album_id` - Get the compiled document
/// - `GET /download/images/:album_id` - List an album's images
/// - `GET /download/image/:album_id/*image_path` - Get one image's bytes
/// - `GET /download/list` - List all albums discoverable on disk
///
/// ## System
/// - `GET /` - Service info
/// - `GET /health` - Health check
/// - `GET /openapi.json` - OpenAPI specification
/// - `GET /swagger-ui` - Interactive Swagger UI documentation (if enabled)
pub fn create_router(downloader: Arc<AlbumDownloader>, config: Arc<Config>) -> Router {
    let state = AppState::new(downloader, config.clone());

    let router = Router::new()
        // Downloads
        .route("/download/album", post(routes::submit_download))
        .route("/download/status/:task_id", get(routes::download_status))
        // Albums
        .route("/download/result/:album_id", get(routes::download_result))
        .route("/download/images/:album_id", get(routes::album_images))
        .route(
            "/download/image/:album_id/*image_path",
            get(routes::album_image),
        )
        .route("/download/list", get(routes::album_list))
        // System
        .route("/", get(routes::root_info))
        .route("/health", get(routes::health_check));

    // Merge Swagger UI routes if enabled in config (before applying state).
    // When Swagger UI is enabled it serves the spec at `/openapi.json` itself;
    // otherwise register the explicit handler so the spec is always available.
    // Registering both would declare `GET /openapi.json` twice and panic.
    let router = if config.api.swagger_ui {
        router.merge(SwaggerUi::new("/swagger-ui").url("/openapi.json", ApiDoc::openapi()))
    } else {
        router.route("/openapi.json", get(routes::openapi_spec))
    };

    let router = router.with_state(state);

    // Apply CORS middleware if enabled in config
    if config.api.cors_enabled {
        let cors = build_cors_layer(&config.api.cors_origins);
        router.layer(cors)
    } else {
        router
    }
}

/// Build a CORS layer based on configured origins
///
/// Origins may include "*" to allow any origin; otherwise only the listed
/// origins are allowed, with all methods and headers.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    let allow_any = origins.iter().any(|o| o == "*");

    if allow_any || origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let allowed: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();

        CorsLayer::new()
            .allow_origin(AllowOrigin::list(allowed))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

/// Start the API server on the configured bind address.
///
/// Creates a TCP listener, binds it to the configured address, and serves
/// the API router until the server stops.
///
/// # Example
///
/// ```no_run
/// use album_dl::{AlbumDownloader, Config};
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Arc::new(Config::default());
/// let downloader = Arc::new(AlbumDownloader::new((*config).clone()).await?);
///
/// // Start API server (blocks until shutdown)
/// album_dl::api::start_api_server(downloader, config).await?;
/// # Ok(())
/// # }
/// ```
pub async fn start_api_server(
    downloader: Arc<AlbumDownloader>,
    config: Arc<Config>,
) -> Result<()> {
    let bind_address = config.api.bind_address;

    tracing::info!(address = %bind_address, "starting API server");

    let app = create_router(downloader, config);

    let listener = TcpListener::bind(bind_address)
        .await
        .map_err(crate::error::Error::Io)?;

    tracing::info!(address = %bind_address, "API server listening");

    axum::serve(listener, app)
        .await
        .map_err(|e| crate::error::Error::ApiServerError(e.to_string()))?;

    tracing::info!("API server stopped");
    Ok(())
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;
