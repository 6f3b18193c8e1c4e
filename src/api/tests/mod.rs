use super::*;
use crate::downloader::test_helpers::{
    DocumentWritingEngine, FailingEngine, ImageWritingEngine, SilentEngine, create_test_downloader,
    test_config, wait_for_terminal,
};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use std::time::Duration;
use tower::ServiceExt;


/// Build a router over a test downloader with the given engine
async fn create_test_app(
    engine: Arc<dyn crate::engine::FetchEngine>,
) -> (Router, Arc<AlbumDownloader>, tempfile::TempDir) {
    let (downloader, temp_dir) = create_test_downloader(engine).await;
    let config = downloader.get_config();
    let app = create_router(downloader.clone(), config);
    (app, downloader, temp_dir)
}

/// Issue a GET against the router and return (status, parsed JSON body)
async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

#[tokio::test]
async fn test_cors_headers_present_when_enabled() {
    let (downloader, _temp_dir) = create_test_downloader(Arc::new(SilentEngine)).await;

    let mut config = (*downloader.get_config()).clone();
    config.api.cors_enabled = true;
    config.api.cors_origins = vec!["*".to_string()];
    let app = create_router(downloader, Arc::new(config));

    let request = Request::builder()
        .uri("/health")
        .header("Origin", "http://localhost:3000")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response
            .headers()
            .contains_key("access-control-allow-origin"),
        "CORS header should be present when CORS is enabled"
    );
}

#[tokio::test]
async fn test_cors_headers_absent_when_disabled() {
    let (downloader, _temp_dir) = create_test_downloader(Arc::new(SilentEngine)).await;

    let mut config = (*downloader.get_config()).clone();
    config.api.cors_enabled = false;
    let app = create_router(downloader, Arc::new(config));

    let request = Request::builder()
        .uri("/health")
        .header("Origin", "http://localhost:3000")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        !response
            .headers()
            .contains_key("access-control-allow-origin")
    );
}

#[tokio::test]
async fn test_server_starts_and_responds_over_http() {
    let (downloader, _temp_dir) = create_test_downloader(Arc::new(SilentEngine)).await;

    // Bind to a random available port (port 0)
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let mut config = (*downloader.get_config()).clone();
    config.api.bind_address = addr;
    let config = Arc::new(config);

    let server_handle = tokio::spawn({
        let downloader = downloader.clone();
        let config = config.clone();
        async move {
            let app = create_router(downloader, config);
            axum::serve(listener, app).await.unwrap();
        }
    });

    // Give the server a moment to start
    tokio::time::sleep(Duration::from_millis(100)).await;

    let client = reqwest::Client::new();
    let response = client
        .get(format!("http://{addr}/health"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let body = response.json::<serde_json::Value>().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));

    server_handle.abort();
}
