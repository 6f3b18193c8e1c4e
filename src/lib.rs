//! # album-dl
//!
//! Backend library for album download services.
//!
//! Clients submit "download this album" requests; an external, opaque fetch
//! engine does the slow work of walking the remote source and writing files
//! to disk; this crate orchestrates the tasks around it — creating jobs,
//! running them off the request path, persisting their progress, and
//! locating whatever artifacts the engine actually produced.
//!
//! ## Design Philosophy
//!
//! - **Trust the filesystem, not the engine** - Completion is decided by
//!   inspecting disk output, because the engine's layout and naming are not
//!   fully specified by its own contract
//! - **Forward-only tasks** - Every task moves through
//!   `pending → downloading → {completed, failed}` and never backward
//! - **Library-first** - No CLI or UI; the embedder supplies a [`Config`]
//!   and spawns the REST server
//!
//! ## Quick Start
//!
//! ```no_run
//! use album_dl::{AlbumDownloader, Config};
//! use std::path::PathBuf;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut config = Config::default();
//!     config.engine.command = Some(PathBuf::from("/usr/local/bin/fetch-album"));
//!
//!     let downloader = Arc::new(AlbumDownloader::new(config).await?);
//!
//!     // Serve the REST API and submit a download directly
//!     let api = downloader.spawn_api_server();
//!     let task_id = downloader.submit("412516").await?;
//!     println!("submitted {task_id}");
//!
//!     api.await??;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// REST API module
pub mod api;
/// Artifact discovery on the content filesystem
pub mod artifacts;
/// Configuration types
pub mod config;
/// Core orchestrator implementation
pub mod downloader;
/// External fetch engine boundary
pub mod engine;
/// Error types
pub mod error;
/// Durable task state store
pub mod store;
/// Core types
pub mod types;

// Re-export commonly used types
pub use artifacts::ArtifactLocator;
pub use config::{ApiConfig, Config, EngineConfig, StorageConfig};
pub use downloader::AlbumDownloader;
pub use engine::{CommandFetchEngine, FetchEngine, UnconfiguredFetchEngine};
pub use error::{
    ApiError, EngineError, Error, ErrorDetail, PersistenceError, Result, TaskError, ToHttpStatus,
};
pub use store::TaskStore;
pub use types::{AlbumInfo, ImageFile, TaskId, TaskRecord, TaskStatus, TaskUpdate};
