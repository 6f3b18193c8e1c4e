//! Configuration types for album-dl

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use utoipa::ToSchema;

/// Filesystem layout configuration (content root, document dir, task state)
///
/// Groups the paths the service reads and writes. The external engine writes
/// into `content_root` under its own naming; the compiled documents land in
/// `document_dir`; task state persists to `tasks_file`.
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct StorageConfig {
    /// Directory the engine downloads album content into (default: "./content")
    #[serde(default = "default_content_root")]
    #[schema(value_type = String)]
    pub content_root: PathBuf,

    /// Directory compiled documents are written to (default: "./documents")
    #[serde(default = "default_document_dir")]
    #[schema(value_type = String)]
    pub document_dir: PathBuf,

    /// Path of the durable task state file (default: "./tasks.json")
    #[serde(default = "default_tasks_file")]
    #[schema(value_type = String)]
    pub tasks_file: PathBuf,

    /// File extensions recognized as page images (default: ["jpg", "png"])
    #[serde(default = "default_image_extensions")]
    pub image_extensions: Vec<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            content_root: default_content_root(),
            document_dir: default_document_dir(),
            tasks_file: default_tasks_file(),
            image_extensions: default_image_extensions(),
        }
    }
}

/// External fetch engine configuration
///
/// The engine is an external program invoked once per task with the album id
/// as its final argument. When `command` is unset, submissions are still
/// accepted but every task fails with an "engine not configured" error.
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct EngineConfig {
    /// Path of the fetch program (None = no engine available)
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub command: Option<PathBuf>,

    /// Arguments passed before the album id
    #[serde(default)]
    pub args: Vec<String>,
}

/// REST API configuration
///
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiConfig {
    /// Address the API server binds to (default: 127.0.0.1:8000)
    #[serde(default = "default_bind_address")]
    #[schema(value_type = String)]
    pub bind_address: SocketAddr,

    /// Whether to add CORS headers to responses (default: true)
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// Allowed CORS origins; "*" allows any origin (default: ["*"])
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// Whether to serve interactive Swagger UI at /swagger-ui (default: true)
    #[serde(default = "default_true")]
    pub swagger_ui: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            cors_enabled: true,
            cors_origins: default_cors_origins(),
            swagger_ui: true,
        }
    }
}

/// Main configuration for [`AlbumDownloader`](crate::AlbumDownloader)
///
/// Fields are organized into logical sub-configs:
/// - [`storage`](StorageConfig) — filesystem layout and recognized image types
/// - [`engine`](EngineConfig) — the external fetch program
/// - [`api`](ApiConfig) — REST server settings
///
/// The library never reads configuration files or environment variables
/// itself; the embedder constructs this struct (or deserializes it from
/// whatever source it likes) and passes it in at startup.
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct Config {
    /// Filesystem layout settings
    #[serde(default)]
    pub storage: StorageConfig,

    /// External fetch engine settings
    #[serde(default)]
    pub engine: EngineConfig,

    /// REST API settings
    #[serde(default)]
    pub api: ApiConfig,
}

// Convenience accessors — keep call sites short without reaching through
// the sub-config structs.
impl Config {
    /// Directory the engine downloads album content into
    pub fn content_root(&self) -> &PathBuf {
        &self.storage.content_root
    }

    /// Directory compiled documents are written to
    pub fn document_dir(&self) -> &PathBuf {
        &self.storage.document_dir
    }
}

fn default_content_root() -> PathBuf {
    PathBuf::from("./content")
}

fn default_document_dir() -> PathBuf {
    PathBuf::from("./documents")
}

fn default_tasks_file() -> PathBuf {
    PathBuf::from("./tasks.json")
}

fn default_image_extensions() -> Vec<String> {
    vec!["jpg".to_string(), "png".to_string()]
}

fn default_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8000))
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}

fn default_true() -> bool {
    true
}
