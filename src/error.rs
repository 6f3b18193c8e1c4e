//! Error types for album-dl
//!
//! This module provides error handling for the library, including:
//! - Domain-specific error types (Task, Engine, Persistence)
//! - HTTP status code mapping for API integration
//! - Structured error responses with machine-readable error codes

use crate::types::{TaskId, TaskStatus};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Result type alias for album-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for album-dl
///
/// This is the primary error type used throughout the library. Each variant
/// includes contextual information to help diagnose issues.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "engine.command")
        key: Option<String>,
    },

    /// Task bookkeeping error
    #[error("task error: {0}")]
    Task(#[from] TaskError),

    /// External fetch engine error
    #[error("engine error: {0}")]
    Engine(#[from] EngineError),

    /// Durable task-state read/write error
    #[error("persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Requested resource (artifact, album, file) does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// API server error
    #[error("API server error: {0}")]
    ApiServerError(String),
}

/// Task-related errors
#[derive(Debug, Error)]
pub enum TaskError {
    /// Task not found in the store
    #[error("task {id} not found")]
    NotFound {
        /// The task id that was not found
        id: TaskId,
    },

    /// A record with this id already exists
    #[error("task {id} already exists")]
    Duplicate {
        /// The task id that collided
        id: TaskId,
    },

    /// The task already reached a terminal state and cannot change
    #[error("task {id} is already {status} and can no longer change")]
    Finished {
        /// The task id that was mutated after finishing
        id: TaskId,
        /// The terminal status the task is in
        status: TaskStatus,
    },

    /// The requested status change is not a legal state-machine transition
    #[error("task {id} cannot move from {from} to {to}")]
    InvalidTransition {
        /// The task id the transition was requested for
        id: TaskId,
        /// The task's current status
        from: TaskStatus,
        /// The requested status
        to: TaskStatus,
    },
}

/// External fetch engine errors
#[derive(Debug, Error)]
pub enum EngineError {
    /// The engine raised while fetching; the cause is whatever it reported
    #[error("fetch failed for album {album_id}: {cause}")]
    FetchFailed {
        /// The album the fetch was for
        album_id: String,
        /// The engine's failure description
        cause: String,
    },

    /// The engine returned successfully but left nothing discoverable on disk
    #[error("no output found for album {album_id}")]
    NoOutput {
        /// The album the fetch was for
        album_id: String,
    },

    /// No fetch command is configured; downloads cannot run
    #[error("no fetch engine configured")]
    NotConfigured,
}

/// Durable-store errors
///
/// These are best-effort by design: a load failure degrades the store to
/// empty, and a save failure leaves the in-memory state authoritative until
/// the next successful save.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Failed to read or parse the task state file
    #[error("failed to load task state: {0}")]
    LoadFailed(String),

    /// Failed to write the task state file
    #[error("failed to save task state: {0}")]
    SaveFailed(String),
}

/// API error response format
///
/// This structure is returned by API endpoints when an error occurs.
/// It follows a standard format with machine-readable error codes,
/// human-readable messages, and optional contextual details.
///
/// # Example JSON Response
///
/// ```json
/// {
///   "error": {
///     "code": "task_not_found",
///     "message": "task 6f4c… not found",
///     "details": {
///       "task_id": "6f4c…"
///     }
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// The error details
    pub error: ErrorDetail,
}

/// Detailed error information for API responses
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "not_found", "engine_failure")
    ///
    /// Clients can use this for programmatic error handling.
    pub code: String,

    /// Human-readable error message
    ///
    /// This is suitable for displaying to end users.
    pub message: String,

    /// Optional additional context about the error
    ///
    /// This can include fields like task_id, album_id, file paths, etc.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    /// Create a new API error with code and message
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
                details: None,
            },
        }
    }

    /// Create an API error with additional details
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
                details: Some(details),
            },
        }
    }

    /// Create a "not found" error
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new("not_found", format!("{} not found", resource.into()))
    }

    /// Create a "validation error" error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new("validation_error", message)
    }

    /// Create an "internal server error"
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new("internal_error", message)
    }
}

/// Convert errors to HTTP status codes for API responses
///
/// This trait maps domain errors to appropriate HTTP status codes.
pub trait ToHttpStatus {
    /// Get the HTTP status code for this error
    fn status_code(&self) -> u16;

    /// Get the machine-readable error code
    fn error_code(&self) -> &str;
}

impl ToHttpStatus for Error {
    fn status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - Client error (invalid input)
            Error::Config { .. } => 400,

            // 404 Not Found
            Error::NotFound(_) => 404,
            Error::Task(TaskError::NotFound { .. }) => 404,

            // 409 Conflict - Resource already exists or is in the wrong state
            Error::Task(TaskError::Duplicate { .. }) => 409,
            Error::Task(TaskError::Finished { .. }) => 409,
            Error::Task(TaskError::InvalidTransition { .. }) => 409,

            // 502 Bad Gateway - The external engine misbehaved
            Error::Engine(EngineError::FetchFailed { .. }) => 502,
            Error::Engine(EngineError::NoOutput { .. }) => 502,

            // 503 Service Unavailable - No engine to run fetches with
            Error::Engine(EngineError::NotConfigured) => 503,

            // 500 Internal Server Error - Server-side issues
            Error::Persistence(_) => 500,
            Error::Io(_) => 500,
            Error::Serialization(_) => 500,
            Error::ApiServerError(_) => 500,
        }
    }

    fn error_code(&self) -> &str {
        match self {
            Error::Config { .. } => "config_error",
            Error::Task(e) => match e {
                TaskError::NotFound { .. } => "task_not_found",
                TaskError::Duplicate { .. } => "duplicate_task",
                TaskError::Finished { .. } => "task_finished",
                TaskError::InvalidTransition { .. } => "invalid_transition",
            },
            Error::Engine(e) => match e {
                EngineError::FetchFailed { .. } => "engine_failure",
                EngineError::NoOutput { .. } => "no_output_found",
                EngineError::NotConfigured => "engine_not_configured",
            },
            Error::Persistence(_) => "persistence_error",
            Error::Io(_) => "io_error",
            Error::Serialization(_) => "serialization_error",
            Error::NotFound(_) => "not_found",
            Error::ApiServerError(_) => "api_server_error",
        }
    }
}

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        let code = error.error_code().to_string();
        let message = error.to_string();

        // Add contextual details for specific error types
        let details = match &error {
            Error::Task(TaskError::NotFound { id }) => Some(serde_json::json!({
                "task_id": id,
            })),
            Error::Task(TaskError::Duplicate { id }) => Some(serde_json::json!({
                "task_id": id,
            })),
            Error::Task(TaskError::Finished { id, status }) => Some(serde_json::json!({
                "task_id": id,
                "status": status,
            })),
            Error::Task(TaskError::InvalidTransition { id, from, to }) => {
                Some(serde_json::json!({
                    "task_id": id,
                    "from": from,
                    "to": to,
                }))
            }
            Error::Engine(EngineError::FetchFailed { album_id, .. }) => {
                Some(serde_json::json!({
                    "album_id": album_id,
                }))
            }
            Error::Engine(EngineError::NoOutput { album_id }) => Some(serde_json::json!({
                "album_id": album_id,
            })),
            _ => None,
        };

        ApiError {
            error: ErrorDetail {
                code,
                message,
                details,
            },
        }
    }
}
