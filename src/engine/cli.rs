//! Fetch engine backed by an external command

use super::FetchEngine;
use crate::config::EngineConfig;
use crate::error::EngineError;
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::process::Command;

/// Fetch engine that runs a configured external program
///
/// The program is invoked once per fetch with the configured arguments
/// followed by the album id, and the call resolves when the process exits.
/// A non-zero exit status or a spawn failure becomes
/// [`EngineError::FetchFailed`] carrying the tail of stderr as the cause.
///
/// # Examples
///
/// ```no_run
/// use album_dl::engine::{CommandFetchEngine, FetchEngine};
/// use std::path::PathBuf;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let engine = CommandFetchEngine::new(
///     PathBuf::from("/usr/local/bin/fetch-album"),
///     vec!["--dest".to_string(), "/srv/content".to_string()],
/// );
/// engine.fetch("412516").await?;
/// # Ok(())
/// # }
/// ```
pub struct CommandFetchEngine {
    program: PathBuf,
    args: Vec<String>,
}

impl CommandFetchEngine {
    /// Create an engine around an explicit program path and leading args
    pub fn new(program: PathBuf, args: Vec<String>) -> Self {
        Self { program, args }
    }

    /// Build an engine from configuration, if a command is configured
    pub fn from_config(config: &EngineConfig) -> Option<Self> {
        config
            .command
            .clone()
            .map(|program| Self::new(program, config.args.clone()))
    }
}

#[async_trait]
impl FetchEngine for CommandFetchEngine {
    fn name(&self) -> &str {
        "command"
    }

    async fn fetch(&self, album_id: &str) -> Result<(), EngineError> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(album_id)
            .output()
            .await
            .map_err(|e| EngineError::FetchFailed {
                album_id: album_id.to_string(),
                cause: format!("failed to execute {}: {}", self.program.display(), e),
            })?;

        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let cause = match stderr.trim().lines().last() {
            Some(line) if !line.is_empty() => format!("{}: {}", output.status, line),
            _ => output.status.to_string(),
        };
        Err(EngineError::FetchFailed {
            album_id: album_id.to_string(),
            cause,
        })
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fetch_with_invalid_program_path() {
        let engine =
            CommandFetchEngine::new(PathBuf::from("/nonexistent/path/to/fetch-album"), vec![]);

        let err = engine.fetch("42").await.unwrap_err();
        match err {
            EngineError::FetchFailed { album_id, cause } => {
                assert_eq!(album_id, "42");
                assert!(cause.contains("failed to execute"));
            }
            other => panic!("expected FetchFailed, got: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_fetch_succeeds_on_zero_exit() {
        let engine = CommandFetchEngine::new(PathBuf::from("true"), vec![]);
        engine.fetch("42").await.unwrap();
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_fetch_fails_on_nonzero_exit() {
        let engine = CommandFetchEngine::new(PathBuf::from("false"), vec![]);
        let err = engine.fetch("42").await.unwrap_err();
        assert!(matches!(err, EngineError::FetchFailed { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_fetch_failure_carries_stderr_tail() {
        let engine = CommandFetchEngine::new(
            PathBuf::from("sh"),
            vec!["-c".to_string(), "echo boom >&2; exit 3".to_string(), "sh".to_string()],
        );
        let err = engine.fetch("42").await.unwrap_err();
        match err {
            EngineError::FetchFailed { cause, .. } => assert!(cause.contains("boom")),
            other => panic!("expected FetchFailed, got: {other:?}"),
        }
    }

    #[test]
    fn test_from_config_requires_command() {
        assert!(CommandFetchEngine::from_config(&EngineConfig::default()).is_none());

        let config = EngineConfig {
            command: Some(PathBuf::from("fetch-album")),
            args: vec!["--quiet".to_string()],
        };
        let engine = CommandFetchEngine::from_config(&config).unwrap();
        assert_eq!(engine.program, PathBuf::from("fetch-album"));
        assert_eq!(engine.args, vec!["--quiet"]);
    }
}
