//! External fetch engine boundary
//!
//! The engine is the external, opaque component that actually walks the
//! remote source and writes files under the content root. This module only
//! models its input/output contract: give it an album id, wait — possibly
//! minutes — and afterwards inspect the filesystem, because the engine's
//! return value alone is not trusted to mean anything about the output.

use crate::error::EngineError;
use async_trait::async_trait;

mod cli;

pub use cli::CommandFetchEngine;

/// Abstraction over the external content-fetching engine
///
/// Implementations perform one blocking fetch per call and surface every
/// failure as an [`EngineError`] — an engine must never panic the unit that
/// drives it. Retry policy, if any, belongs to the caller; the reference
/// behavior is a single attempt per submission.
#[async_trait]
pub trait FetchEngine: Send + Sync {
    /// Short name identifying the engine implementation (for logs)
    fn name(&self) -> &str;

    /// Fetch one album, writing side effects under the content root
    ///
    /// Returns when the engine finishes; the call may take seconds to
    /// minutes. A successful return does NOT guarantee output exists — the
    /// caller verifies via the filesystem.
    async fn fetch(&self, album_id: &str) -> Result<(), EngineError>;
}

/// Stand-in engine used when no fetch command is configured
///
/// Submissions still succeed; every task then fails with a clear
/// "engine not configured" error visible through its status.
pub struct UnconfiguredFetchEngine;

#[async_trait]
impl FetchEngine for UnconfiguredFetchEngine {
    fn name(&self) -> &str {
        "unconfigured"
    }

    async fn fetch(&self, _album_id: &str) -> Result<(), EngineError> {
        Err(EngineError::NotConfigured)
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unconfigured_engine_always_fails() {
        let engine = UnconfiguredFetchEngine;
        assert_eq!(engine.name(), "unconfigured");
        let err = engine.fetch("42").await.unwrap_err();
        assert!(matches!(err, EngineError::NotConfigured));
    }
}
