//! Profile store trait
//!
//! The store is an external collaborator: the engine plans queries, the store
//! executes them. Every access to ARGO profile data goes through this seam,
//! which keeps the pipeline testable with in-memory fakes and keeps the
//! cosmetic SQL rendering firmly off the execution path.

use crate::errors::ExplorerError;
use crate::types::{PlannedQuery, Profile};
use async_trait::async_trait;
use thiserror::Error;

/// Failure modes of a profile store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("store timed out")]
    Timeout,
}

impl From<StoreError> for ExplorerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(msg) => ExplorerError::StoreUnavailable(msg),
            StoreError::Timeout => ExplorerError::StoreTimeout,
        }
    }
}

/// Read-only query interface over an ARGO profile collection.
///
/// Implementations must honor every predicate of the [`PlannedQuery`]: the
/// latitude band, the optional longitude band, the half-open time window,
/// and the row cap. Each returned [`Profile`] carries the depth curve for
/// `query.variable` only. An empty result is a normal return, not an error.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Execute a planned query and return the matching profiles.
    ///
    /// Order of the returned profiles is unspecified; the aggregation layer
    /// treats them as a set.
    async fn execute(&self, query: &PlannedQuery) -> Result<Vec<Profile>, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_maps_to_explorer_error() {
        let err: ExplorerError = StoreError::Timeout.into();
        assert!(matches!(err, ExplorerError::StoreTimeout));

        let err: ExplorerError = StoreError::Unavailable("connection refused".into()).into();
        match err {
            ExplorerError::StoreUnavailable(msg) => assert_eq!(msg, "connection refused"),
            other => panic!("unexpected mapping: {other:?}"),
        }
    }
}
