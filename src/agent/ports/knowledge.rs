//! Port for the per-organization knowledge index.

use crate::agent::domain::{KnowledgeNamespace, SearchResults};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for knowledge searches.
pub type KnowledgeResult<T> = Result<T, KnowledgeError>;

/// Errors returned by knowledge indexes.
#[derive(Debug, Clone, Error)]
pub enum KnowledgeError {
    /// The index could not be reached.
    #[error("knowledge index unavailable: {0}")]
    Unavailable(Arc<dyn std::error::Error + Send + Sync>),
}

impl KnowledgeError {
    /// Wraps a transport or service error.
    pub fn unavailable(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Unavailable(Arc::new(err))
    }
}

/// Semantic search over organization documents.
#[async_trait]
pub trait KnowledgeSearch: Send + Sync {
    /// Returns at most `limit` passages matching `query` in `namespace`.
    ///
    /// # Errors
    ///
    /// Returns [`KnowledgeError`] when the search fails.
    async fn search(
        &self,
        namespace: &KnowledgeNamespace,
        query: &str,
        limit: usize,
    ) -> KnowledgeResult<SearchResults>;
}
