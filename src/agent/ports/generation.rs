//! Port for the text generation engine.

use crate::agent::domain::{CompletionRequest, GenerationRequest, GenerationStep};
use crate::conversation::domain::ThreadId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for generation operations.
pub type GenerationResult<T> = Result<T, GenerationError>;

/// Errors returned by generation engines.
#[derive(Debug, Clone, Error)]
pub enum GenerationError {
    /// The engine could not be reached.
    #[error("generation engine unavailable: {0}")]
    Unavailable(Arc<dyn std::error::Error + Send + Sync>),

    /// The engine refused the request.
    #[error("generation rejected: {0}")]
    Rejected(String),
}

impl GenerationError {
    /// Wraps a transport or service error.
    pub fn unavailable(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Unavailable(Arc::new(err))
    }
}

/// A language model able to answer with text and tool calls.
#[async_trait]
pub trait GenerationEngine: Send + Sync {
    /// Produces the next step of an agent turn.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError`] when no step could be produced.
    async fn generate_reply(
        &self,
        thread_id: ThreadId,
        request: &GenerationRequest,
    ) -> GenerationResult<GenerationStep>;

    /// Produces a single completion without tools.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError`] when no completion could be produced.
    async fn complete(&self, request: &CompletionRequest) -> GenerationResult<String>;
}
