//! Generation engine that replays a prepared script.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::agent::{
    domain::{CompletionRequest, GenerationRequest, GenerationStep},
    ports::{GenerationEngine, GenerationError, GenerationResult},
};
use crate::conversation::domain::ThreadId;

#[derive(Debug, Default)]
struct Script {
    steps: VecDeque<GenerationResult<GenerationStep>>,
    completions: VecDeque<GenerationResult<String>>,
    requests: Vec<(ThreadId, GenerationRequest)>,
    completion_requests: Vec<CompletionRequest>,
}

/// [`GenerationEngine`] answering from queued steps and completions.
///
/// Every request is recorded so callers can inspect what the engine saw.
/// Once a queue runs dry the engine rejects further requests.
///
/// # Example
///
/// ```
/// use switchboard::agent::adapters::ScriptedGenerationEngine;
/// use switchboard::agent::domain::GenerationStep;
///
/// let engine = ScriptedGenerationEngine::new();
/// engine.push_step(GenerationStep::text("Hello!"));
/// assert!(engine.requests().is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScriptedGenerationEngine {
    script: Arc<Mutex<Script>>,
}

impl ScriptedGenerationEngine {
    /// Creates an engine with an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues the next reply step.
    pub fn push_step(&self, step: GenerationStep) {
        self.lock().steps.push_back(Ok(step));
    }

    /// Queues a failed reply step.
    pub fn push_failure(&self, error: GenerationError) {
        self.lock().steps.push_back(Err(error));
    }

    /// Queues the next completion.
    pub fn push_completion(&self, text: impl Into<String>) {
        self.lock().completions.push_back(Ok(text.into()));
    }

    /// Queues a failed completion.
    pub fn push_completion_failure(&self, error: GenerationError) {
        self.lock().completions.push_back(Err(error));
    }

    /// Returns every reply request received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<(ThreadId, GenerationRequest)> {
        self.lock().requests.clone()
    }

    /// Returns every completion request received so far.
    #[must_use]
    pub fn completion_requests(&self) -> Vec<CompletionRequest> {
        self.lock().completion_requests.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Script> {
        self.script
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait]
impl GenerationEngine for ScriptedGenerationEngine {
    async fn generate_reply(
        &self,
        thread_id: ThreadId,
        request: &GenerationRequest,
    ) -> GenerationResult<GenerationStep> {
        let mut script = self.lock();
        script.requests.push((thread_id, request.clone()));
        script
            .steps
            .pop_front()
            .unwrap_or_else(|| Err(GenerationError::Rejected("script exhausted".to_owned())))
    }

    async fn complete(&self, request: &CompletionRequest) -> GenerationResult<String> {
        let mut script = self.lock();
        script.completion_requests.push(request.clone());
        script
            .completions
            .pop_front()
            .unwrap_or_else(|| Err(GenerationError::Rejected("script exhausted".to_owned())))
    }
}
