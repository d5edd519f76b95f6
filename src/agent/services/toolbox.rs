//! Execution of the support tools offered to the generation engine.

use std::fmt::Display;
use std::sync::Arc;

use minijinja::{Environment, context};
use mockable::Clock;

use super::TurnLedger;
use crate::agent::{
    domain::{
        CompletionRequest, KnowledgeNamespace, SearchResults, SupportToolCall, ToolCall, ToolError,
        ToolOutcome,
    },
    ports::{GenerationEngine, KnowledgeSearch},
};
use crate::conversation::domain::{ConversationStatus, TransitionOutcome};
use crate::conversation::services::log_transition;
use crate::message::domain::NewMessage;
use crate::store::{StoreError, SupportStore};

const SEARCH_SYSTEM_PROMPT: &str = "You interpret knowledge base search results and provide \
     helpful, accurate answers to user questions";

const SEARCH_PROMPT_TEMPLATE: &str = "User asked: \"{{ query }}\"\n\nSearch results: Found \
     results in {{ titles | join(\", \") }}. Here is the context:\n\n{{ text }}";

/// Runs tool calls on behalf of one agent turn.
///
/// Failures never escape: every call yields a [`ToolOutcome`] whose text is
/// handed back to the engine.
pub struct SupportToolbox<S, K, G, C>
where
    S: SupportStore,
    K: KnowledgeSearch,
    G: GenerationEngine,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    knowledge: Arc<K>,
    engine: Arc<G>,
    clock: Arc<C>,
    search_limit: usize,
}

impl<S, K, G, C> Clone for SupportToolbox<S, K, G, C>
where
    S: SupportStore,
    K: KnowledgeSearch,
    G: GenerationEngine,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            knowledge: Arc::clone(&self.knowledge),
            engine: Arc::clone(&self.engine),
            clock: Arc::clone(&self.clock),
            search_limit: self.search_limit,
        }
    }
}

impl<S, K, G, C> SupportToolbox<S, K, G, C>
where
    S: SupportStore,
    K: KnowledgeSearch,
    G: GenerationEngine,
    C: Clock + Send + Sync,
{
    /// Creates a toolbox returning at most `search_limit` passages per
    /// search.
    #[must_use]
    pub const fn new(
        store: Arc<S>,
        knowledge: Arc<K>,
        engine: Arc<G>,
        clock: Arc<C>,
        search_limit: usize,
    ) -> Self {
        Self {
            store,
            knowledge,
            engine,
            clock,
            search_limit,
        }
    }

    /// Executes one call against the turn's thread.
    ///
    /// Status tools commit the turn's staged entries together with the
    /// status change and its confirmation.
    pub async fn execute(&self, turn: &mut TurnLedger, call: &ToolCall) -> ToolOutcome {
        let result = match SupportToolCall::try_from(call) {
            Ok(SupportToolCall::ResolveConversation) => {
                self.change_status(turn, ConversationStatus::Resolved, "Conversation resolved")
                    .await
            }
            Ok(SupportToolCall::EscalateConversation) => {
                self.change_status(turn, ConversationStatus::Escalated, "Conversation escalated")
                    .await
            }
            Ok(SupportToolCall::Search(arguments)) => self.search(turn, &arguments.query).await,
            Err(err) => Err(err),
        };
        let outcome = ToolOutcome::from(result);
        match &outcome {
            ToolOutcome::Completed(_) => {
                tracing::debug!(tool = %call.name, call_id = %call.id, "tool call completed");
            }
            ToolOutcome::Failed(err) => {
                tracing::warn!(tool = %call.name, call_id = %call.id, error = %err, "tool call failed");
            }
        }
        outcome
    }

    async fn change_status(
        &self,
        turn: &mut TurnLedger,
        target: ConversationStatus,
        confirmation: &str,
    ) -> Result<String, ToolError> {
        let thread_id = turn.thread_id().ok_or(ToolError::MissingThread)?;
        let entry = NewMessage::system(confirmation, &*self.clock);
        let receipt = turn
            .commit(&*self.store, thread_id, Some((target, entry)))
            .await
            .map_err(|err| match err {
                StoreError::ThreadNotFound(_) => ToolError::ConversationNotFound,
                other => ToolError::UpdateFailed(other.to_string()),
            })?;
        let outcome = receipt.transition.unwrap_or(TransitionOutcome::Unchanged);
        log_transition(thread_id, target, outcome);
        match outcome {
            TransitionOutcome::Ignored { current } => {
                Ok(format!("Conversation is {current}; status unchanged"))
            }
            TransitionOutcome::Applied { .. } | TransitionOutcome::Unchanged => {
                Ok(confirmation.to_owned())
            }
        }
    }

    async fn search(&self, turn: &TurnLedger, query: &str) -> Result<String, ToolError> {
        let thread_id = turn.thread_id().ok_or(ToolError::MissingThread)?;
        let conversation = self
            .store
            .find_conversation_by_thread(thread_id)
            .await
            .map_err(|err| search_failed(&err))?
            .ok_or(ToolError::ConversationNotFound)?;
        let namespace = KnowledgeNamespace::for_organization(conversation.organization_id());
        let results = self
            .knowledge
            .search(&namespace, query, self.search_limit)
            .await
            .map_err(|err| search_failed(&err))?;
        let request = CompletionRequest {
            system: SEARCH_SYSTEM_PROMPT.to_owned(),
            prompt: render_search_prompt(query, &results)?,
        };
        let answer = self
            .engine
            .complete(&request)
            .await
            .map_err(|err| search_failed(&err))?;
        tracing::debug!(
            thread_id = %thread_id,
            namespace = %namespace,
            passages = results.entries.len(),
            "knowledge search answered"
        );
        Ok(answer)
    }
}

fn render_search_prompt(query: &str, results: &SearchResults) -> Result<String, ToolError> {
    Environment::new()
        .render_str(
            SEARCH_PROMPT_TEMPLATE,
            context! {
                query => query,
                titles => results.titles(),
                text => &results.text,
            },
        )
        .map_err(|err| search_failed(&err))
}

fn search_failed(err: &impl Display) -> ToolError {
    ToolError::SearchFailed(err.to_string())
}
