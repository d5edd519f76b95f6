//! Visitor turns and the bounded agent loop.

use std::sync::Arc;

use mockable::Clock;

use super::{SupportToolbox, TurnLedger};
use crate::agent::{
    domain::{Exchange, GenerationRequest, ToolInvocation, ToolSpec, TurnOutcome},
    ports::{GenerationEngine, KnowledgeSearch},
};
use crate::config::AgentConfig;
use crate::conversation::domain::ThreadId;
use crate::conversation::services::thread_error;
use crate::error::{SupportError, SupportResult};
use crate::message::domain::{Message, NewMessage};
use crate::pagination::PageRequest;
use crate::session::domain::ContactSessionId;
use crate::store::SupportStore;
use crate::tenant::services::{AuthorizationGuard, ensure_visitor_access};

/// Accepts visitor prompts and lets the agent answer them.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use mockable::DefaultClock;
/// use switchboard::agent::adapters::{ScriptedGenerationEngine, StaticKnowledgeBase};
/// use switchboard::agent::services::AgentOrchestrator;
/// use switchboard::config::AgentConfig;
/// use switchboard::store::InMemoryStore;
///
/// let orchestrator = AgentOrchestrator::new(
///     Arc::new(InMemoryStore::new()),
///     Arc::new(StaticKnowledgeBase::new()),
///     Arc::new(ScriptedGenerationEngine::new()),
///     Arc::new(DefaultClock),
///     AgentConfig::default(),
/// );
/// # let _ = orchestrator;
/// ```
pub struct AgentOrchestrator<S, K, G, C>
where
    S: SupportStore,
    K: KnowledgeSearch,
    G: GenerationEngine,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    engine: Arc<G>,
    clock: Arc<C>,
    guard: AuthorizationGuard<S, C>,
    toolbox: SupportToolbox<S, K, G, C>,
    config: AgentConfig,
}

impl<S, K, G, C> Clone for AgentOrchestrator<S, K, G, C>
where
    S: SupportStore,
    K: KnowledgeSearch,
    G: GenerationEngine,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            engine: Arc::clone(&self.engine),
            clock: Arc::clone(&self.clock),
            guard: self.guard.clone(),
            toolbox: self.toolbox.clone(),
            config: self.config.clone(),
        }
    }
}

impl<S, K, G, C> AgentOrchestrator<S, K, G, C>
where
    S: SupportStore,
    K: KnowledgeSearch,
    G: GenerationEngine,
    C: Clock + Send + Sync,
{
    /// Creates an orchestrator.
    #[must_use]
    pub fn new(
        store: Arc<S>,
        knowledge: Arc<K>,
        engine: Arc<G>,
        clock: Arc<C>,
        config: AgentConfig,
    ) -> Self {
        let guard = AuthorizationGuard::new(Arc::clone(&store), Arc::clone(&clock));
        let toolbox = SupportToolbox::new(
            Arc::clone(&store),
            knowledge,
            Arc::clone(&engine),
            Arc::clone(&clock),
            config.search_limit,
        );
        Self {
            store,
            engine,
            clock,
            guard,
            toolbox,
            config,
        }
    }

    /// Appends a visitor prompt and, while the conversation is unresolved,
    /// lets the agent answer it.
    ///
    /// Escalated conversations take the prompt without running the agent.
    /// The prompt is committed together with the first agent entry so a
    /// failed turn leaves the ledger untouched.
    ///
    /// # Errors
    ///
    /// Returns [`SupportError::Unauthorized`] when the session is absent,
    /// expired or does not own the conversation,
    /// [`SupportError::NotFound`] when no conversation owns the thread,
    /// [`SupportError::BadRequest`] when the conversation is resolved or the
    /// prompt is blank, and [`SupportError::Service`] when generation fails.
    pub async fn post_message(
        &self,
        thread_id: ThreadId,
        contact_session_id: ContactSessionId,
        prompt: &str,
    ) -> SupportResult<TurnOutcome> {
        let session = self.guard.authorize_visitor(contact_session_id).await?;
        let conversation = self
            .store
            .find_conversation_by_thread(thread_id)
            .await?
            .ok_or_else(|| SupportError::not_found("conversation not found"))?;
        ensure_visitor_access(&session, &conversation)?;
        if !conversation.status().accepts_messages() {
            return Err(SupportError::bad_request("conversation resolved"));
        }
        if prompt.trim().is_empty() {
            return Err(SupportError::bad_request("message must not be empty"));
        }

        let mut turn = TurnLedger::bound(thread_id, conversation.status());
        turn.stage(NewMessage::visitor(contact_session_id, prompt, &*self.clock));

        if !conversation.status().triggers_agent() {
            turn.commit(&*self.store, thread_id, None)
                .await
                .map_err(thread_error)?;
            tracing::debug!(
                thread_id = %thread_id,
                status = %turn.status(),
                "visitor message appended without agent"
            );
            return Ok(TurnOutcome {
                status: turn.status(),
                agent_ran: false,
                messages: turn.into_committed(),
                tool_invocations: Vec::new(),
            });
        }

        let tool_invocations = self.run_agent(&mut turn, thread_id, prompt).await?;
        Ok(TurnOutcome {
            status: turn.status(),
            agent_ran: true,
            messages: turn.into_committed(),
            tool_invocations,
        })
    }

    async fn run_agent(
        &self,
        turn: &mut TurnLedger,
        thread_id: ThreadId,
        prompt: &str,
    ) -> SupportResult<Vec<ToolInvocation>> {
        let history = self.recent_history(thread_id).await?;
        let tools = ToolSpec::support_tools();
        let mut exchanges = vec![Exchange::Prompt {
            text: prompt.to_owned(),
        }];
        let mut invocations = Vec::new();
        let mut settled = false;

        for step in 0..self.config.max_steps {
            let request = GenerationRequest {
                instructions: self.config.instructions.clone(),
                history: history.clone(),
                exchanges: exchanges.clone(),
                tools: tools.clone(),
            };
            let reply = self
                .engine
                .generate_reply(thread_id, &request)
                .await
                .map_err(|err| {
                    tracing::error!(
                        thread_id = %thread_id,
                        step,
                        error = %err,
                        "generation failed; turn discarded"
                    );
                    SupportError::service(err)
                })?;
            tracing::debug!(
                thread_id = %thread_id,
                step,
                tool_calls = reply.tool_calls.len(),
                "agent step generated"
            );

            if !reply.text.trim().is_empty() {
                turn.stage(NewMessage::agent(&self.config.name, &reply.text, &*self.clock));
            }
            let calls = reply.tool_calls.clone();
            exchanges.push(Exchange::Reply { step: reply });
            if calls.is_empty() {
                settled = true;
                break;
            }

            for call in calls {
                let outcome = self.toolbox.execute(turn, &call).await;
                exchanges.push(Exchange::ToolResult {
                    call_id: call.id.clone(),
                    tool: call.name.clone(),
                    output: outcome.to_string(),
                });
                invocations.push(ToolInvocation { call, outcome });
            }
            if !turn.status().triggers_agent() {
                settled = true;
                break;
            }
        }

        if !settled {
            tracing::warn!(
                thread_id = %thread_id,
                max_steps = self.config.max_steps,
                "agent step budget exhausted"
            );
        }
        if !turn.staged().is_empty() {
            turn.commit(&*self.store, thread_id, None)
                .await
                .map_err(thread_error)?;
        }
        Ok(invocations)
    }

    async fn recent_history(&self, thread_id: ThreadId) -> SupportResult<Vec<Message>> {
        if self.config.context_messages == 0 {
            return Ok(Vec::new());
        }
        let page = self
            .store
            .list_messages(
                thread_id,
                &PageRequest::newest_first(self.config.context_messages),
            )
            .await?;
        let mut history = page.items;
        history.reverse();
        Ok(history)
    }
}
