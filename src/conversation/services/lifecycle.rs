//! Conversation creation and status transitions.

use crate::conversation::domain::{
    Conversation, ConversationId, ConversationStatus, ThreadId, TransitionOutcome,
};
use crate::error::{SupportError, SupportResult};
use crate::message::domain::NewMessage;
use crate::session::domain::ContactSessionId;
use crate::store::{StoreError, SupportStore, ThreadCommit};
use crate::tenant::domain::OperatorIdentity;
use crate::tenant::services::{AuthorizationGuard, ensure_operator_access};
use mockable::Clock;
use std::sync::Arc;

/// Agent-authored message appended when a conversation starts.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Greeting {
    agent_name: String,
    content: String,
}

/// Result of a status request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusUpdate {
    /// The conversation after the request.
    pub conversation: Conversation,
    /// What the state machine did with the request.
    pub outcome: TransitionOutcome,
}

/// Conversation store service for visitors, operators and the agent.
pub struct ConversationService<S, C>
where
    S: SupportStore,
    C: Clock + Send + Sync,
{
    pub(super) store: Arc<S>,
    pub(super) clock: Arc<C>,
    pub(super) guard: AuthorizationGuard<S, C>,
    greeting: Option<Greeting>,
}

impl<S, C> Clone for ConversationService<S, C>
where
    S: SupportStore,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            clock: Arc::clone(&self.clock),
            guard: self.guard.clone(),
            greeting: self.greeting.clone(),
        }
    }
}

impl<S, C> ConversationService<S, C>
where
    S: SupportStore,
    C: Clock + Send + Sync,
{
    /// Creates a conversation service without a greeting.
    #[must_use]
    pub fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        let guard = AuthorizationGuard::new(Arc::clone(&store), Arc::clone(&clock));
        Self {
            store,
            clock,
            guard,
            greeting: None,
        }
    }

    /// Appends `content` as the agent's first message in every new
    /// conversation.
    #[must_use]
    pub fn with_greeting(
        mut self,
        agent_name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        self.greeting = Some(Greeting {
            agent_name: agent_name.into(),
            content: content.into(),
        });
        self
    }

    /// Starts an unresolved conversation for a visitor.
    ///
    /// The organization is taken from the session. The greeting, if
    /// configured, is committed together with the conversation.
    ///
    /// # Errors
    ///
    /// Returns [`SupportError::Unauthorized`] when the session is absent or
    /// expired.
    pub async fn create(&self, contact_session_id: ContactSessionId) -> SupportResult<Conversation> {
        let session = self.guard.authorize_visitor(contact_session_id).await?;
        let conversation = Conversation::start(&session, &*self.clock);
        let opening: Vec<NewMessage> = self
            .greeting
            .iter()
            .map(|greeting| NewMessage::agent(&greeting.agent_name, &greeting.content, &*self.clock))
            .collect();
        self.store.insert_conversation(&conversation, opening).await?;
        tracing::info!(
            conversation_id = %conversation.id(),
            thread_id = %conversation.thread_id(),
            organization_id = %conversation.organization_id(),
            "conversation created"
        );
        Ok(conversation)
    }

    /// Marks the thread's conversation resolved.
    ///
    /// Resolving a resolved conversation is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`SupportError::NotFound`] when no conversation owns the
    /// thread.
    pub async fn resolve(&self, thread_id: ThreadId) -> SupportResult<StatusUpdate> {
        self.transition(thread_id, ConversationStatus::Resolved).await
    }

    /// Hands the thread's conversation to human operators.
    ///
    /// Escalating an escalated conversation is a no-op; escalating a resolved
    /// one is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`SupportError::NotFound`] when no conversation owns the
    /// thread.
    pub async fn escalate(&self, thread_id: ThreadId) -> SupportResult<StatusUpdate> {
        self.transition(thread_id, ConversationStatus::Escalated).await
    }

    /// Applies an operator's status change.
    ///
    /// Requests the state machine rejects are reported through
    /// [`TransitionOutcome::Ignored`] rather than as errors.
    ///
    /// # Errors
    ///
    /// Returns [`SupportError::NotFound`] when the conversation does not
    /// exist, or [`SupportError::Unauthorized`] when it belongs to another
    /// organization.
    pub async fn update_status(
        &self,
        identity: &OperatorIdentity,
        conversation_id: ConversationId,
        status: ConversationStatus,
    ) -> SupportResult<StatusUpdate> {
        let conversation = self.operator_conversation(identity, conversation_id).await?;
        self.transition(conversation.thread_id(), status).await
    }

    pub(super) async fn operator_conversation(
        &self,
        identity: &OperatorIdentity,
        conversation_id: ConversationId,
    ) -> SupportResult<Conversation> {
        crate::tenant::services::operator_scope(identity)?;
        let conversation = self
            .store
            .find_conversation(conversation_id)
            .await?
            .ok_or_else(|| SupportError::not_found("conversation not found"))?;
        ensure_operator_access(identity, &conversation)?;
        Ok(conversation)
    }

    async fn transition(
        &self,
        thread_id: ThreadId,
        target: ConversationStatus,
    ) -> SupportResult<StatusUpdate> {
        let receipt = self
            .store
            .commit_thread(ThreadCommit::new(thread_id).with_status(target))
            .await
            .map_err(thread_error)?;
        let outcome = receipt
            .transition
            .unwrap_or(TransitionOutcome::Unchanged);
        log_transition(thread_id, target, outcome);
        Ok(StatusUpdate {
            conversation: receipt.conversation,
            outcome,
        })
    }
}

pub(crate) fn thread_error(err: StoreError) -> SupportError {
    match err {
        StoreError::ThreadNotFound(_) => SupportError::not_found("conversation not found"),
        StoreError::ThreadClosed(_) => SupportError::bad_request("conversation resolved"),
        other => other.into(),
    }
}

pub(crate) fn log_transition(
    thread_id: ThreadId,
    target: ConversationStatus,
    outcome: TransitionOutcome,
) {
    match outcome {
        TransitionOutcome::Applied { from } => tracing::info!(
            thread_id = %thread_id,
            from = %from,
            to = %target,
            "conversation status changed"
        ),
        TransitionOutcome::Unchanged => tracing::debug!(
            thread_id = %thread_id,
            status = %target,
            "conversation already has requested status"
        ),
        TransitionOutcome::Ignored { current } => tracing::info!(
            thread_id = %thread_id,
            current = %current,
            requested = %target,
            "ignored status request"
        ),
    }
}
