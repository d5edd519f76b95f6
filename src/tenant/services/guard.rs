//! Operator and visitor authorization checks.

use crate::conversation::domain::Conversation;
use crate::error::{SupportError, SupportResult};
use crate::session::{domain::ContactSession, domain::ContactSessionId, ports::ContactSessionRepository};
use crate::tenant::domain::{OperatorIdentity, OrganizationId};
use mockable::Clock;
use std::sync::Arc;

/// Resolves the organization an operator may act on.
///
/// # Errors
///
/// Returns [`SupportError::Unauthorized`] when the identity has no active
/// organization.
pub fn operator_scope(identity: &OperatorIdentity) -> SupportResult<&OrganizationId> {
    identity
        .organization_id()
        .ok_or_else(|| SupportError::unauthorized("organization not found"))
}

/// Checks that the operator belongs to the conversation's organization.
///
/// # Errors
///
/// Returns [`SupportError::Unauthorized`] on a missing or mismatched
/// organization.
pub fn ensure_operator_access(
    identity: &OperatorIdentity,
    conversation: &Conversation,
) -> SupportResult<()> {
    if operator_scope(identity)? != conversation.organization_id() {
        tracing::warn!(
            subject = identity.subject(),
            conversation_id = %conversation.id(),
            "operator denied access to another organization's conversation"
        );
        return Err(SupportError::unauthorized("invalid organization id"));
    }
    Ok(())
}

/// Checks that the conversation was opened from the visitor's session.
///
/// A matching session implies a matching organization because conversations
/// copy their organization from the opening session.
///
/// # Errors
///
/// Returns [`SupportError::Unauthorized`] when the conversation belongs to a
/// different session.
pub fn ensure_visitor_access(
    session: &ContactSession,
    conversation: &Conversation,
) -> SupportResult<()> {
    if conversation.contact_session_id() != session.id()
        || conversation.organization_id() != session.organization_id()
    {
        return Err(SupportError::unauthorized("incorrect session"));
    }
    Ok(())
}

/// Re-validates visitor credentials against the session store.
///
/// Freshness is checked on every call; nothing is cached.
pub struct AuthorizationGuard<S, C>
where
    S: ContactSessionRepository,
    C: Clock + Send + Sync,
{
    sessions: Arc<S>,
    clock: Arc<C>,
}

impl<S, C> Clone for AuthorizationGuard<S, C>
where
    S: ContactSessionRepository,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            sessions: Arc::clone(&self.sessions),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<S, C> AuthorizationGuard<S, C>
where
    S: ContactSessionRepository,
    C: Clock + Send + Sync,
{
    /// Creates a guard over the given session repository.
    #[must_use]
    pub const fn new(sessions: Arc<S>, clock: Arc<C>) -> Self {
        Self { sessions, clock }
    }

    /// Resolves a visitor's live session.
    ///
    /// # Errors
    ///
    /// Returns [`SupportError::Unauthorized`] when the session is absent or
    /// expired, or [`SupportError::Service`] when the lookup fails.
    pub async fn authorize_visitor(
        &self,
        contact_session_id: ContactSessionId,
    ) -> SupportResult<ContactSession> {
        let now = self.clock.utc();
        self.sessions
            .find_session(contact_session_id)
            .await?
            .filter(|session| session.is_valid_at(now))
            .ok_or_else(|| SupportError::unauthorized("invalid session"))
    }
}
