//! Conversation aggregate and read models.

use super::{ConversationId, ConversationStatus, ThreadId, TransitionOutcome};
use crate::message::domain::Message;
use crate::session::domain::{ContactSession, ContactSessionId};
use crate::tenant::domain::OrganizationId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Conversation aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    id: ConversationId,
    organization_id: OrganizationId,
    contact_session_id: ContactSessionId,
    thread_id: ThreadId,
    status: ConversationStatus,
    created_at: DateTime<Utc>,
}

impl Conversation {
    /// Starts an unresolved conversation for a visitor session.
    ///
    /// The organization is copied from the session so the two can never
    /// disagree.
    #[must_use]
    pub fn start(session: &ContactSession, clock: &impl Clock) -> Self {
        Self {
            id: ConversationId::new(),
            organization_id: session.organization_id().clone(),
            contact_session_id: session.id(),
            thread_id: ThreadId::new(),
            status: ConversationStatus::Unresolved,
            created_at: clock.utc(),
        }
    }

    /// Returns the conversation identifier.
    #[must_use]
    pub const fn id(&self) -> ConversationId {
        self.id
    }

    /// Returns the owning organization.
    #[must_use]
    pub const fn organization_id(&self) -> &OrganizationId {
        &self.organization_id
    }

    /// Returns the visitor session that opened the conversation.
    #[must_use]
    pub const fn contact_session_id(&self) -> ContactSessionId {
        self.contact_session_id
    }

    /// Returns the backing message thread.
    #[must_use]
    pub const fn thread_id(&self) -> ThreadId {
        self.thread_id
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> ConversationStatus {
        self.status
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Moves the conversation towards `target` if the state machine allows
    /// it.
    pub const fn apply_status(&mut self, target: ConversationStatus) -> TransitionOutcome {
        let outcome = self.status.outcome_of(target);
        if let TransitionOutcome::Applied { .. } = outcome {
            self.status = target;
        }
        outcome
    }
}

/// A conversation together with the session that opened it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationDetails {
    /// The conversation.
    pub conversation: Conversation,
    /// The visitor session linked to it.
    pub contact_session: ContactSession,
}

/// Listing row: a conversation joined with its session and latest message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSummary {
    /// The conversation.
    pub conversation: Conversation,
    /// The visitor session linked to it.
    pub contact_session: ContactSession,
    /// Most recent ledger entry, if the thread has any.
    pub last_message: Option<Message>,
}
