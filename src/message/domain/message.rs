//! Ledger entry types.

use super::{MessageAuthor, MessageId, Role, SequenceNumber};
use crate::conversation::domain::ThreadId;
use crate::session::domain::ContactSessionId;
use crate::tenant::domain::OperatorIdentity;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// An entry waiting to be appended to a thread.
///
/// The store assigns the identifier and sequence number at commit time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMessage {
    role: Role,
    author: MessageAuthor,
    content: String,
    created_at: DateTime<Utc>,
}

impl NewMessage {
    /// Creates an entry with explicit role and author.
    #[must_use]
    pub fn new(
        role: Role,
        author: MessageAuthor,
        content: impl Into<String>,
        clock: &impl Clock,
    ) -> Self {
        Self {
            role,
            author,
            content: content.into(),
            created_at: clock.utc(),
        }
    }

    /// Creates a visitor prompt.
    #[must_use]
    pub fn visitor(
        contact_session_id: ContactSessionId,
        content: impl Into<String>,
        clock: &impl Clock,
    ) -> Self {
        Self::new(
            Role::User,
            MessageAuthor::Visitor { contact_session_id },
            content,
            clock,
        )
    }

    /// Creates an automated agent reply.
    #[must_use]
    pub fn agent(name: impl Into<String>, content: impl Into<String>, clock: &impl Clock) -> Self {
        Self::new(
            Role::Assistant,
            MessageAuthor::Agent { name: name.into() },
            content,
            clock,
        )
    }

    /// Creates an operator reply, shown on the support side.
    #[must_use]
    pub fn operator(
        identity: &OperatorIdentity,
        content: impl Into<String>,
        clock: &impl Clock,
    ) -> Self {
        Self::new(
            Role::Assistant,
            MessageAuthor::Operator {
                subject: identity.subject().to_owned(),
                display_name: identity.display_name().to_owned(),
            },
            content,
            clock,
        )
    }

    /// Creates a state change confirmation.
    #[must_use]
    pub fn system(content: impl Into<String>, clock: &impl Clock) -> Self {
        Self::new(Role::Assistant, MessageAuthor::System, content, clock)
    }

    /// Returns the display role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Returns the author.
    #[must_use]
    pub const fn author(&self) -> &MessageAuthor {
        &self.author
    }

    /// Returns the text content.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Records the entry at the given thread position.
    #[must_use]
    pub fn record(self, thread_id: ThreadId, sequence: SequenceNumber) -> Message {
        Message {
            id: MessageId::new(),
            thread_id,
            sequence,
            role: self.role,
            author: self.author,
            content: self.content,
            created_at: self.created_at,
        }
    }
}

/// A committed ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    id: MessageId,
    thread_id: ThreadId,
    sequence: SequenceNumber,
    role: Role,
    author: MessageAuthor,
    content: String,
    created_at: DateTime<Utc>,
}

impl Message {
    /// Returns the entry identifier.
    #[must_use]
    pub const fn id(&self) -> MessageId {
        self.id
    }

    /// Returns the thread the entry belongs to.
    #[must_use]
    pub const fn thread_id(&self) -> ThreadId {
        self.thread_id
    }

    /// Returns the position within the thread.
    #[must_use]
    pub const fn sequence(&self) -> SequenceNumber {
        self.sequence
    }

    /// Returns the display role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Returns the author.
    #[must_use]
    pub const fn author(&self) -> &MessageAuthor {
        &self.author
    }

    /// Returns the text content.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
