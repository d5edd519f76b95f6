//! Authorship metadata attached to ledger entries.

use crate::session::domain::ContactSessionId;
use serde::{Deserialize, Serialize};

/// Who wrote a ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MessageAuthor {
    /// The visitor holding the contact session.
    Visitor {
        /// Session the visitor wrote from.
        contact_session_id: ContactSessionId,
    },
    /// The automated support agent.
    Agent {
        /// Configured agent name.
        name: String,
    },
    /// A human operator of the owning organization.
    Operator {
        /// Identity-provider subject.
        subject: String,
        /// Name shown next to the reply.
        display_name: String,
    },
    /// A state change confirmation.
    System,
}
