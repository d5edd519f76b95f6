//! Conversation status and transition rules.

use super::ParseConversationStatusError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Conversation lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationStatus {
    /// Handled by the automated agent.
    Unresolved,
    /// Handed to human operators; the agent no longer runs.
    Escalated,
    /// Closed; no further visitor or operator messages are accepted.
    Resolved,
}

impl ConversationStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unresolved => "unresolved",
            Self::Escalated => "escalated",
            Self::Resolved => "resolved",
        }
    }

    /// Returns `true` when moving to `target` is a forward transition.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Unresolved, Self::Escalated | Self::Resolved) | (Self::Escalated, Self::Resolved)
        )
    }

    /// Returns `true` when the automated agent may answer.
    #[must_use]
    pub const fn triggers_agent(self) -> bool {
        matches!(self, Self::Unresolved)
    }

    /// Returns `true` when new messages may be appended.
    #[must_use]
    pub const fn accepts_messages(self) -> bool {
        !matches!(self, Self::Resolved)
    }

    /// Resolves a requested transition without mutating anything.
    #[must_use]
    pub const fn outcome_of(self, target: Self) -> TransitionOutcome {
        if self.can_transition_to(target) {
            TransitionOutcome::Applied { from: self }
        } else if matches!(
            (self, target),
            (Self::Unresolved, Self::Unresolved)
                | (Self::Escalated, Self::Escalated)
                | (Self::Resolved, Self::Resolved)
        ) {
            TransitionOutcome::Unchanged
        } else {
            TransitionOutcome::Ignored { current: self }
        }
    }
}

impl TryFrom<&str> for ConversationStatus {
    type Error = ParseConversationStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "unresolved" => Ok(Self::Unresolved),
            "escalated" => Ok(Self::Escalated),
            "resolved" => Ok(Self::Resolved),
            _ => Err(ParseConversationStatusError(value.to_owned())),
        }
    }
}

impl fmt::Display for ConversationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of asking a conversation to move to a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// The status changed.
    Applied {
        /// Status before the transition.
        from: ConversationStatus,
    },
    /// The conversation already had the requested status.
    Unchanged,
    /// The request would move backwards or out of `resolved`; nothing
    /// changed.
    Ignored {
        /// Status that was kept.
        current: ConversationStatus,
    },
}

impl TransitionOutcome {
    /// Returns `true` unless the request was ignored.
    #[must_use]
    pub const fn is_accepted(self) -> bool {
        !matches!(self, Self::Ignored { .. })
    }
}
