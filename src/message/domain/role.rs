//! Display role of a ledger entry.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Which side of the conversation an entry is shown on.
///
/// `User` is the visitor side. `Assistant` is the support side, shared by the
/// automated agent, operators and system confirmations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Visitor-authored entry.
    User,
    /// Support-side entry.
    Assistant,
}

impl Role {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned while parsing a role string.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown message role: {0}")]
pub struct ParseRoleError(pub String);

impl TryFrom<&str> for Role {
    type Error = ParseRoleError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "user" => Ok(Self::User),
            "assistant" => Ok(Self::Assistant),
            _ => Err(ParseRoleError(value.to_owned())),
        }
    }
}
