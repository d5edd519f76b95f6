//! Supported third-party services.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Third-party service an organization can connect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PluginService {
    /// Vapi voice assistants.
    Vapi,
}

impl PluginService {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Vapi => "vapi",
        }
    }
}

impl fmt::Display for PluginService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned while parsing a plugin service name.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unsupported plugin service: {0}")]
pub struct ParsePluginServiceError(pub String);

impl TryFrom<&str> for PluginService {
    type Error = ParsePluginServiceError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "vapi" => Ok(Self::Vapi),
            _ => Err(ParsePluginServiceError(value.to_owned())),
        }
    }
}
