//! Organization identifier.

use super::TenantDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of the organization that owns sessions, conversations and
/// plugins.
///
/// Issued by the external identity provider; this crate only checks that it is
/// syntactically usable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OrganizationId(String);

impl OrganizationId {
    /// Creates a validated organization identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TenantDomainError::InvalidOrganizationId`] when the value is
    /// empty or contains whitespace.
    pub fn new(value: impl Into<String>) -> Result<Self, TenantDomainError> {
        let raw = value.into();
        if raw.is_empty() || raw.chars().any(char::is_whitespace) {
            return Err(TenantDomainError::InvalidOrganizationId(raw));
        }
        Ok(Self(raw))
    }

    /// Returns the identifier as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for OrganizationId {
    type Error = TenantDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<OrganizationId> for String {
    fn from(id: OrganizationId) -> Self {
        id.0
    }
}

impl AsRef<str> for OrganizationId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for OrganizationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
