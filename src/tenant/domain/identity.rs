//! Authenticated operator identity.

use super::OrganizationId;
use serde::{Deserialize, Serialize};

/// Claims of an operator already authenticated by the identity provider.
///
/// The organization is optional because a signed-in user may not have
/// selected one yet; such an identity authorizes nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorIdentity {
    subject: String,
    organization_id: Option<OrganizationId>,
    family_name: Option<String>,
    email: Option<String>,
}

impl OperatorIdentity {
    /// Creates an identity for the given subject.
    #[must_use]
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            organization_id: None,
            family_name: None,
            email: None,
        }
    }

    /// Sets the active organization.
    #[must_use]
    pub fn with_organization(mut self, organization_id: OrganizationId) -> Self {
        self.organization_id = Some(organization_id);
        self
    }

    /// Sets the family name claim.
    #[must_use]
    pub fn with_family_name(mut self, family_name: impl Into<String>) -> Self {
        self.family_name = Some(family_name.into());
        self
    }

    /// Sets the email claim.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Returns the subject claim.
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Returns the active organization, if any.
    #[must_use]
    pub const fn organization_id(&self) -> Option<&OrganizationId> {
        self.organization_id.as_ref()
    }

    /// Returns the name shown next to operator replies.
    ///
    /// Prefers the family name, then the email, then the subject.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.family_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .or(self.email.as_deref())
            .unwrap_or(&self.subject)
    }
}
