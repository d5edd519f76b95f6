//! Plugin connection records.

use super::PluginService;
use crate::tenant::domain::OrganizationId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Vault address of an organization's plugin secret.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SecretName(String);

impl SecretName {
    /// Derives the secret name, `tenant/{organization}/{service}`.
    #[must_use]
    pub fn for_plugin(organization_id: &OrganizationId, service: PluginService) -> Self {
        Self(format!("tenant/{organization_id}/{service}"))
    }

    /// Returns the name as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SecretName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A connected plugin.
///
/// At most one record exists per organization and service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginRecord {
    organization_id: OrganizationId,
    service: PluginService,
    secret_name: SecretName,
    updated_at: DateTime<Utc>,
}

impl PluginRecord {
    /// Records that the organization's secret for `service` has been written.
    #[must_use]
    pub fn connected(
        organization_id: OrganizationId,
        service: PluginService,
        clock: &impl Clock,
    ) -> Self {
        let secret_name = SecretName::for_plugin(&organization_id, service);
        Self {
            organization_id,
            service,
            secret_name,
            updated_at: clock.utc(),
        }
    }

    /// Returns the owning organization.
    #[must_use]
    pub const fn organization_id(&self) -> &OrganizationId {
        &self.organization_id
    }

    /// Returns the connected service.
    #[must_use]
    pub const fn service(&self) -> PluginService {
        self.service
    }

    /// Returns where the secret is stored.
    #[must_use]
    pub const fn secret_name(&self) -> &SecretName {
        &self.secret_name
    }

    /// Returns when the secret was last written.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}
