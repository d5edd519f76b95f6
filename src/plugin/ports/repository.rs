//! Repository port for plugin records.

use crate::plugin::domain::{PluginRecord, PluginService};
use crate::store::StoreResult;
use crate::tenant::domain::OrganizationId;
use async_trait::async_trait;

/// Plugin record persistence contract.
///
/// Records are unique per organization and service; writing a record for an
/// existing pair replaces it.
#[async_trait]
pub trait PluginRepository: Send + Sync {
    /// Inserts or replaces the record for its organization and service.
    async fn upsert_plugin(&self, record: &PluginRecord) -> StoreResult<()>;

    /// Finds the record for an organization and service.
    async fn find_plugin(
        &self,
        organization_id: &OrganizationId,
        service: PluginService,
    ) -> StoreResult<Option<PluginRecord>>;

    /// Deletes the record for an organization and service.
    ///
    /// Returns `false` when no record existed.
    async fn delete_plugin(
        &self,
        organization_id: &OrganizationId,
        service: PluginService,
    ) -> StoreResult<bool>;
}
