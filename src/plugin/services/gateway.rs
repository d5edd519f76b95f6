//! Plugin connection gateway.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use mockable::Clock;
use tokio::sync::Mutex as AsyncMutex;
use tokio::task::JoinHandle;

use crate::config::PluginConfig;
use crate::error::{SupportError, SupportResult};
use crate::plugin::{
    domain::{PluginRecord, PluginService, SecretName},
    ports::{PluginRepository, SecretVault, VaultError},
};
use crate::tenant::domain::{OperatorIdentity, OrganizationId};
use crate::tenant::services::operator_scope;

/// Handle to a background secret synchronisation.
///
/// Dropping the handle leaves the task running.
#[derive(Debug)]
pub struct PluginSync {
    task: JoinHandle<SupportResult<PluginRecord>>,
}

impl PluginSync {
    /// Waits for the synchronisation to finish.
    ///
    /// # Errors
    ///
    /// Returns the last failure once every attempt has been used, or
    /// [`SupportError::Service`] when the task panicked or was aborted.
    pub async fn wait(self) -> SupportResult<PluginRecord> {
        self.task.await.map_err(SupportError::service)?
    }

    /// Stops the synchronisation.
    pub fn abort(&self) {
        self.task.abort();
    }
}

/// Call-order tickets and the last committed ticket per secret.
#[derive(Debug, Default)]
struct WriteOrder {
    issued: AtomicU64,
    committed: Mutex<HashMap<SecretName, Arc<AsyncMutex<u64>>>>,
}

impl WriteOrder {
    fn issue(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst).saturating_add(1)
    }

    fn slot(&self, name: &SecretName) -> Arc<AsyncMutex<u64>> {
        let mut slots = self
            .committed
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        Arc::clone(slots.entry(name.clone()).or_default())
    }
}

/// Connects, inspects and disconnects organization plugins.
pub struct PluginGateway<R, V, C>
where
    R: PluginRepository,
    V: SecretVault,
    C: Clock + Send + Sync,
{
    plugins: Arc<R>,
    vault: Arc<V>,
    clock: Arc<C>,
    config: PluginConfig,
    order: Arc<WriteOrder>,
}

impl<R, V, C> Clone for PluginGateway<R, V, C>
where
    R: PluginRepository,
    V: SecretVault,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            plugins: Arc::clone(&self.plugins),
            vault: Arc::clone(&self.vault),
            clock: Arc::clone(&self.clock),
            config: self.config.clone(),
            order: Arc::clone(&self.order),
        }
    }
}

impl<R, V, C> PluginGateway<R, V, C>
where
    R: PluginRepository + 'static,
    V: SecretVault + 'static,
    C: Clock + Send + Sync + 'static,
{
    /// Creates a new plugin gateway.
    #[must_use]
    pub fn new(plugins: Arc<R>, vault: Arc<V>, clock: Arc<C>, config: PluginConfig) -> Self {
        Self {
            plugins,
            vault,
            clock,
            config,
            order: Arc::new(WriteOrder::default()),
        }
    }

    /// Schedules writing the operator's organization secret for `service`.
    ///
    /// The value fully replaces any previous secret. The write happens on a
    /// background task that retries with capped exponential backoff; the
    /// record appears once the vault write succeeded.
    ///
    /// Writes for one organization and service land in call order. A write
    /// still retrying when a later call has committed is dropped, and its
    /// handle resolves to the current record.
    ///
    /// # Errors
    ///
    /// Returns [`SupportError::Unauthorized`] when the identity has no
    /// organization.
    pub fn upsert(
        &self,
        identity: &OperatorIdentity,
        service: PluginService,
        value: serde_json::Value,
    ) -> SupportResult<PluginSync> {
        let organization_id = operator_scope(identity)?.clone();
        let ticket = self.order.issue();
        let gateway = self.clone();
        let task = tokio::spawn(async move {
            gateway
                .sync_with_retry(organization_id, service, value, ticket)
                .await
        });
        Ok(PluginSync { task })
    }

    /// Returns the operator's organization record for `service`.
    ///
    /// # Errors
    ///
    /// Returns [`SupportError::Unauthorized`] when the identity has no
    /// organization.
    pub async fn get_one(
        &self,
        identity: &OperatorIdentity,
        service: PluginService,
    ) -> SupportResult<Option<PluginRecord>> {
        let organization_id = operator_scope(identity)?;
        Ok(self.plugins.find_plugin(organization_id, service).await?)
    }

    /// Disconnects a plugin. The vault secret is left in place.
    ///
    /// # Errors
    ///
    /// Returns [`SupportError::NotFound`] when the plugin is not connected.
    pub async fn remove(
        &self,
        identity: &OperatorIdentity,
        service: PluginService,
    ) -> SupportResult<()> {
        let organization_id = operator_scope(identity)?;
        if !self.plugins.delete_plugin(organization_id, service).await? {
            return Err(SupportError::not_found("plugin not found"));
        }
        tracing::info!(organization_id = %organization_id, service = %service, "plugin disconnected");
        Ok(())
    }

    /// Reads an organization's secret back from the vault.
    ///
    /// Returns `None` when the secret is absent or is not valid JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SupportError::Service`] when the vault is unavailable.
    pub async fn get_secret(
        &self,
        organization_id: &OrganizationId,
        service: PluginService,
    ) -> SupportResult<Option<serde_json::Value>> {
        let name = SecretName::for_plugin(organization_id, service);
        let Some(raw) = self
            .vault
            .get_secret(&name)
            .await
            .map_err(SupportError::service)?
        else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(err) => {
                tracing::warn!(secret = %name, error = %err, "stored secret is not valid JSON");
                Ok(None)
            }
        }
    }

    async fn sync_with_retry(
        &self,
        organization_id: OrganizationId,
        service: PluginService,
        value: serde_json::Value,
        ticket: u64,
    ) -> SupportResult<PluginRecord> {
        let name = SecretName::for_plugin(&organization_id, service);
        let slot = self.order.slot(&name);
        let payload = value.to_string();
        let attempts = self.config.sync_attempts.max(1);
        let mut attempt = 1;
        loop {
            let mut committed = slot.lock().await;
            if *committed > ticket {
                drop(committed);
                tracing::debug!(
                    organization_id = %organization_id,
                    service = %service,
                    "plugin secret superseded by a later write"
                );
                return self.current_record(&organization_id, service).await;
            }
            match self.sync_once(&organization_id, service, &name, &payload).await {
                Ok(record) => {
                    *committed = ticket;
                    tracing::info!(
                        organization_id = %organization_id,
                        service = %service,
                        attempt,
                        "plugin secret synchronised"
                    );
                    return Ok(record);
                }
                Err(err) if attempt < attempts => {
                    drop(committed);
                    let delay = self.config.backoff_after(attempt);
                    tracing::warn!(
                        organization_id = %organization_id,
                        service = %service,
                        attempt,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %err,
                        "plugin secret synchronisation failed; retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => {
                    tracing::error!(
                        organization_id = %organization_id,
                        service = %service,
                        attempts,
                        error = %err,
                        "plugin secret synchronisation gave up"
                    );
                    return Err(err);
                }
            }
        }
    }

    async fn current_record(
        &self,
        organization_id: &OrganizationId,
        service: PluginService,
    ) -> SupportResult<PluginRecord> {
        self.plugins
            .find_plugin(organization_id, service)
            .await?
            .ok_or_else(|| SupportError::not_found("plugin not found"))
    }

    async fn sync_once(
        &self,
        organization_id: &OrganizationId,
        service: PluginService,
        name: &SecretName,
        payload: &str,
    ) -> SupportResult<PluginRecord> {
        match self.vault.create_secret(name, payload).await {
            Ok(()) => {}
            Err(VaultError::AlreadyExists(_)) => self
                .vault
                .put_secret(name, payload)
                .await
                .map_err(SupportError::service)?,
            Err(err) => return Err(SupportError::service(err)),
        }
        let record = PluginRecord::connected(organization_id.clone(), service, &*self.clock);
        self.plugins.upsert_plugin(&record).await?;
        Ok(record)
    }
}
