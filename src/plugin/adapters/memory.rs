//! In-memory plugin record storage and secret vault.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::plugin::{
    domain::{PluginRecord, PluginService, SecretName},
    ports::{PluginRepository, SecretVault, VaultError, VaultResult},
};
use crate::store::{InMemoryStore, StoreResult};
use crate::tenant::domain::OrganizationId;

#[async_trait]
impl PluginRepository for InMemoryStore {
    async fn upsert_plugin(&self, record: &PluginRecord) -> StoreResult<()> {
        let mut state = self.write()?;
        state.plugins.insert(
            (record.organization_id().clone(), record.service()),
            record.clone(),
        );
        Ok(())
    }

    async fn find_plugin(
        &self,
        organization_id: &OrganizationId,
        service: PluginService,
    ) -> StoreResult<Option<PluginRecord>> {
        let state = self.read()?;
        Ok(state
            .plugins
            .get(&(organization_id.clone(), service))
            .cloned())
    }

    async fn delete_plugin(
        &self,
        organization_id: &OrganizationId,
        service: PluginService,
    ) -> StoreResult<bool> {
        let mut state = self.write()?;
        Ok(state
            .plugins
            .remove(&(organization_id.clone(), service))
            .is_some())
    }
}

/// Thread-safe in-memory [`SecretVault`].
///
/// Can be told to fail a number of upcoming writes to exercise retries.
///
/// # Example
///
/// ```
/// use switchboard::plugin::adapters::memory::InMemorySecretVault;
///
/// let vault = InMemorySecretVault::new();
/// vault.fail_next_writes(2);
/// assert_eq!(vault.len(), 0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemorySecretVault {
    secrets: Arc<RwLock<HashMap<SecretName, String>>>,
    failures_remaining: Arc<AtomicU32>,
}

impl InMemorySecretVault {
    /// Creates an empty vault.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next `count` create or put calls fail as unavailable.
    pub fn fail_next_writes(&self, count: u32) {
        self.failures_remaining.store(count, Ordering::SeqCst);
    }

    /// Returns the number of stored secrets.
    ///
    /// Returns `0` if the internal lock is poisoned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.secrets.read().map(|guard| guard.len()).unwrap_or(0)
    }

    /// Returns `true` if no secrets are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn take_failure(&self) -> VaultResult<()> {
        let failing = self
            .failures_remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok();
        if failing {
            return Err(VaultError::unavailable(std::io::Error::other(
                "injected vault failure",
            )));
        }
        Ok(())
    }

    fn lock_error(err: &impl std::fmt::Display) -> VaultError {
        VaultError::unavailable(std::io::Error::other(format!("lock poisoned: {err}")))
    }
}

#[async_trait]
impl SecretVault for InMemorySecretVault {
    async fn create_secret(&self, name: &SecretName, value: &str) -> VaultResult<()> {
        self.take_failure()?;
        let mut guard = self.secrets.write().map_err(|err| Self::lock_error(&err))?;
        if guard.contains_key(name) {
            return Err(VaultError::AlreadyExists(name.clone()));
        }
        guard.insert(name.clone(), value.to_owned());
        Ok(())
    }

    async fn put_secret(&self, name: &SecretName, value: &str) -> VaultResult<()> {
        self.take_failure()?;
        let mut guard = self.secrets.write().map_err(|err| Self::lock_error(&err))?;
        guard.insert(name.clone(), value.to_owned());
        Ok(())
    }

    async fn get_secret(&self, name: &SecretName) -> VaultResult<Option<String>> {
        let guard = self.secrets.read().map_err(|err| Self::lock_error(&err))?;
        Ok(guard.get(name).cloned())
    }
}
