//! In-memory repository for delivery server records and tenant bindings.

use crate::pool::domain::{ServerId, ServerRecord, ServerSettings, TenantKey};
use crate::pool::ports::{ServerRepository, ServerRepositoryError, ServerRepositoryResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Thread-safe in-memory server repository.
///
/// Records are kept in insertion order because listing order is part of the
/// port contract: the chain builder breaks priority ties by it.
#[derive(Debug, Clone, Default)]
pub struct InMemoryServerRepository {
    state: Arc<RwLock<InMemoryRepositoryState>>,
}

#[derive(Debug, Default)]
struct InMemoryRepositoryState {
    servers: Vec<ServerRecord>,
    bindings: HashMap<TenantKey, Vec<ServerId>>,
    tenant_defaults: HashMap<TenantKey, ServerSettings>,
}

impl InMemoryRepositoryState {
    fn position(&self, server_id: ServerId) -> Option<usize> {
        self.servers
            .iter()
            .position(|record| record.identity().as_persisted() == Some(server_id))
    }

    fn is_bound(&self, server_id: ServerId) -> bool {
        self.bindings
            .values()
            .any(|bound| bound.contains(&server_id))
    }
}

impl InMemoryServerRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> ServerRepositoryResult<RwLockReadGuard<'_, InMemoryRepositoryState>> {
        self.state.read().map_err(|err| {
            ServerRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> ServerRepositoryResult<RwLockWriteGuard<'_, InMemoryRepositoryState>> {
        self.state.write().map_err(|err| {
            ServerRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

#[async_trait]
impl ServerRepository for InMemoryServerRepository {
    async fn list_enabled_global_server_ids(&self) -> ServerRepositoryResult<Vec<ServerId>> {
        let state = self.read()?;
        let ids = state
            .servers
            .iter()
            .filter(|record| record.is_enabled())
            .filter_map(|record| record.identity().as_persisted())
            .filter(|server_id| !state.is_bound(*server_id))
            .collect();
        Ok(ids)
    }

    async fn list_enabled_tenant_server_ids(
        &self,
        tenant: &TenantKey,
    ) -> ServerRepositoryResult<Vec<ServerId>> {
        let state = self.read()?;
        let ids = state
            .bindings
            .get(tenant)
            .map(|bound| {
                bound
                    .iter()
                    .copied()
                    .filter(|server_id| {
                        state
                            .position(*server_id)
                            .and_then(|index| state.servers.get(index))
                            .is_some_and(ServerRecord::is_enabled)
                    })
                    .collect()
            })
            .unwrap_or_default();
        Ok(ids)
    }

    async fn get_record(
        &self,
        server_id: ServerId,
    ) -> ServerRepositoryResult<Option<ServerRecord>> {
        let state = self.read()?;
        let record = state
            .position(server_id)
            .and_then(|index| state.servers.get(index))
            .cloned();
        Ok(record)
    }

    async fn get_all_enabled_records(&self) -> ServerRepositoryResult<Vec<ServerRecord>> {
        let state = self.read()?;
        Ok(state
            .servers
            .iter()
            .filter(|record| record.is_enabled())
            .cloned()
            .collect())
    }

    async fn get_tenant_default(
        &self,
        tenant: &TenantKey,
    ) -> ServerRepositoryResult<Option<ServerSettings>> {
        let state = self.read()?;
        Ok(state.tenant_defaults.get(tenant).cloned())
    }

    async fn create(&self, record: &ServerRecord) -> ServerRepositoryResult<()> {
        let Some(server_id) = record.identity().as_persisted() else {
            return Err(ServerRepositoryError::invalid_persisted_data(
                std::io::Error::other("only persisted identities can be stored"),
            ));
        };
        let mut state = self.write()?;
        if state.position(server_id).is_some() {
            return Err(ServerRepositoryError::DuplicateServer(server_id));
        }
        state.servers.push(record.clone());
        Ok(())
    }

    async fn update(&self, record: &ServerRecord) -> ServerRepositoryResult<()> {
        let Some(server_id) = record.identity().as_persisted() else {
            return Err(ServerRepositoryError::invalid_persisted_data(
                std::io::Error::other("only persisted identities can be stored"),
            ));
        };
        let mut state = self.write()?;
        let index = state
            .position(server_id)
            .ok_or(ServerRepositoryError::NotFound(server_id))?;
        if let Some(slot) = state.servers.get_mut(index) {
            *slot = record.clone();
        }
        Ok(())
    }

    async fn delete(&self, server_id: ServerId) -> ServerRepositoryResult<()> {
        let mut state = self.write()?;
        let index = state
            .position(server_id)
            .ok_or(ServerRepositoryError::NotFound(server_id))?;
        state.servers.remove(index);
        for bound in state.bindings.values_mut() {
            bound.retain(|bound_id| *bound_id != server_id);
        }
        Ok(())
    }

    async fn bind_tenant(
        &self,
        tenant: &TenantKey,
        server_id: ServerId,
    ) -> ServerRepositoryResult<()> {
        let mut state = self.write()?;
        if state.position(server_id).is_none() {
            return Err(ServerRepositoryError::NotFound(server_id));
        }
        let bound = state.bindings.entry(tenant.clone()).or_default();
        if bound.contains(&server_id) {
            return Err(ServerRepositoryError::DuplicateBinding {
                tenant: tenant.clone(),
                server_id,
            });
        }
        bound.push(server_id);
        Ok(())
    }

    async fn unbind_tenant(
        &self,
        tenant: &TenantKey,
        server_id: ServerId,
    ) -> ServerRepositoryResult<()> {
        let mut state = self.write()?;
        let removed = state
            .bindings
            .get_mut(tenant)
            .is_some_and(|bound| {
                let before = bound.len();
                bound.retain(|bound_id| *bound_id != server_id);
                bound.len() < before
            });
        if !removed {
            return Err(ServerRepositoryError::NotBound {
                tenant: tenant.clone(),
                server_id,
            });
        }
        Ok(())
    }

    async fn set_tenant_default(
        &self,
        tenant: &TenantKey,
        settings: ServerSettings,
    ) -> ServerRepositoryResult<()> {
        let mut state = self.write()?;
        state.tenant_defaults.insert(tenant.clone(), settings);
        Ok(())
    }

    async fn clear_tenant_default(&self, tenant: &TenantKey) -> ServerRepositoryResult<()> {
        let mut state = self.write()?;
        state.tenant_defaults.remove(tenant);
        Ok(())
    }
}
