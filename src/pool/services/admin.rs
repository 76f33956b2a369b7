//! Administrative surface: repository writes plus convergence plumbing.

use crate::pool::domain::{
    Credentials, InvalidationCommand, PoolDomainError, PriorityTier, ServerId, ServerName,
    ServerRecord, ServerSettings, TenantKey,
};
use crate::pool::ports::{
    DiagnosticsSink, InvalidationTransport, ServerRepository, ServerRepositoryError,
};
use crate::pool::services::ServerPool;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Partial update applied to an existing server record.
///
/// Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateServerRequest {
    /// New server name.
    pub name: Option<ServerName>,
    /// New credentials.
    pub credentials: Option<Credentials>,
    /// New priority tier.
    pub priority: Option<PriorityTier>,
    /// New transport security flag.
    pub use_secure_transport: Option<bool>,
}

/// Service-level errors for administrative operations.
#[derive(Debug, Error)]
pub enum PoolAdminError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] PoolDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] ServerRepositoryError),
    /// No server exists with the given identifier.
    #[error("server {0} not found")]
    NotFound(ServerId),
}

/// Result type for administrative operations.
pub type PoolAdminResult<T> = Result<T, PoolAdminError>;

/// Thin administrative wrapper over the repository write contract.
///
/// Every mutation follows the same convergence sequence: repository write,
/// local pool flush, then a best-effort flush broadcast to peer instances.
/// An undelivered broadcast is logged and accepted; the affected peers stay
/// stale only until the next flush-triggering mutation reaches them.
pub struct PoolAdminService<R, D, T, C>
where
    R: ServerRepository,
    D: DiagnosticsSink,
    T: InvalidationTransport,
    C: Clock + Send + Sync,
{
    pool: Arc<ServerPool<R, D, C>>,
    repository: Arc<R>,
    transport: Arc<T>,
    clock: Arc<C>,
}

impl<R, D, T, C> PoolAdminService<R, D, T, C>
where
    R: ServerRepository,
    D: DiagnosticsSink,
    T: InvalidationTransport,
    C: Clock + Send + Sync,
{
    /// Creates an administrative service around one pool.
    #[must_use]
    pub const fn new(
        pool: Arc<ServerPool<R, D, C>>,
        repository: Arc<R>,
        transport: Arc<T>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            pool,
            repository,
            transport,
            clock,
        }
    }

    /// Creates a new enabled server record.
    ///
    /// # Errors
    ///
    /// Returns [`PoolAdminError`] when persistence rejects the record or the
    /// follow-up flush fails.
    pub async fn create_server(&self, settings: ServerSettings) -> PoolAdminResult<ServerRecord> {
        let record = ServerRecord::new(ServerId::new().into(), settings, &*self.clock);
        self.repository.create(&record).await?;
        self.flush_and_broadcast().await?;
        Ok(record)
    }

    /// Applies a partial update to an existing record.
    ///
    /// # Errors
    ///
    /// Returns [`PoolAdminError::NotFound`] when no server has the given
    /// identifier.
    pub async fn update_server(
        &self,
        server_id: ServerId,
        request: UpdateServerRequest,
    ) -> PoolAdminResult<ServerRecord> {
        let mut record = self.find_server_or_error(server_id).await?;
        if let Some(name) = request.name {
            record.rename(name, &*self.clock);
        }
        if let Some(credentials) = request.credentials {
            record.set_credentials(credentials, &*self.clock);
        }
        if let Some(priority) = request.priority {
            record.set_priority(priority, &*self.clock);
        }
        if let Some(secure) = request.use_secure_transport {
            record.set_secure_transport(secure, &*self.clock);
        }
        self.repository.update(&record).await?;
        self.flush_and_broadcast().await?;
        Ok(record)
    }

    /// Deletes a server record and every binding that references it.
    ///
    /// # Errors
    ///
    /// Returns [`PoolAdminError`] when the record does not exist or the
    /// follow-up flush fails.
    pub async fn delete_server(&self, server_id: ServerId) -> PoolAdminResult<()> {
        self.repository.delete(server_id).await?;
        self.flush_and_broadcast().await?;
        Ok(())
    }

    /// Makes a server eligible for chain membership again.
    ///
    /// # Errors
    ///
    /// Returns [`PoolAdminError::NotFound`] when no server has the given
    /// identifier.
    pub async fn enable_server(&self, server_id: ServerId) -> PoolAdminResult<ServerRecord> {
        self.set_enabled(server_id, true).await
    }

    /// Excludes a server from chain membership without deleting it.
    ///
    /// # Errors
    ///
    /// Returns [`PoolAdminError::NotFound`] when no server has the given
    /// identifier.
    pub async fn disable_server(&self, server_id: ServerId) -> PoolAdminResult<ServerRecord> {
        self.set_enabled(server_id, false).await
    }

    /// Binds a tenant to a persisted server.
    ///
    /// # Errors
    ///
    /// Returns [`PoolAdminError`] when the binding already exists, the
    /// server does not, or the follow-up flush fails.
    pub async fn bind_tenant(
        &self,
        tenant: &TenantKey,
        server_id: ServerId,
    ) -> PoolAdminResult<()> {
        self.repository.bind_tenant(tenant, server_id).await?;
        self.flush_and_broadcast().await?;
        Ok(())
    }

    /// Removes a tenant binding.
    ///
    /// # Errors
    ///
    /// Returns [`PoolAdminError`] when no such binding exists or the
    /// follow-up flush fails.
    pub async fn unbind_tenant(
        &self,
        tenant: &TenantKey,
        server_id: ServerId,
    ) -> PoolAdminResult<()> {
        self.repository.unbind_tenant(tenant, server_id).await?;
        self.flush_and_broadcast().await?;
        Ok(())
    }

    /// Sets or replaces a tenant's inline default server settings.
    ///
    /// # Errors
    ///
    /// Returns [`PoolAdminError`] when persistence or the follow-up flush
    /// fails.
    pub async fn set_tenant_default(
        &self,
        tenant: &TenantKey,
        settings: ServerSettings,
    ) -> PoolAdminResult<()> {
        self.repository.set_tenant_default(tenant, settings).await?;
        self.flush_and_broadcast().await?;
        Ok(())
    }

    /// Removes a tenant's inline default server settings.
    ///
    /// # Errors
    ///
    /// Returns [`PoolAdminError`] when persistence or the follow-up flush
    /// fails.
    pub async fn clear_tenant_default(&self, tenant: &TenantKey) -> PoolAdminResult<()> {
        self.repository.clear_tenant_default(tenant).await?;
        self.flush_and_broadcast().await?;
        Ok(())
    }

    async fn set_enabled(
        &self,
        server_id: ServerId,
        enabled: bool,
    ) -> PoolAdminResult<ServerRecord> {
        let mut record = self.find_server_or_error(server_id).await?;
        if enabled {
            record.enable(&*self.clock);
        } else {
            record.disable(&*self.clock);
        }
        self.repository.update(&record).await?;
        self.flush_and_broadcast().await?;
        Ok(record)
    }

    async fn find_server_or_error(&self, server_id: ServerId) -> PoolAdminResult<ServerRecord> {
        self.repository
            .get_record(server_id)
            .await?
            .ok_or(PoolAdminError::NotFound(server_id))
    }

    async fn flush_and_broadcast(&self) -> PoolAdminResult<()> {
        self.pool.flush().await?;
        let command = InvalidationCommand::flush(self.pool.name().clone());
        if let Err(error) = self.transport.publish(command) {
            tracing::warn!(
                pool = %self.pool.name(),
                %error,
                "invalidation broadcast failed; peers converge on their next flush"
            );
        }
        Ok(())
    }
}
