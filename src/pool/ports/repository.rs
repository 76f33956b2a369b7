//! Repository port for delivery server persistence and tenant bindings.

use crate::pool::domain::{ServerId, ServerRecord, ServerSettings, TenantKey};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for server repository operations.
pub type ServerRepositoryResult<T> = Result<T, ServerRepositoryError>;

/// Persistence contract for delivery server records and tenant bindings.
///
/// Listing methods return identifiers in repository order; the chain builder
/// relies on that order to break priority ties deterministically.
#[async_trait]
pub trait ServerRepository: Send + Sync {
    /// Returns the enabled servers bound to no tenant, in repository order.
    async fn list_enabled_global_server_ids(&self) -> ServerRepositoryResult<Vec<ServerId>>;

    /// Returns the enabled servers bound to the given tenant, in binding
    /// order.
    async fn list_enabled_tenant_server_ids(
        &self,
        tenant: &TenantKey,
    ) -> ServerRepositoryResult<Vec<ServerId>>;

    /// Finds a persisted record by identifier.
    async fn get_record(&self, server_id: ServerId)
    -> ServerRepositoryResult<Option<ServerRecord>>;

    /// Returns every enabled record, in repository order. Used by flush.
    async fn get_all_enabled_records(&self) -> ServerRepositoryResult<Vec<ServerRecord>>;

    /// Returns the tenant's inline default server settings, if configured.
    async fn get_tenant_default(
        &self,
        tenant: &TenantKey,
    ) -> ServerRepositoryResult<Option<ServerSettings>>;

    /// Stores a new server record.
    ///
    /// # Errors
    ///
    /// Returns [`ServerRepositoryError::DuplicateServer`] when the identity
    /// already exists.
    async fn create(&self, record: &ServerRecord) -> ServerRepositoryResult<()>;

    /// Persists updates to an existing record.
    ///
    /// # Errors
    ///
    /// Returns [`ServerRepositoryError::NotFound`] when the record does not
    /// exist.
    async fn update(&self, record: &ServerRecord) -> ServerRepositoryResult<()>;

    /// Deletes a record and every binding that references it.
    ///
    /// # Errors
    ///
    /// Returns [`ServerRepositoryError::NotFound`] when the record does not
    /// exist.
    async fn delete(&self, server_id: ServerId) -> ServerRepositoryResult<()>;

    /// Binds a tenant to a persisted server.
    ///
    /// # Errors
    ///
    /// Returns [`ServerRepositoryError::DuplicateBinding`] when the binding
    /// already exists and [`ServerRepositoryError::NotFound`] when the server
    /// does not.
    async fn bind_tenant(
        &self,
        tenant: &TenantKey,
        server_id: ServerId,
    ) -> ServerRepositoryResult<()>;

    /// Removes a tenant binding.
    ///
    /// # Errors
    ///
    /// Returns [`ServerRepositoryError::NotBound`] when no such binding
    /// exists.
    async fn unbind_tenant(
        &self,
        tenant: &TenantKey,
        server_id: ServerId,
    ) -> ServerRepositoryResult<()>;

    /// Sets or replaces the tenant's inline default server settings.
    async fn set_tenant_default(
        &self,
        tenant: &TenantKey,
        settings: ServerSettings,
    ) -> ServerRepositoryResult<()>;

    /// Removes the tenant's inline default server settings, if any.
    async fn clear_tenant_default(&self, tenant: &TenantKey) -> ServerRepositoryResult<()>;
}

/// Errors returned by server repository implementations.
#[derive(Debug, Clone, Error)]
pub enum ServerRepositoryError {
    /// A server with the same identifier already exists.
    #[error("duplicate server identifier: {0}")]
    DuplicateServer(ServerId),

    /// The server was not found.
    #[error("server not found: {0}")]
    NotFound(ServerId),

    /// The tenant is already bound to the server.
    #[error("tenant {tenant} is already bound to server {server_id}")]
    DuplicateBinding {
        /// Tenant side of the binding.
        tenant: TenantKey,
        /// Server side of the binding.
        server_id: ServerId,
    },

    /// No binding exists between the tenant and the server.
    #[error("tenant {tenant} is not bound to server {server_id}")]
    NotBound {
        /// Tenant side of the binding.
        tenant: TenantKey,
        /// Server side of the binding.
        server_id: ServerId,
    },

    /// Persisted data could not be reconstructed into domain types.
    #[error("invalid persisted server data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ServerRepositoryError {
    /// Wraps persisted-data decoding or validation failures.
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }

    /// Wraps a persistence-layer failure.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
