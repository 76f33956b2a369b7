//! Candidate chain construction for one tenant.

use crate::pool::domain::{Chain, PriorityTier, ServerIdentity, ServerRecord, TenantKey};
use crate::pool::ports::{ServerRepository, ServerRepositoryResult};
use crate::pool::services::PoolStorage;
use mockable::Clock;

/// Builds the ordered candidate chain for a tenant.
///
/// Candidates are gathered in three groups: the tenant's inline default
/// server, servers explicitly bound to the tenant, and global (unbound)
/// servers. A stable sort by descending priority tier then orders the
/// concatenated list, so within one tier the group order and the
/// repository's own order are preserved.
pub struct ChainBuilder<'a, R: ServerRepository> {
    repository: &'a R,
}

impl<'a, R: ServerRepository> ChainBuilder<'a, R> {
    /// Creates a builder over the given repository.
    #[must_use]
    pub const fn new(repository: &'a R) -> Self {
        Self { repository }
    }

    /// Builds the tenant's chain, registering any not-yet-tracked candidate
    /// records in `storage` as idle.
    ///
    /// An empty chain is a valid result; the pool reports it as permanent
    /// unavailability at acquire time.
    ///
    /// # Errors
    ///
    /// Returns repository errors unchanged; the pool degrades them to a
    /// temporary unavailability.
    pub async fn build(
        &self,
        tenant: &TenantKey,
        storage: &mut PoolStorage,
        clock: &impl Clock,
    ) -> ServerRepositoryResult<Chain> {
        let mut candidates: Vec<(ServerIdentity, PriorityTier)> = Vec::new();

        if !tenant.is_global() {
            self.push_tenant_default(tenant, storage, clock, &mut candidates)
                .await?;

            let bound = self
                .repository
                .list_enabled_tenant_server_ids(tenant)
                .await?;
            for server_id in bound {
                self.push_persisted(server_id.into(), storage, &mut candidates)
                    .await?;
            }
        }

        let global = self.repository.list_enabled_global_server_ids().await?;
        for server_id in global {
            self.push_persisted(server_id.into(), storage, &mut candidates)
                .await?;
        }

        // Stable: equal tiers keep default -> tenant -> global group order.
        candidates.sort_by(|left, right| right.1.cmp(&left.1));

        Ok(Chain::new(
            candidates.into_iter().map(|(identity, _)| identity).collect(),
        ))
    }

    async fn push_tenant_default(
        &self,
        tenant: &TenantKey,
        storage: &mut PoolStorage,
        clock: &impl Clock,
        candidates: &mut Vec<(ServerIdentity, PriorityTier)>,
    ) -> ServerRepositoryResult<()> {
        let Some(settings) = self.repository.get_tenant_default(tenant).await? else {
            return Ok(());
        };

        let identity = ServerIdentity::TenantDefault(tenant.clone());
        if !storage.contains(&identity) {
            storage.insert_idle(ServerRecord::new(identity.clone(), settings, clock));
        }
        if let Some(record) = storage.record(&identity) {
            candidates.push((identity, record.priority()));
        }
        Ok(())
    }

    async fn push_persisted(
        &self,
        identity: ServerIdentity,
        storage: &mut PoolStorage,
        candidates: &mut Vec<(ServerIdentity, PriorityTier)>,
    ) -> ServerRepositoryResult<()> {
        if !storage.contains(&identity) {
            let Some(server_id) = identity.as_persisted() else {
                return Ok(());
            };
            match self.repository.get_record(server_id).await? {
                // Disabled or vanished between listing and fetch: skip.
                Some(record) if record.is_enabled() => storage.insert_idle(record),
                _ => return Ok(()),
            }
        }
        if let Some(record) = storage.record(&identity) {
            candidates.push((identity, record.priority()));
        }
        Ok(())
    }
}
