//! The delivery server pool engine.

use crate::pool::domain::{
    InvalidationAction, InvalidationCommand, PoolName, ServerIdentity, ServerRecord, TenantKey,
};
use crate::pool::ports::{
    DiagnosticsSink, ServerRepository, ServerRepositoryError, ServerRepositoryResult,
};
use crate::pool::services::{ChainBuilder, ChainCache, PoolStorage};
use mockable::Clock;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Outcome of one acquire attempt.
///
/// `acquire_next` never returns an error: every failure mode is resolved to
/// one of these three outcomes so that a single tenant's misconfiguration or
/// a transient repository hiccup cannot crash unrelated senders.
#[derive(Debug, Clone)]
pub enum Acquisition {
    /// A server was found idle, marked busy, and handed out exclusively.
    /// The caller must release it on every exit path.
    Available(ServerRecord),
    /// Every candidate is currently busy, or the chain could not be built.
    /// Retry later; the diagnostic is present only in the degraded case.
    TemporarilyUnavailable(Option<ServerRepositoryError>),
    /// The tenant has no enabled candidates at all, not even a global
    /// fallback. Do not retry until configuration changes.
    PermanentlyUnavailable,
}

impl Acquisition {
    /// Returns the acquired record, if any.
    #[must_use]
    pub const fn record(&self) -> Option<&ServerRecord> {
        match self {
            Self::Available(record) => Some(record),
            Self::TemporarilyUnavailable(_) | Self::PermanentlyUnavailable => None,
        }
    }

    /// Returns whether a server was handed out.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }
}

#[derive(Debug, Default)]
struct PoolState {
    storage: PoolStorage,
    chains: ChainCache,
}

/// Exclusive, priority-ordered delivery server pool for one process.
///
/// One mutex serialises every operation, so the chain-lookup-or-build step
/// and the idle-scan-and-mark-busy step are atomic with respect to
/// concurrent acquires, releases, and flushes: an acquire that is mid-flight
/// completes against either the pre-flush or the post-flush view, never a
/// mixture.
///
/// Acquisition is non-blocking: when every candidate is busy the pool
/// reports a temporary unavailability immediately instead of queueing the
/// caller. Backpressure is the caller's responsibility.
pub struct ServerPool<R, D, C>
where
    R: ServerRepository,
    D: DiagnosticsSink,
    C: Clock + Send + Sync,
{
    name: PoolName,
    repository: Arc<R>,
    diagnostics: Arc<D>,
    clock: Arc<C>,
    state: Mutex<PoolState>,
}

impl<R, D, C> ServerPool<R, D, C>
where
    R: ServerRepository,
    D: DiagnosticsSink,
    C: Clock + Send + Sync,
{
    /// Creates an empty pool. Records load lazily through chain builds or
    /// eagerly through [`ServerPool::flush`].
    #[must_use]
    pub fn new(name: PoolName, repository: Arc<R>, diagnostics: Arc<D>, clock: Arc<C>) -> Self {
        Self {
            name,
            repository,
            diagnostics,
            clock,
            state: Mutex::new(PoolState::default()),
        }
    }

    /// Returns the pool's logical name.
    #[must_use]
    pub const fn name(&self) -> &PoolName {
        &self.name
    }

    /// Hands out the first idle server in the tenant's chain, marking it
    /// busy.
    ///
    /// The global baseline chain is materialised before the tenant's own
    /// chain. An empty chain yields [`Acquisition::PermanentlyUnavailable`];
    /// an exhausted one yields [`Acquisition::TemporarilyUnavailable`] with
    /// no state mutated. Chain-build failures are reported to the
    /// diagnostics sink and degraded to a temporary unavailability.
    pub async fn acquire_next(&self, tenant: &TenantKey) -> Acquisition {
        let mut state = self.state.lock().await;

        if let Err(error) = self.ensure_chains(&mut state, tenant).await {
            tracing::warn!(
                pool = %self.name,
                %tenant,
                %error,
                "chain build failed; degrading to temporary unavailability"
            );
            self.diagnostics.chain_build_failed(tenant, &error);
            return Acquisition::TemporarilyUnavailable(Some(error));
        }

        Self::scan_chain(&mut state, tenant)
    }

    /// Returns a previously acquired server to the idle state.
    ///
    /// Releasing an identity that is no longer tracked is a no-op, not an
    /// error: the caller may have raced with a concurrent flush that dropped
    /// the record.
    pub async fn release(&self, identity: &ServerIdentity) {
        let mut state = self.state.lock().await;
        state.storage.mark_idle(identity);
    }

    /// Forces every tracked server idle.
    ///
    /// Recovery sweep for when prior acquisitions are suspected stuck, e.g.
    /// after a watchdog signal.
    pub async fn release_all(&self) {
        let mut state = self.state.lock().await;
        state.storage.release_all();
        tracing::debug!(pool = %self.name, "released all tracked servers");
    }

    /// Reloads the record table from the repository and discards every
    /// cached chain.
    ///
    /// Availability carries over by identity for records that survive the
    /// reload; new and unknown identities start idle.
    ///
    /// # Errors
    ///
    /// Returns repository errors unchanged; the pre-flush view stays in
    /// place when the reload fails.
    pub async fn flush(&self) -> ServerRepositoryResult<()> {
        let mut state = self.state.lock().await;
        let records = self.repository.get_all_enabled_records().await?;
        let count = records.len();
        state.storage.reload(records);
        state.chains.clear();
        tracing::debug!(pool = %self.name, records = count, "flushed pool");
        Ok(())
    }

    /// Applies an invalidation command received from the cluster transport.
    ///
    /// Commands addressed to another pool are ignored. Flush commands are
    /// idempotent and order-independent, so duplicated or reordered delivery
    /// produces the same end state. A failed flush leaves the stale view in
    /// place until the next flush-triggering event.
    pub async fn apply(&self, command: &InvalidationCommand) {
        if !command.is_for(&self.name) {
            tracing::debug!(
                pool = %self.name,
                target = %command.target_name(),
                "ignoring invalidation command for another pool"
            );
            return;
        }
        match command.action() {
            InvalidationAction::Flush => {
                if let Err(error) = self.flush().await {
                    tracing::warn!(
                        pool = %self.name,
                        %error,
                        "flush requested by invalidation command failed"
                    );
                }
            }
        }
    }

    async fn ensure_chains(
        &self,
        state: &mut PoolState,
        tenant: &TenantKey,
    ) -> ServerRepositoryResult<()> {
        let builder = ChainBuilder::new(&*self.repository);
        let global = TenantKey::global();
        if !state.chains.contains(&global) {
            let chain = builder.build(&global, &mut state.storage, &*self.clock).await?;
            state.chains.insert(global, chain);
        }
        if !tenant.is_global() && !state.chains.contains(tenant) {
            let chain = builder.build(tenant, &mut state.storage, &*self.clock).await?;
            state.chains.insert(tenant.clone(), chain);
        }
        Ok(())
    }

    fn scan_chain(state: &mut PoolState, tenant: &TenantKey) -> Acquisition {
        let Some(chain) = state.chains.get(tenant) else {
            return Acquisition::PermanentlyUnavailable;
        };
        if chain.is_empty() {
            return Acquisition::PermanentlyUnavailable;
        }

        let candidate = chain
            .iter()
            .find(|identity| {
                state
                    .storage
                    .availability(identity)
                    .is_some_and(crate::pool::domain::AvailabilityState::is_idle)
            })
            .cloned();

        candidate
            .and_then(|identity| state.storage.mark_busy(&identity))
            .map_or(Acquisition::TemporarilyUnavailable(None), |record| {
                tracing::debug!(%tenant, identity = %record.identity(), "acquired server");
                Acquisition::Available(record)
            })
    }
}
