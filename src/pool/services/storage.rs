//! Process-local record table and chain cache.

use crate::pool::domain::{AvailabilityState, Chain, ServerIdentity, ServerRecord, TenantKey};
use std::collections::HashMap;

/// One tracked server: its record plus its process-local availability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedServer {
    record: ServerRecord,
    availability: AvailabilityState,
}

impl TrackedServer {
    /// Tracks a record in the initial `Idle` state.
    #[must_use]
    pub const fn idle(record: ServerRecord) -> Self {
        Self {
            record,
            availability: AvailabilityState::Idle,
        }
    }

    /// Returns the record.
    #[must_use]
    pub const fn record(&self) -> &ServerRecord {
        &self.record
    }

    /// Returns the availability state.
    #[must_use]
    pub const fn availability(&self) -> AvailabilityState {
        self.availability
    }
}

/// Thread-unsafe record table; the owning pool guards it with its lock.
///
/// Maps server identity to the live record and its availability. Records
/// enter the table either through a flush reload or lazily when a chain
/// build encounters an identity not yet tracked.
#[derive(Debug, Default)]
pub struct PoolStorage {
    servers: HashMap<ServerIdentity, TrackedServer>,
}

impl PoolStorage {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of tracked servers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.servers.len()
    }

    /// Returns whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }

    /// Returns whether the identity is tracked.
    #[must_use]
    pub fn contains(&self, identity: &ServerIdentity) -> bool {
        self.servers.contains_key(identity)
    }

    /// Returns the tracked record for an identity.
    #[must_use]
    pub fn record(&self, identity: &ServerIdentity) -> Option<&ServerRecord> {
        self.servers.get(identity).map(TrackedServer::record)
    }

    /// Returns the availability of an identity, if tracked.
    #[must_use]
    pub fn availability(&self, identity: &ServerIdentity) -> Option<AvailabilityState> {
        self.servers.get(identity).map(TrackedServer::availability)
    }

    /// Inserts a record in the `Idle` state unless the identity is already
    /// tracked, in which case the existing entry (and its availability) is
    /// left untouched.
    pub fn insert_idle(&mut self, record: ServerRecord) {
        self.servers
            .entry(record.identity().clone())
            .or_insert_with(|| TrackedServer::idle(record));
    }

    /// Marks an identity busy. Returns the record when the transition
    /// happened, `None` when the identity is unknown or already busy.
    pub fn mark_busy(&mut self, identity: &ServerIdentity) -> Option<ServerRecord> {
        let tracked = self.servers.get_mut(identity)?;
        if !tracked.availability.is_idle() {
            return None;
        }
        tracked.availability = AvailabilityState::Busy;
        Some(tracked.record.clone())
    }

    /// Marks an identity idle. Unknown or stale identities are a silent
    /// no-op: callers may race with a concurrent flush.
    pub fn mark_idle(&mut self, identity: &ServerIdentity) {
        if let Some(tracked) = self.servers.get_mut(identity) {
            tracked.availability = AvailabilityState::Idle;
        }
    }

    /// Forces every tracked server idle.
    pub fn release_all(&mut self) {
        for tracked in self.servers.values_mut() {
            tracked.availability = AvailabilityState::Idle;
        }
    }

    /// Replaces the table with a fresh repository snapshot, preserving the
    /// availability of every identity that survives the reload. Identities
    /// absent from the snapshot are dropped.
    pub fn reload(&mut self, records: Vec<ServerRecord>) {
        let mut next = HashMap::with_capacity(records.len());
        for record in records {
            let identity = record.identity().clone();
            let availability = self
                .servers
                .get(&identity)
                .map_or(AvailabilityState::Idle, TrackedServer::availability);
            next.insert(
                identity,
                TrackedServer {
                    record,
                    availability,
                },
            );
        }
        self.servers = next;
    }
}

/// Memoised chains keyed by tenant, discarded wholesale on flush.
#[derive(Debug, Default)]
pub struct ChainCache {
    chains: HashMap<TenantKey, Chain>,
}

impl ChainCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached chain for a tenant.
    #[must_use]
    pub fn get(&self, tenant: &TenantKey) -> Option<&Chain> {
        self.chains.get(tenant)
    }

    /// Returns whether a chain is cached for the tenant.
    #[must_use]
    pub fn contains(&self, tenant: &TenantKey) -> bool {
        self.chains.contains_key(tenant)
    }

    /// Caches a tenant's chain, replacing any previous entry.
    pub fn insert(&mut self, tenant: TenantKey, chain: Chain) {
        self.chains.insert(tenant, chain);
    }

    /// Discards every cached chain. Rebuilding is cheap; correctness after a
    /// configuration change matters more than cache retention.
    pub fn clear(&mut self) {
        self.chains.clear();
    }
}
