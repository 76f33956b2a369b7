//! Domain model for the delivery server pool.
//!
//! The pool domain models server identity, record contents, per-process
//! availability, tenant candidate chains, and the cluster invalidation
//! envelope. Infrastructure concerns remain outside this boundary.

mod availability;
mod chain;
mod error;
mod ids;
mod invalidation;
mod record;

pub use availability::AvailabilityState;
pub use chain::Chain;
pub use error::{ParseAvailabilityStateError, ParsePriorityTierError, PoolDomainError};
pub use ids::{PoolName, ServerId, ServerIdentity, ServerName, TenantKey};
pub use invalidation::{InvalidationAction, InvalidationCommand};
pub use record::{
    Credentials, PersistedServerData, PriorityTier, Secret, ServerRecord, ServerSettings,
};
