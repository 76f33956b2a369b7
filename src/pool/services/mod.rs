//! Orchestration services: the pool engine, chain construction, and the
//! administrative surface.

mod admin;
mod chain;
mod pool;
mod storage;

pub use admin::{PoolAdminError, PoolAdminResult, PoolAdminService, UpdateServerRequest};
pub use chain::ChainBuilder;
pub use pool::{Acquisition, ServerPool};
pub use storage::{ChainCache, PoolStorage, TrackedServer};
