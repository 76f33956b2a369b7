//! Relaypool: exclusive delivery-server pool with cluster invalidation.
//!
//! This crate selects, tracks, and exclusively hands out delivery servers
//! (outbound relay endpoints) to senders. Each process instance keeps its
//! own in-memory view of which servers exist, which are busy, and in what
//! priority order a given tenant should try them; configuration changes on
//! any instance converge across the cluster through a best-effort flush
//! broadcast.
//!
//! # Architecture
//!
//! Relaypool follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (in-memory, channels)
//!
//! # Modules
//!
//! - [`pool`]: The server pool engine, tenant chains, and invalidation

pub mod pool;
