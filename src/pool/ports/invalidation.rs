//! Outbound transport port for cluster invalidation commands.

use crate::pool::domain::InvalidationCommand;
use std::sync::Arc;
use thiserror::Error;

/// Result type for invalidation transport operations.
pub type InvalidationTransportResult<T> = Result<T, InvalidationTransportError>;

/// Fire-and-forget publisher for invalidation commands.
///
/// The deployment's messaging layer (bus, gossip, shared signalling store)
/// sits behind this port and redelivers commands to every peer instance.
/// Delivery failures are not retried here; an undelivered command only
/// extends a peer's staleness window until its own next flush.
pub trait InvalidationTransport: Send + Sync {
    /// Publishes a command to every peer instance, best effort.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidationTransportError`] when the transport rejects the
    /// command outright. Callers log and continue.
    fn publish(&self, command: InvalidationCommand) -> InvalidationTransportResult<()>;
}

/// Errors returned by invalidation transport implementations.
#[derive(Debug, Clone, Error)]
pub enum InvalidationTransportError {
    /// The transport is no longer accepting commands.
    #[error("invalidation transport is closed")]
    Closed,

    /// Transport-layer failure.
    #[error("invalidation transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl InvalidationTransportError {
    /// Wraps a transport-layer failure.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}
