//! Channel-backed invalidation transport.

use crate::pool::domain::InvalidationCommand;
use crate::pool::ports::{
    InvalidationTransport, InvalidationTransportError, InvalidationTransportResult,
};
use tokio::sync::mpsc;

/// Publishes invalidation commands onto an in-process channel.
///
/// The deployment's messaging layer consumes the receiving end and forwards
/// each command to peer instances over whatever mechanism it provides (bus,
/// gossip, shared signalling store). The pool side stays transport-agnostic.
#[derive(Debug, Clone)]
pub struct ChannelInvalidationBus {
    sender: mpsc::UnboundedSender<InvalidationCommand>,
}

impl ChannelInvalidationBus {
    /// Creates a bus and the receiver the messaging layer consumes.
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<InvalidationCommand>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }

    /// Wraps an existing sender.
    #[must_use]
    pub const fn new(sender: mpsc::UnboundedSender<InvalidationCommand>) -> Self {
        Self { sender }
    }
}

impl InvalidationTransport for ChannelInvalidationBus {
    fn publish(&self, command: InvalidationCommand) -> InvalidationTransportResult<()> {
        self.sender
            .send(command)
            .map_err(|_| InvalidationTransportError::Closed)
    }
}
