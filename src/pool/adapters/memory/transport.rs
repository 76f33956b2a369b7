//! Recording invalidation transport for tests.

use crate::pool::domain::InvalidationCommand;
use crate::pool::ports::{
    InvalidationTransport, InvalidationTransportError, InvalidationTransportResult,
};
use std::sync::{Arc, RwLock};

/// Transport that captures published commands instead of delivering them.
///
/// Tests drain the captured commands and hand them to peer pools'
/// `apply` to exercise cross-instance convergence deterministically.
#[derive(Debug, Clone, Default)]
pub struct RecordingInvalidationBus {
    commands: Arc<RwLock<Vec<InvalidationCommand>>>,
}

impl RecordingInvalidationBus {
    /// Creates an empty recording bus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns every captured command, in publish order.
    #[must_use]
    pub fn drain(&self) -> Vec<InvalidationCommand> {
        self.commands
            .write()
            .map(|mut commands| commands.drain(..).collect())
            .unwrap_or_default()
    }
}

impl InvalidationTransport for RecordingInvalidationBus {
    fn publish(&self, command: InvalidationCommand) -> InvalidationTransportResult<()> {
        let mut commands = self.commands.write().map_err(|err| {
            InvalidationTransportError::transport(std::io::Error::other(err.to_string()))
        })?;
        commands.push(command);
        Ok(())
    }
}
