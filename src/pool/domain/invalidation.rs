//! Cluster invalidation command envelope.
//!
//! When one instance mutates the persisted configuration it emits this
//! command; every peer instance applies it to its own local pool. Delivery
//! is best effort and the command is idempotent, so no sequencing or
//! deduplication is layered on top.

use super::PoolName;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Action requested of the receiving pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidationAction {
    /// Discard cached chains and reload the record table.
    Flush,
}

impl fmt::Display for InvalidationAction {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flush => formatter.write_str("flush"),
        }
    }
}

/// Named-command envelope carried across the deployment's messaging layer.
///
/// The wire form is `{"targetName": ..., "action": ..., "payload": ...}`;
/// the payload is reserved for future actions and always `null` for `Flush`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidationCommand {
    target_name: PoolName,
    action: InvalidationAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    payload: Option<Value>,
}

impl InvalidationCommand {
    /// Creates a flush command addressed to the given pool.
    #[must_use]
    pub const fn flush(target_name: PoolName) -> Self {
        Self {
            target_name,
            action: InvalidationAction::Flush,
            payload: None,
        }
    }

    /// Returns the addressed pool name.
    #[must_use]
    pub const fn target_name(&self) -> &PoolName {
        &self.target_name
    }

    /// Returns the requested action.
    #[must_use]
    pub const fn action(&self) -> InvalidationAction {
        self.action
    }

    /// Returns the optional payload.
    #[must_use]
    pub const fn payload(&self) -> Option<&Value> {
        self.payload.as_ref()
    }

    /// Returns whether the command is addressed to the given pool.
    #[must_use]
    pub fn is_for(&self, pool_name: &PoolName) -> bool {
        self.target_name == *pool_name
    }
}
