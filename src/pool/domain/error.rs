//! Error types for pool domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing pool domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PoolDomainError {
    /// The name is empty after trimming.
    #[error("name must not be empty")]
    EmptyName,

    /// The name contains characters outside `[a-z0-9_-]`.
    #[error("name '{0}' contains invalid characters (only lowercase alphanumeric, underscore and hyphen allowed)")]
    InvalidName(String),

    /// The name exceeds the 100-character storage limit.
    #[error("name exceeds 100 character limit: {0}")]
    NameTooLong(String),

    /// The credential username is empty after trimming.
    #[error("credential username must not be empty")]
    EmptyUsername,
}

/// Error returned while parsing a priority tier from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown priority tier: {0}")]
pub struct ParsePriorityTierError(pub String);

/// Error returned while parsing an availability state from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown availability state: {0}")]
pub struct ParseAvailabilityStateError(pub String);
