//! Identifier types for delivery servers, tenants, and pool instances.

use super::PoolDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Maximum length for tenant and pool names, matching `VARCHAR(100)`.
const MAX_KEY_LENGTH: usize = 100;

/// Unique identifier for a persisted delivery server record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServerId(Uuid);

impl ServerId {
    /// Creates a new random server identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a server identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for ServerId {
    fn default() -> Self {
        Self::new()
    }
}

impl AsRef<Uuid> for ServerId {
    fn as_ref(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ServerId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Validates a tenant or pool name key.
fn validate_key(value: impl Into<String>) -> Result<String, PoolDomainError> {
    let normalized = value.into().trim().to_ascii_lowercase();

    if normalized.is_empty() {
        return Err(PoolDomainError::EmptyName);
    }

    let is_valid = normalized.chars().all(|character| {
        character.is_ascii_lowercase()
            || character.is_ascii_digit()
            || character == '_'
            || character == '-'
    });
    if !is_valid {
        return Err(PoolDomainError::InvalidName(normalized));
    }

    if normalized.len() > MAX_KEY_LENGTH {
        return Err(PoolDomainError::NameTooLong(normalized));
    }

    Ok(normalized)
}

/// Logical tenant scope for which a separate server chain may be configured.
///
/// `Global` is the synthetic "no tenant" key: it owns the baseline chain of
/// unbound servers and is always materialised before any tenant chain.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TenantKey {
    /// The synthetic "no tenant" scope.
    Global,
    /// A named tenant scope.
    Named(String),
}

impl TenantKey {
    /// Returns the synthetic global key.
    #[must_use]
    pub const fn global() -> Self {
        Self::Global
    }

    /// Creates a validated tenant key.
    ///
    /// The input is trimmed and lowercased; only `[a-z0-9_-]` is accepted.
    /// An empty or all-whitespace input resolves to [`TenantKey::Global`],
    /// the caller's way of saying "no tenant".
    ///
    /// # Errors
    ///
    /// Returns [`PoolDomainError`] when the name contains invalid characters
    /// or exceeds the length limit.
    pub fn named(value: impl Into<String>) -> Result<Self, PoolDomainError> {
        let raw = value.into();
        if raw.trim().is_empty() {
            return Ok(Self::Global);
        }
        Ok(Self::Named(validate_key(raw)?))
    }

    /// Returns whether this is the synthetic global key.
    #[must_use]
    pub const fn is_global(&self) -> bool {
        matches!(self, Self::Global)
    }
}

impl fmt::Display for TenantKey {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Global => formatter.write_str("(global)"),
            Self::Named(name) => formatter.write_str(name),
        }
    }
}

/// Identity of a tracked server within a pool's storage table.
///
/// A tenant's inline default server is configured directly on the tenant
/// rather than persisted as a standalone record, so it carries its own
/// variant instead of a synthetic record identifier. Collision with
/// persisted identifiers is impossible by construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServerIdentity {
    /// A server persisted as a standalone record.
    Persisted(ServerId),
    /// A tenant's inline default server.
    TenantDefault(TenantKey),
}

impl ServerIdentity {
    /// Returns the persisted record identifier, when applicable.
    #[must_use]
    pub const fn as_persisted(&self) -> Option<ServerId> {
        match self {
            Self::Persisted(id) => Some(*id),
            Self::TenantDefault(_) => None,
        }
    }
}

impl From<ServerId> for ServerIdentity {
    fn from(id: ServerId) -> Self {
        Self::Persisted(id)
    }
}

impl fmt::Display for ServerIdentity {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Persisted(id) => write!(formatter, "server:{id}"),
            Self::TenantDefault(tenant) => write!(formatter, "tenant-default:{tenant}"),
        }
    }
}

/// Validated human-readable delivery server name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServerName(String);

impl ServerName {
    /// Creates a validated server name.
    ///
    /// The input is trimmed and lowercased. Only characters in `[a-z0-9_-]`
    /// are accepted.
    ///
    /// # Errors
    ///
    /// Returns [`PoolDomainError`] when validation fails.
    pub fn new(value: impl Into<String>) -> Result<Self, PoolDomainError> {
        Ok(Self(validate_key(value)?))
    }

    /// Returns the server name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ServerName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ServerName {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Validated logical name of a pool instance class.
///
/// Every process instance of the same application shares one pool name; the
/// invalidation envelope is addressed to it so unrelated pools on the same
/// transport ignore the command.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PoolName(String);

impl PoolName {
    /// Creates a validated pool name.
    ///
    /// # Errors
    ///
    /// Returns [`PoolDomainError`] when validation fails.
    pub fn new(value: impl Into<String>) -> Result<Self, PoolDomainError> {
        Ok(Self(validate_key(value)?))
    }

    /// Returns the pool name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for PoolName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for PoolName {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}
