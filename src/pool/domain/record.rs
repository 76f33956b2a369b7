//! Delivery server record aggregate and its value types.

use super::{ParsePriorityTierError, PoolDomainError, ServerIdentity, ServerName};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse-grained preference ranking used to order chain candidates.
///
/// Higher tiers are always tried first; declaration order gives `Ord`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum PriorityTier {
    /// Last-resort servers.
    Low,
    /// Default tier for freshly created servers.
    Normal,
    /// Preferred servers, always scanned first.
    High,
}

impl PriorityTier {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Normal => "normal",
            Self::High => "high",
        }
    }
}

impl fmt::Display for PriorityTier {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl TryFrom<&str> for PriorityTier {
    type Error = ParsePriorityTierError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "low" => Ok(Self::Low),
            "normal" => Ok(Self::Normal),
            "high" => Ok(Self::High),
            _ => Err(ParsePriorityTierError(value.to_owned())),
        }
    }
}

/// Credential secret that never appears in logs or debug output.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    /// Wraps a raw secret value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Grants access to the raw value for the protocol client.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("Secret(«redacted»)")
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("«redacted»")
    }
}

/// Authentication credentials for one delivery server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    username: String,
    secret: Secret,
}

impl Credentials {
    /// Creates credentials from a username and secret.
    ///
    /// # Errors
    ///
    /// Returns [`PoolDomainError::EmptyUsername`] when the username is empty
    /// after trimming.
    pub fn new(
        username: impl Into<String>,
        secret: Secret,
    ) -> Result<Self, PoolDomainError> {
        let trimmed = username.into().trim().to_owned();
        if trimmed.is_empty() {
            return Err(PoolDomainError::EmptyUsername);
        }
        Ok(Self {
            username: trimmed,
            secret,
        })
    }

    /// Returns the username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the secret.
    #[must_use]
    pub const fn secret(&self) -> &Secret {
        &self.secret
    }
}

/// Connection settings shared by persisted servers and tenant-inline
/// defaults.
///
/// A tenant-inline default carries these settings directly in tenant
/// configuration; the pool synthesises a [`ServerRecord`] from them when it
/// first builds that tenant's chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Human-readable server name.
    pub name: ServerName,
    /// Authentication credentials.
    pub credentials: Credentials,
    /// Whether the transport is wrapped in TLS.
    pub use_secure_transport: bool,
    /// Chain ordering tier.
    pub priority: PriorityTier,
}

/// Delivery server record aggregate root.
///
/// The identity is immutable once the record is constructed; everything else
/// may change through administrative mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerRecord {
    identity: ServerIdentity,
    name: ServerName,
    credentials: Credentials,
    use_secure_transport: bool,
    priority: PriorityTier,
    enabled: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing persisted record state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedServerData {
    /// Persisted server identity.
    pub identity: ServerIdentity,
    /// Persisted server name.
    pub name: ServerName,
    /// Persisted credentials.
    pub credentials: Credentials,
    /// Persisted transport security flag.
    pub use_secure_transport: bool,
    /// Persisted priority tier.
    pub priority: PriorityTier,
    /// Persisted enabled flag.
    pub enabled: bool,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl ServerRecord {
    /// Creates a new enabled record from connection settings.
    #[must_use]
    pub fn new(identity: ServerIdentity, settings: ServerSettings, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            identity,
            name: settings.name,
            credentials: settings.credentials,
            use_secure_transport: settings.use_secure_transport,
            priority: settings.priority,
            enabled: true,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a record from persistence.
    #[must_use]
    pub fn from_persisted(data: PersistedServerData) -> Self {
        Self {
            identity: data.identity,
            name: data.name,
            credentials: data.credentials,
            use_secure_transport: data.use_secure_transport,
            priority: data.priority,
            enabled: data.enabled,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the server identity.
    #[must_use]
    pub const fn identity(&self) -> &ServerIdentity {
        &self.identity
    }

    /// Returns the validated server name.
    #[must_use]
    pub const fn name(&self) -> &ServerName {
        &self.name
    }

    /// Returns the credentials.
    #[must_use]
    pub const fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Returns whether the transport is wrapped in TLS.
    #[must_use]
    pub const fn use_secure_transport(&self) -> bool {
        self.use_secure_transport
    }

    /// Returns the priority tier.
    #[must_use]
    pub const fn priority(&self) -> PriorityTier {
        self.priority
    }

    /// Returns whether the record is eligible for chain membership.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Renames the server.
    pub fn rename(&mut self, name: ServerName, clock: &impl Clock) {
        self.name = name;
        self.touch(clock);
    }

    /// Replaces the credentials.
    pub fn set_credentials(&mut self, credentials: Credentials, clock: &impl Clock) {
        self.credentials = credentials;
        self.touch(clock);
    }

    /// Changes the priority tier.
    pub fn set_priority(&mut self, priority: PriorityTier, clock: &impl Clock) {
        self.priority = priority;
        self.touch(clock);
    }

    /// Changes the transport security flag.
    pub fn set_secure_transport(&mut self, use_secure_transport: bool, clock: &impl Clock) {
        self.use_secure_transport = use_secure_transport;
        self.touch(clock);
    }

    /// Makes the record eligible for chain membership.
    pub fn enable(&mut self, clock: &impl Clock) {
        self.enabled = true;
        self.touch(clock);
    }

    /// Excludes the record from chain membership without deleting it.
    pub fn disable(&mut self, clock: &impl Clock) {
        self.enabled = false;
        self.touch(clock);
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
