//! Per-tenant ordered candidate chain.

use super::ServerIdentity;

/// Ordered candidate list for one tenant, highest priority first.
///
/// A chain holds identities, not records: the pool resolves each identity
/// against its storage table at scan time so that availability and record
/// contents are always read from the live view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Chain(Vec<ServerIdentity>);

impl Chain {
    /// Creates a chain from an already-ordered candidate list.
    #[must_use]
    pub const fn new(identities: Vec<ServerIdentity>) -> Self {
        Self(identities)
    }

    /// Returns whether the chain has no candidates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of candidates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates candidates in scan order.
    pub fn iter(&self) -> impl Iterator<Item = &ServerIdentity> {
        self.0.iter()
    }

    /// Returns the candidates in scan order.
    #[must_use]
    pub fn identities(&self) -> &[ServerIdentity] {
        &self.0
    }
}

impl<'a> IntoIterator for &'a Chain {
    type Item = &'a ServerIdentity;
    type IntoIter = std::slice::Iter<'a, ServerIdentity>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
