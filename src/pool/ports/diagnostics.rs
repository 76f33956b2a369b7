//! Diagnostics port for failures the pool swallows on the hot path.

use crate::pool::domain::TenantKey;
use crate::pool::ports::ServerRepositoryError;

/// Error-reporting collaborator for degraded acquire outcomes.
///
/// Chain-build failures inside `acquire_next` are converted to a temporary
/// unavailability rather than propagated, since one tenant's misconfiguration
/// or a transient repository hiccup must not crash unrelated senders. This
/// port is where those swallowed failures surface.
pub trait DiagnosticsSink: Send + Sync {
    /// Reports a chain-build failure that was degraded to
    /// temporary unavailability.
    fn chain_build_failed(&self, tenant: &TenantKey, error: &ServerRepositoryError);
}
