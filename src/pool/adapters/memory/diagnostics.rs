//! Diagnostics sinks for tests and deployments without a reporting backend.

use crate::pool::domain::TenantKey;
use crate::pool::ports::{DiagnosticsSink, ServerRepositoryError};
use std::sync::{Arc, RwLock};

/// Sink that drops every report.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullDiagnostics;

impl DiagnosticsSink for NullDiagnostics {
    fn chain_build_failed(&self, _tenant: &TenantKey, _error: &ServerRepositoryError) {}
}

/// Sink that records every report for later assertions.
#[derive(Debug, Clone, Default)]
pub struct RecordingDiagnostics {
    reports: Arc<RwLock<Vec<(TenantKey, ServerRepositoryError)>>>,
}

impl RecordingDiagnostics {
    /// Creates an empty recording sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the reports captured so far.
    #[must_use]
    pub fn reported(&self) -> Vec<(TenantKey, ServerRepositoryError)> {
        self.reports
            .read()
            .map(|reports| reports.clone())
            .unwrap_or_default()
    }
}

impl DiagnosticsSink for RecordingDiagnostics {
    fn chain_build_failed(&self, tenant: &TenantKey, error: &ServerRepositoryError) {
        if let Ok(mut reports) = self.reports.write() {
            reports.push((tenant.clone(), error.clone()));
        }
    }
}
