//! In-memory adapter implementations.

mod diagnostics;
mod repository;
mod transport;

pub use diagnostics::{NullDiagnostics, RecordingDiagnostics};
pub use repository::InMemoryServerRepository;
pub use transport::RecordingInvalidationBus;
