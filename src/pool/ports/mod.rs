//! Port contracts consumed and produced by the pool.

mod diagnostics;
mod invalidation;
mod repository;

pub use diagnostics::DiagnosticsSink;
pub use invalidation::{
    InvalidationTransport, InvalidationTransportError, InvalidationTransportResult,
};
pub use repository::{ServerRepository, ServerRepositoryError, ServerRepositoryResult};
