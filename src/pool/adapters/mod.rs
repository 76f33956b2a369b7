//! Adapter implementations of the pool's port contracts.

mod channel;
pub mod memory;

pub use channel::ChannelInvalidationBus;
pub use memory::{
    InMemoryServerRepository, NullDiagnostics, RecordingDiagnostics, RecordingInvalidationBus,
};
