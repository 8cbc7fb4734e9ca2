//! Domain models for the channel simulator

pub mod event;
pub mod machine;

// Re-exports
pub use event::{Event, EventLog};
pub use machine::{MachinePool, MachineState};
