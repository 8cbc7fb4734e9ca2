//! Orchestrator - the experiment loop
//!
//! Runs the trial engine once per trial and aggregates the counts.
//!
//! See `engine.rs` for full implementation.

pub mod engine;


// Re-export main types for convenience
pub use engine::{run_experiment, Experiment, ExperimentResult, SimulationError};
