//! Channel Simulator Core - Rust Engine
//!
//! Monte Carlo estimation of the probability that a connection attempt to a
//! shared pool of channels is denied.
//!
//! # Architecture
//!
//! - **config**: Experiment parameters (JSON or legacy flat file)
//! - **core**: Virtual time for one observation window
//! - **models**: Machine states and the event log
//! - **trial**: One trial over the machine pool (tick rule + capacity check)
//! - **orchestrator**: Repeats trials and aggregates counts
//! - **estimator**: Failure probability and confidence interval
//! - **report**: Structured report, text table
//! - **rng**: Deterministic random number generation
//!
//! # Critical Invariants
//!
//! 1. Connected machines never exceed the channel capacity
//! 2. Denials never exceed attempts
//! 3. All randomness is deterministic (one seeded RNG per experiment)
//! 4. An experiment without attempts yields an undefined estimate, never NaN

// Module declarations
pub mod config;
pub mod core;
pub mod estimator;
pub mod models;
pub mod orchestrator;
pub mod report;
pub mod rng;
pub mod trial;

// Re-exports for convenience
pub use config::{ConfigError, SimulationConfig};
pub use core::time::TickClock;
pub use estimator::{Estimate, IntervalEstimate, MarginNormalization, Totals};
pub use models::{
    event::{Event, EventLog},
    machine::{MachinePool, MachineState},
};
pub use orchestrator::{run_experiment, Experiment, ExperimentResult, SimulationError};
pub use report::{build_report, render_table, Report};
pub use rng::{RandomSource, RngManager};
pub use trial::{TickOutcome, TrialEngine, TrialOutcome};

// FFI module (when feature enabled)
#[cfg(feature = "pyo3")]
pub mod ffi;

// PyO3 exports (when feature enabled)
#[cfg(feature = "pyo3")]
use pyo3::prelude::*;

#[cfg(feature = "pyo3")]
#[pymodule]
fn channel_sim_core_rs(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<ffi::experiment::PyExperiment>()?;
    Ok(())
}
