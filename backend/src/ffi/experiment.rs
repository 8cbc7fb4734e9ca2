//! PyO3 wrapper for Experiment
//!
//! This module provides the Python interface to the Rust experiment runner.

use pyo3::prelude::*;
use pyo3::types::PyDict;

use super::types::{experiment_result_to_py, parse_simulation_config, trial_outcome_to_py};
use crate::orchestrator::Experiment as RustExperiment;

/// Python wrapper for Rust Experiment
///
/// # Example (from Python)
///
/// ```python
/// from channel_sim_core_rs import Experiment
///
/// config = {
///     "machine_count": 3,
///     "channel_capacity": 1,
///     "tick_probability": 0.1,
///     "trial_count": 100,
///     "observation_interval": 10.0,
///     "confidence_quantile": 1.96,
///     "connection_rate": [1.0, 1.0, 2.0],
///     "release_rate": [3.0, 3.0, 3.0],
/// }
///
/// exp = Experiment(config)
/// result = exp.run()
/// print(result["failure_probability"])
/// ```
#[pyclass(name = "Experiment")]
pub struct PyExperiment {
    inner: RustExperiment,
}

#[pymethods]
impl PyExperiment {
    /// Create a new experiment from a configuration dict
    ///
    /// # Errors
    ///
    /// Raises ValueError if a field is missing, has the wrong type, or the
    /// configuration fails validation.
    #[new]
    fn new(config: &Bound<'_, PyDict>) -> PyResult<Self> {
        let rust_config = parse_simulation_config(config)?;

        let inner = RustExperiment::new(rust_config).map_err(|e| {
            PyErr::new::<pyo3::exceptions::PyValueError, _>(format!(
                "Failed to create experiment: {}",
                e
            ))
        })?;

        Ok(PyExperiment { inner })
    }

    /// Run the next trial
    ///
    /// Returns a dict with `attempts`, `denials` and `ticks`, or None once
    /// every configured trial has run.
    fn run_trial(&mut self, py: Python) -> PyResult<Option<Py<PyDict>>> {
        self.inner
            .run_trial()
            .map(|outcome| trial_outcome_to_py(py, &outcome))
            .transpose()
    }

    /// Run every remaining trial and return the aggregate result
    ///
    /// `failure_probability`, `lower_bound` and `upper_bound` are None when
    /// no attempts were observed.
    fn run(&mut self, py: Python) -> PyResult<Py<PyDict>> {
        let result = self.inner.run();
        experiment_result_to_py(py, &result)
    }

    /// Number of trials run so far
    fn trials_completed(&self) -> usize {
        self.inner.trials_completed()
    }
}
