//! Type conversion utilities for FFI boundary
//!
//! Converts between Rust types and PyO3-compatible types (PyDict, PyList).

use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};

use crate::config::{SimulationConfig, DEFAULT_RNG_SEED};
use crate::estimator::MarginNormalization;
use crate::orchestrator::ExperimentResult;
use crate::trial::TrialOutcome;

// ========================================================================
// PyDict Extraction Helpers
// ========================================================================

/// Extract a required field from a Python dict with clear error messages.
fn extract_required<T>(dict: &Bound<'_, PyDict>, key: &str) -> PyResult<T>
where
    for<'py> T: FromPyObject<'py>,
{
    dict.get_item(key)?
        .ok_or_else(|| {
            PyErr::new::<pyo3::exceptions::PyValueError, _>(format!(
                "Missing required field '{}'",
                key
            ))
        })?
        .extract()
}

/// Extract an optional field from a Python dict.
///
/// Returns an error only if type conversion fails (not if the field is missing).
fn extract_optional<T>(dict: &Bound<'_, PyDict>, key: &str) -> PyResult<Option<T>>
where
    for<'py> T: FromPyObject<'py>,
{
    match dict.get_item(key)? {
        Some(value) => Ok(Some(value.extract()?)),
        None => Ok(None),
    }
}

// ========================================================================
// Python -> Rust
// ========================================================================

/// Build a SimulationConfig from a Python dict
///
/// Validation happens when the experiment is created.
pub fn parse_simulation_config(dict: &Bound<'_, PyDict>) -> PyResult<SimulationConfig> {
    let margin_normalization = match extract_optional::<String>(dict, "margin_normalization")? {
        Some(name) => name
            .parse::<MarginNormalization>()
            .map_err(PyErr::new::<pyo3::exceptions::PyValueError, _>)?,
        None => MarginNormalization::default(),
    };

    Ok(SimulationConfig {
        machine_count: extract_required(dict, "machine_count")?,
        channel_capacity: extract_required(dict, "channel_capacity")?,
        tick_probability: extract_required(dict, "tick_probability")?,
        trial_count: extract_required(dict, "trial_count")?,
        observation_interval: extract_required(dict, "observation_interval")?,
        confidence_quantile: extract_required(dict, "confidence_quantile")?,
        connection_rate: extract_required(dict, "connection_rate")?,
        release_rate: extract_required(dict, "release_rate")?,
        rng_seed: extract_optional(dict, "rng_seed")?.unwrap_or(DEFAULT_RNG_SEED),
        margin_normalization,
    })
}

// ========================================================================
// Rust -> Python
// ========================================================================

/// Convert one trial's counts to a Python dict
pub fn trial_outcome_to_py(py: Python, outcome: &TrialOutcome) -> PyResult<Py<PyDict>> {
    let dict = PyDict::new(py);
    dict.set_item("attempts", outcome.attempts)?;
    dict.set_item("denials", outcome.denials)?;
    dict.set_item("ticks", outcome.ticks)?;
    Ok(dict.into())
}

/// Convert the aggregate result to a Python dict
pub fn experiment_result_to_py(py: Python, result: &ExperimentResult) -> PyResult<Py<PyDict>> {
    let dict = PyDict::new(py);

    dict.set_item("per_trial_attempts", PyList::new(py, &result.per_trial_attempts)?)?;
    dict.set_item("per_trial_denials", PyList::new(py, &result.per_trial_denials)?)?;
    dict.set_item("total_attempts", result.total_attempts)?;
    dict.set_item("total_denials", result.total_denials)?;
    dict.set_item("ticks_per_trial", result.ticks_per_trial)?;
    dict.set_item("failure_probability", result.estimate.failure_probability())?;
    dict.set_item("lower_bound", result.estimate.lower_bound())?;
    dict.set_item("upper_bound", result.estimate.upper_bound())?;

    Ok(dict.into())
}
