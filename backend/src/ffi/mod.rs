//! Python bindings (feature `pyo3`)

pub mod experiment;
pub mod types;
