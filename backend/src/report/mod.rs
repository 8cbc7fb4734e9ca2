//! Reporting - structured view of an experiment result
//!
//! [`build_report`] is a pure function from the config and the aggregate
//! result to a [`Report`]. The report renders as a fixed-width text table
//! ([`render_table`]) or as JSON through serde.

mod table;

pub use table::render_table;

use crate::config::{ConfigError, SimulationConfig};
use crate::estimator::MarginNormalization;
use crate::orchestrator::ExperimentResult;
use serde::{Deserialize, Serialize};

/// Rates of one machine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineRow {
    /// 1-based machine number
    pub machine: usize,
    pub connection_rate: f64,
    pub release_rate: f64,
}

/// Counts of one trial
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialRow {
    /// 1-based trial number
    pub trial: usize,
    pub attempts: u64,
    pub denials: u64,
}

/// Everything a presentation layer needs to show an experiment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub machines: Vec<MachineRow>,
    pub channel_capacity: usize,
    pub trials: Vec<TrialRow>,
    pub ticks_per_trial: usize,
    pub total_attempts: u64,
    pub total_denials: u64,

    /// `None` when no attempts were observed
    pub failure_probability: Option<f64>,
    pub lower_bound: Option<f64>,
    pub upper_bound: Option<f64>,

    pub confidence_quantile: f64,
    pub margin_normalization: MarginNormalization,
    pub rng_seed: u64,

    /// SHA-256 of the config that produced this report
    pub config_fingerprint: String,
}

impl Report {
    /// Pretty JSON rendering
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Build the report for `result`, which must come from `config`
pub fn build_report(
    config: &SimulationConfig,
    result: &ExperimentResult,
) -> Result<Report, ConfigError> {
    let machines = config
        .connection_rate
        .iter()
        .zip(&config.release_rate)
        .enumerate()
        .map(|(i, (connection_rate, release_rate))| MachineRow {
            machine: i + 1,
            connection_rate: *connection_rate,
            release_rate: *release_rate,
        })
        .collect();

    let trials = result
        .per_trial_attempts
        .iter()
        .zip(&result.per_trial_denials)
        .enumerate()
        .map(|(i, (attempts, denials))| TrialRow {
            trial: i + 1,
            attempts: *attempts,
            denials: *denials,
        })
        .collect();

    Ok(Report {
        machines,
        channel_capacity: config.channel_capacity,
        trials,
        ticks_per_trial: result.ticks_per_trial,
        total_attempts: result.total_attempts,
        total_denials: result.total_denials,
        failure_probability: result.estimate.failure_probability(),
        lower_bound: result.estimate.lower_bound(),
        upper_bound: result.estimate.upper_bound(),
        confidence_quantile: config.confidence_quantile,
        margin_normalization: config.margin_normalization,
        rng_seed: config.rng_seed,
        config_fingerprint: config.fingerprint()?,
    })
}
