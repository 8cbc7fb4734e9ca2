//! Simulation configuration
//!
//! [`SimulationConfig`] is the immutable input of an experiment. It can be
//! built in code, deserialized from JSON, or read from the legacy flat text
//! format (see [`flat`]).
//!
//! # Critical Invariants
//!
//! A config that passed [`SimulationConfig::validate`] satisfies:
//!
//! 1. `connection_rate.len() == release_rate.len() == machine_count`
//! 2. `channel_capacity <= machine_count`
//! 3. `tick_probability` in (0, 1), `observation_interval > 0`,
//!    `confidence_quantile > 0`, all finite
//! 4. Every rate is finite and non-negative

pub mod flat;

use crate::core::time::TickClock;
use crate::estimator::MarginNormalization;
use crate::orchestrator::SimulationError;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;
use thiserror::Error;

/// Default seed when a config does not name one
pub const DEFAULT_RNG_SEED: u64 = 42;

/// Upper bound on `observation_interval / tick_probability`
///
/// Keeps the step well above the clock's rounding error, so repeated
/// addition always moves the clock forward.
pub const MAX_TICKS_PER_TRIAL: usize = 100_000_000;

fn default_rng_seed() -> u64 {
    DEFAULT_RNG_SEED
}

/// Complete experiment configuration
///
/// # Example
///
/// ```rust
/// use channel_sim_core_rs::SimulationConfig;
///
/// let config = SimulationConfig::uniform(4, 2, 0.25, 100, 10.0, 1.96, 1.0, 2.0);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.ticks_per_trial(), 39);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Number of machines competing for channels
    pub machine_count: usize,

    /// Number of channels shared by all machines
    pub channel_capacity: usize,

    /// Per-tick probability scalar; also the tick length
    pub tick_probability: f64,

    /// Number of independent trials
    pub trial_count: usize,

    /// Length of one trial's observation window
    pub observation_interval: f64,

    /// Normal quantile for the confidence interval (e.g. 1.96)
    pub confidence_quantile: f64,

    /// Per-machine connection intensity
    pub connection_rate: Vec<f64>,

    /// Per-machine release intensity
    pub release_rate: Vec<f64>,

    /// Seed of the experiment's random generator
    #[serde(default = "default_rng_seed")]
    pub rng_seed: u64,

    /// Divisor of the margin's variance term
    #[serde(default)]
    pub margin_normalization: MarginNormalization,
}

impl SimulationConfig {
    /// Config where every machine shares the same connection and release rate
    #[allow(clippy::too_many_arguments)]
    pub fn uniform(
        machine_count: usize,
        channel_capacity: usize,
        tick_probability: f64,
        trial_count: usize,
        observation_interval: f64,
        confidence_quantile: f64,
        connection_rate: f64,
        release_rate: f64,
    ) -> Self {
        Self {
            machine_count,
            channel_capacity,
            tick_probability,
            trial_count,
            observation_interval,
            confidence_quantile,
            connection_rate: vec![connection_rate; machine_count],
            release_rate: vec![release_rate; machine_count],
            rng_seed: DEFAULT_RNG_SEED,
            margin_normalization: MarginNormalization::default(),
        }
    }

    /// Check every invariant the trial engine and estimator rely on
    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.machine_count == 0 {
            return Err(SimulationError::InvalidConfiguration(
                "machine_count must be > 0".to_string(),
            ));
        }

        if self.connection_rate.len() != self.machine_count {
            return Err(SimulationError::InvalidConfiguration(format!(
                "connection_rate has {} entries, expected machine_count = {}",
                self.connection_rate.len(),
                self.machine_count
            )));
        }

        if self.release_rate.len() != self.machine_count {
            return Err(SimulationError::InvalidConfiguration(format!(
                "release_rate has {} entries, expected machine_count = {}",
                self.release_rate.len(),
                self.machine_count
            )));
        }

        if self.channel_capacity > self.machine_count {
            return Err(SimulationError::InvalidConfiguration(format!(
                "channel_capacity {} exceeds machine_count {}",
                self.channel_capacity, self.machine_count
            )));
        }

        if !(self.tick_probability.is_finite()
            && self.tick_probability > 0.0
            && self.tick_probability < 1.0)
        {
            return Err(SimulationError::InvalidConfiguration(format!(
                "tick_probability must be in (0, 1), got {}",
                self.tick_probability
            )));
        }

        if !(self.observation_interval.is_finite() && self.observation_interval > 0.0) {
            return Err(SimulationError::InvalidConfiguration(format!(
                "observation_interval must be positive, got {}",
                self.observation_interval
            )));
        }

        if self.observation_interval / self.tick_probability > MAX_TICKS_PER_TRIAL as f64 {
            return Err(SimulationError::InvalidConfiguration(format!(
                "observation_interval {} needs more than {} ticks of {}",
                self.observation_interval, MAX_TICKS_PER_TRIAL, self.tick_probability
            )));
        }

        if !(self.confidence_quantile.is_finite() && self.confidence_quantile > 0.0) {
            return Err(SimulationError::InvalidConfiguration(format!(
                "confidence_quantile must be positive, got {}",
                self.confidence_quantile
            )));
        }

        let rates = self
            .connection_rate
            .iter()
            .map(|r| ("connection_rate", r))
            .chain(self.release_rate.iter().map(|r| ("release_rate", r)));
        for (name, rate) in rates {
            if !(rate.is_finite() && *rate >= 0.0) {
                return Err(SimulationError::InvalidConfiguration(format!(
                    "{} entries must be finite and non-negative, got {}",
                    name, rate
                )));
            }
        }

        Ok(())
    }

    /// Number of ticks each trial runs
    ///
    /// # Panics
    /// Panics if `tick_probability` is not positive; call `validate` first.
    pub fn ticks_per_trial(&self) -> usize {
        TickClock::ticks_in_window(self.tick_probability, self.observation_interval)
    }

    /// Hex SHA-256 of the canonical JSON form of this config
    ///
    /// Two configs with the same fingerprint run identical experiments.
    pub fn fingerprint(&self) -> Result<String, ConfigError> {
        use serde_json::Value;
        use std::collections::BTreeMap;

        let value = serde_json::to_value(self)?;

        // Sort object keys so the hash does not depend on map ordering
        fn canonicalize(value: Value) -> Value {
            match value {
                Value::Object(map) => {
                    let sorted: BTreeMap<String, Value> =
                        map.into_iter().map(|(k, v)| (k, canonicalize(v))).collect();
                    Value::Object(sorted.into_iter().collect())
                }
                Value::Array(arr) => Value::Array(arr.into_iter().map(canonicalize).collect()),
                other => other,
            }
        }

        let json = serde_json::to_string(&canonicalize(value))?;

        let mut hasher = Sha256::new();
        hasher.update(json.as_bytes());
        let digest = hasher.finalize();
        Ok(digest.iter().map(|b| format!("{:02x}", b)).collect())
    }

    /// Parse a JSON document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Errors raised while loading a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Unexpected end of file: {0}")]
    UnexpectedEof(String),

    #[error(transparent)]
    Invalid(#[from] SimulationError),
}

/// Load and validate a config file
///
/// Files ending in `.json` are parsed as JSON; anything else is read as the
/// legacy flat format.
pub fn load(path: impl AsRef<Path>) -> Result<SimulationConfig, ConfigError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let is_json = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let config = if is_json {
        SimulationConfig::from_json(&text)?
    } else {
        flat::parse(&text)?
    };

    config.validate()?;
    Ok(config)
}
