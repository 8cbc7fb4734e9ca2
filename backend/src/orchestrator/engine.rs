//! Experiment runner - repeats the trial engine and aggregates results
//!
//! # Architecture
//!
//! ```text
//! Experiment::new(config)
//!   validate config              (InvalidConfiguration before any trial)
//!   seed RNG once from rng_seed
//!
//! For each trial t in 0..trial_count:
//!   1. Reset machine states
//!   2. Run the trial engine over the observation window
//!   3. Accumulate totals, record per-trial counts
//!   4. Log TrialCompleted
//!
//! After the last trial:
//!   estimate(totals, quantile, normalization) -> Defined | Undefined
//! ```
//!
//! # Example
//!
//! ```rust
//! use channel_sim_core_rs::{Experiment, SimulationConfig};
//!
//! let config = SimulationConfig::uniform(6, 2, 0.1, 50, 10.0, 1.96, 1.0, 2.0);
//!
//! let result = Experiment::new(config).unwrap().run();
//! assert_eq!(result.per_trial_attempts.len(), 50);
//! assert!(result.total_denials <= result.total_attempts);
//! ```

use crate::config::SimulationConfig;
use crate::estimator::{estimate, Estimate, Totals};
use crate::models::event::{Event, EventLog};
use crate::rng::{RandomSource, RngManager};
use crate::trial::{TrialEngine, TrialOutcome};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Errors
// ============================================================================

/// Simulation error types
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    /// Configuration rejected before any trial ran
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// No attempts were observed, so the failure probability has no value
    #[error("Failure probability undefined: no connection attempts in {trials} trial(s)")]
    UndefinedEstimate { trials: usize },
}

// ============================================================================
// Result Types
// ============================================================================

/// Aggregate result of a complete experiment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentResult {
    /// Attempts observed in each trial, in trial order
    pub per_trial_attempts: Vec<u64>,

    /// Denials observed in each trial, in trial order
    pub per_trial_denials: Vec<u64>,

    /// Sum of `per_trial_attempts`
    pub total_attempts: u64,

    /// Sum of `per_trial_denials`
    pub total_denials: u64,

    /// Ticks each trial ran
    pub ticks_per_trial: usize,

    /// Failure probability and confidence interval, if defined
    pub estimate: Estimate,
}

impl ExperimentResult {
    pub fn trials(&self) -> usize {
        self.per_trial_attempts.len()
    }
}

// ============================================================================
// Experiment
// ============================================================================

/// Runs `trial_count` independent trials against one configuration
///
/// # Determinism
///
/// All randomness comes from one generator, seeded once when the experiment
/// is created. Same config (including `rng_seed`) = identical result.
pub struct Experiment<R: RandomSource = RngManager> {
    /// Immutable experiment parameters
    config: SimulationConfig,

    /// Machine states, reset before every trial
    engine: TrialEngine,

    /// The experiment's only random source
    rng: R,

    /// Running sums across completed trials
    totals: Totals,

    per_trial_attempts: Vec<u64>,
    per_trial_denials: Vec<u64>,

    /// Experiment milestones
    event_log: EventLog,

    /// Set by the first `run`, returned unchanged afterwards
    finalized: Option<ExperimentResult>,
}

impl Experiment<RngManager> {
    /// Create an experiment seeded from `config.rng_seed`
    ///
    /// # Errors
    ///
    /// `SimulationError::InvalidConfiguration` if the config fails validation.
    pub fn new(config: SimulationConfig) -> Result<Self, SimulationError> {
        let rng = RngManager::new(config.rng_seed);
        Self::with_rng(config, rng)
    }
}

impl<R: RandomSource> Experiment<R> {
    /// Create an experiment drawing from a caller-supplied source
    ///
    /// `config.rng_seed` is ignored.
    pub fn with_rng(config: SimulationConfig, rng: R) -> Result<Self, SimulationError> {
        config.validate()?;

        let engine = TrialEngine::new(config.machine_count);

        Ok(Self {
            engine,
            rng,
            totals: Totals::default(),
            per_trial_attempts: Vec::with_capacity(config.trial_count),
            per_trial_denials: Vec::with_capacity(config.trial_count),
            event_log: EventLog::new(),
            finalized: None,
            config,
        })
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Trials run so far
    pub fn trials_completed(&self) -> usize {
        self.totals.trials
    }

    /// Whether every configured trial has run
    pub fn is_finished(&self) -> bool {
        self.trials_completed() >= self.config.trial_count
    }

    /// Running sums across completed trials
    pub fn totals(&self) -> &Totals {
        &self.totals
    }

    pub fn event_log(&self) -> &EventLog {
        &self.event_log
    }

    /// The generator, e.g. to inspect its state after a run
    pub fn rng(&self) -> &R {
        &self.rng
    }

    // ========================================================================
    // Trial Loop
    // ========================================================================

    /// Run the next trial and accumulate its counts
    ///
    /// Returns `None` once all configured trials have run.
    pub fn run_trial(&mut self) -> Option<TrialOutcome> {
        if self.is_finished() {
            return None;
        }

        let trial = self.trials_completed();
        let outcome = self.engine.run(&self.config, &mut self.rng);

        self.totals.add_trial(outcome.attempts, outcome.denials);
        self.per_trial_attempts.push(outcome.attempts);
        self.per_trial_denials.push(outcome.denials);

        tracing::debug!(
            trial,
            ticks = outcome.ticks,
            attempts = outcome.attempts,
            denials = outcome.denials,
            "trial completed"
        );
        self.event_log.log(Event::TrialCompleted {
            trial,
            ticks: outcome.ticks,
            attempts: outcome.attempts,
            denials: outcome.denials,
        });

        Some(outcome)
    }

    /// Estimate from the trials completed so far
    pub fn current_estimate(&self) -> Estimate {
        estimate(
            &self.totals,
            self.config.confidence_quantile,
            self.config.margin_normalization,
        )
    }

    /// Run every remaining trial and finalize the estimate
    ///
    /// Later calls return the same result without logging the estimate again.
    pub fn run(&mut self) -> ExperimentResult {
        if let Some(result) = &self.finalized {
            return result.clone();
        }

        while self.run_trial().is_some() {}

        let estimate = self.current_estimate();
        match &estimate {
            Estimate::Defined(interval) => {
                tracing::info!(
                    trials = self.totals.trials,
                    attempts = self.totals.attempts,
                    denials = self.totals.denials,
                    failure_probability = interval.failure_probability,
                    lower = interval.lower_bound,
                    upper = interval.upper_bound,
                    "experiment finished"
                );
                self.event_log.log(Event::EstimateComputed {
                    trials: self.totals.trials,
                    total_attempts: self.totals.attempts,
                    total_denials: self.totals.denials,
                    failure_probability: interval.failure_probability,
                    lower_bound: interval.lower_bound,
                    upper_bound: interval.upper_bound,
                });
            }
            Estimate::Undefined { trials } => {
                tracing::warn!(trials, "no connection attempts observed; estimate undefined");
                self.event_log.log(Event::EstimateUndefined { trials: *trials });
            }
        }

        let result = ExperimentResult {
            per_trial_attempts: self.per_trial_attempts.clone(),
            per_trial_denials: self.per_trial_denials.clone(),
            total_attempts: self.totals.attempts,
            total_denials: self.totals.denials,
            ticks_per_trial: self.config.ticks_per_trial(),
            estimate,
        };
        self.finalized = Some(result.clone());
        result
    }
}

/// Validate `config`, run every trial, and return the aggregate result
pub fn run_experiment(config: SimulationConfig) -> Result<ExperimentResult, SimulationError> {
    Ok(Experiment::new(config)?.run())
}
