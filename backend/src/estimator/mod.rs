//! Failure-probability estimation
//!
//! Turns the accumulated attempt and denial counts of an experiment into a
//! point estimate with a two-sided normal-approximation interval:
//!
//! ```text
//! p      = denials / attempts
//! margin = quantile * sqrt(p * (1 - p) / n)
//! ```
//!
//! `n` is selected by [`MarginNormalization`]. When there are no attempts the
//! estimate is [`Estimate::Undefined`] instead of NaN.

use crate::orchestrator::SimulationError;
use serde::{Deserialize, Serialize};

/// Divisor used in the variance term of the margin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarginNormalization {
    /// Divide by the total number of attempts (binomial standard error)
    #[default]
    Attempts,
    /// Divide by the number of trials
    Trials,
    /// Leave the variance term undivided
    None,
}

impl MarginNormalization {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarginNormalization::Attempts => "attempts",
            MarginNormalization::Trials => "trials",
            MarginNormalization::None => "none",
        }
    }
}

impl std::str::FromStr for MarginNormalization {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "attempts" => Ok(MarginNormalization::Attempts),
            "trials" => Ok(MarginNormalization::Trials),
            "none" => Ok(MarginNormalization::None),
            other => Err(format!(
                "unknown margin normalization '{}' (expected attempts, trials or none)",
                other
            )),
        }
    }
}

/// Counts the estimator works from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub trials: usize,
    pub attempts: u64,
    pub denials: u64,
}

impl Totals {
    /// Add one trial's counts
    pub fn add_trial(&mut self, attempts: u64, denials: u64) {
        self.trials += 1;
        self.attempts += attempts;
        self.denials += denials;
    }
}

/// A defined failure-probability estimate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntervalEstimate {
    pub failure_probability: f64,
    pub margin: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
}

impl IntervalEstimate {
    /// Whether `value` lies inside the closed interval
    pub fn contains(&self, value: f64) -> bool {
        self.lower_bound <= value && value <= self.upper_bound
    }
}

/// Result of the estimator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Estimate {
    Defined(IntervalEstimate),
    /// No attempts were observed, so the ratio has no value
    Undefined { trials: usize },
}

impl Estimate {
    pub fn is_defined(&self) -> bool {
        matches!(self, Estimate::Defined(_))
    }

    /// The interval, or `UndefinedEstimate` when there is none
    ///
    /// # Example
    ///
    /// ```rust
    /// use channel_sim_core_rs::estimator::{estimate, MarginNormalization, Totals};
    /// use channel_sim_core_rs::SimulationError;
    ///
    /// let totals = Totals { trials: 5, attempts: 0, denials: 0 };
    /// let result = estimate(&totals, 1.96, MarginNormalization::Attempts);
    /// assert_eq!(result.defined(), Err(SimulationError::UndefinedEstimate { trials: 5 }));
    /// ```
    pub fn defined(&self) -> Result<&IntervalEstimate, SimulationError> {
        match self {
            Estimate::Defined(interval) => Ok(interval),
            Estimate::Undefined { trials } => {
                Err(SimulationError::UndefinedEstimate { trials: *trials })
            }
        }
    }

    pub fn failure_probability(&self) -> Option<f64> {
        self.defined().ok().map(|e| e.failure_probability)
    }

    pub fn lower_bound(&self) -> Option<f64> {
        self.defined().ok().map(|e| e.lower_bound)
    }

    pub fn upper_bound(&self) -> Option<f64> {
        self.defined().ok().map(|e| e.upper_bound)
    }
}

/// Estimate the denial probability from accumulated counts
///
/// # Example
///
/// ```rust
/// use channel_sim_core_rs::estimator::{estimate, MarginNormalization, Totals};
///
/// let totals = Totals { trials: 10, attempts: 100, denials: 20 };
/// let est = estimate(&totals, 1.96, MarginNormalization::Attempts);
/// let interval = est.defined().unwrap();
/// assert!((interval.failure_probability - 0.2).abs() < 1e-12);
/// assert!((interval.margin - 1.96 * 0.04).abs() < 1e-12);
/// ```
pub fn estimate(totals: &Totals, quantile: f64, normalization: MarginNormalization) -> Estimate {
    if totals.attempts == 0 {
        return Estimate::Undefined {
            trials: totals.trials,
        };
    }

    let divisor = match normalization {
        MarginNormalization::Attempts => totals.attempts as f64,
        MarginNormalization::Trials => totals.trials as f64,
        MarginNormalization::None => 1.0,
    };
    if divisor == 0.0 {
        return Estimate::Undefined {
            trials: totals.trials,
        };
    }

    let p = totals.denials as f64 / totals.attempts as f64;
    let margin = quantile * (p * (1.0 - p) / divisor).sqrt();

    Estimate::Defined(IntervalEstimate {
        failure_probability: p,
        margin,
        lower_bound: p - margin,
        upper_bound: p + margin,
    })
}
