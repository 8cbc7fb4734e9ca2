//! Estimator tests
//!
//! p = denials / attempts, margin = z * sqrt(p (1 - p) / n), with n chosen by
//! the margin normalization.

use channel_sim_core_rs::estimator::{estimate, Estimate, MarginNormalization, Totals};
use channel_sim_core_rs::SimulationError;

fn totals(trials: usize, attempts: u64, denials: u64) -> Totals {
    Totals {
        trials,
        attempts,
        denials,
    }
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-12,
        "expected {}, got {}",
        expected,
        actual
    );
}

#[test]
fn test_attempt_normalization() {
    let est = estimate(&totals(4, 400, 100), 2.0, MarginNormalization::Attempts);
    let interval = est.defined().unwrap();

    // p = 0.25, variance term 0.1875 / 400
    let margin = 2.0 * (0.1875f64 / 400.0).sqrt();
    assert_close(interval.failure_probability, 0.25);
    assert_close(interval.margin, margin);
    assert_close(interval.lower_bound, 0.25 - margin);
    assert_close(interval.upper_bound, 0.25 + margin);
}

#[test]
fn test_trial_normalization() {
    let est = estimate(&totals(4, 400, 100), 2.0, MarginNormalization::Trials);
    let interval = est.defined().unwrap();

    assert_close(interval.failure_probability, 0.25);
    assert_close(interval.margin, 2.0 * (0.1875f64 / 4.0).sqrt());
}

#[test]
fn test_no_normalization() {
    let est = estimate(&totals(4, 400, 100), 2.0, MarginNormalization::None);
    assert_close(est.defined().unwrap().margin, 2.0 * 0.1875f64.sqrt());
}

#[test]
fn test_interval_is_symmetric_and_unclamped() {
    // Small p with few attempts pushes the lower bound below zero
    let est = estimate(&totals(1, 10, 1), 1.96, MarginNormalization::Attempts);
    let interval = est.defined().unwrap();

    assert!(interval.lower_bound < 0.0);
    assert_close(
        interval.upper_bound - interval.failure_probability,
        interval.failure_probability - interval.lower_bound,
    );
}

#[test]
fn test_all_denied() {
    let est = estimate(&totals(3, 12, 12), 1.96, MarginNormalization::Attempts);
    let interval = est.defined().unwrap();
    assert_eq!(interval.failure_probability, 1.0);
    assert_eq!(interval.margin, 0.0);
}

#[test]
fn test_undefined_when_no_attempts() {
    for normalization in [
        MarginNormalization::Attempts,
        MarginNormalization::Trials,
        MarginNormalization::None,
    ] {
        let est = estimate(&totals(6, 0, 0), 1.96, normalization);
        assert_eq!(est, Estimate::Undefined { trials: 6 });
        assert_eq!(est.lower_bound(), None);
        assert_eq!(est.upper_bound(), None);
        assert_eq!(
            est.defined(),
            Err(SimulationError::UndefinedEstimate { trials: 6 })
        );
    }
}

#[test]
fn test_trial_normalization_without_trials_is_undefined() {
    // Counts supplied without a trial count cannot be normalized per trial
    let est = estimate(&totals(0, 10, 2), 1.96, MarginNormalization::Trials);
    assert!(!est.is_defined());
}

#[test]
fn test_undefined_error_message() {
    let err = SimulationError::UndefinedEstimate { trials: 2 };
    assert_eq!(
        err.to_string(),
        "Failure probability undefined: no connection attempts in 2 trial(s)"
    );
}

#[test]
fn test_estimate_serializes_with_status_tag() {
    let defined = estimate(&totals(1, 4, 1), 1.0, MarginNormalization::Attempts);
    let json = serde_json::to_value(defined).unwrap();
    assert_eq!(json["status"], "defined");
    assert_eq!(json["failure_probability"], 0.25);

    let undefined = serde_json::to_value(Estimate::Undefined { trials: 3 }).unwrap();
    assert_eq!(undefined["status"], "undefined");
    assert_eq!(undefined["trials"], 3);
}
