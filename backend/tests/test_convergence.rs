//! Monte Carlo convergence
//!
//! Statistical checks, not exact ones: independent experiments with
//! different seeds should produce intervals that cover a high-precision
//! reference estimate at roughly the nominal rate, and intervals should
//! narrow as the number of trials grows.

use channel_sim_core_rs::{run_experiment, SimulationConfig};

const Z_95: f64 = 1.96;

fn contended(trials: usize, seed: u64) -> SimulationConfig {
    SimulationConfig {
        rng_seed: seed,
        ..SimulationConfig::uniform(3, 1, 0.1, trials, 5.0, Z_95, 2.0, 5.0)
    }
}

#[test]
fn test_interval_coverage_near_nominal() {
    let reference = run_experiment(contended(20_000, 1)).unwrap();
    let reference_p = reference.estimate.failure_probability().unwrap();

    let runs = 100;
    let covered = (0..runs)
        .map(|i| run_experiment(contended(300, 1_000 + i)).unwrap())
        .filter(|result| result.estimate.defined().unwrap().contains(reference_p))
        .count();

    let coverage = covered as f64 / runs as f64;
    assert!(
        coverage >= 0.85,
        "coverage {} too low for a 95% interval (reference p = {})",
        coverage,
        reference_p
    );
}

#[test]
fn test_interval_narrows_with_more_trials() {
    let small = run_experiment(contended(500, 7)).unwrap();
    let large = run_experiment(contended(8_000, 7)).unwrap();

    let small_margin = small.estimate.defined().unwrap().margin;
    let large_margin = large.estimate.defined().unwrap().margin;

    // 16x the trials should cut the margin roughly by 4
    let ratio = small_margin / large_margin;
    assert!(
        (3.0..5.0).contains(&ratio),
        "margin ratio {} (small {}, large {})",
        ratio,
        small_margin,
        large_margin
    );
}

#[test]
fn test_estimates_agree_across_seeds() {
    let a = run_experiment(contended(5_000, 11)).unwrap();
    let b = run_experiment(contended(5_000, 12)).unwrap();

    let pa = a.estimate.defined().unwrap();
    let pb = b.estimate.defined().unwrap();

    // Two independent 95% intervals of this size should overlap
    assert!(pa.lower_bound <= pb.upper_bound && pb.lower_bound <= pa.upper_bound);
}
