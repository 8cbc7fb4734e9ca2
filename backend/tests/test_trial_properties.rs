//! Property tests for the trial engine and the experiment runner
//!
//! Invariants checked over random configurations:
//! - connected machines never exceed the channel capacity, at any tick
//! - denials never exceed attempts, per tick and per trial
//! - capacity 0 turns every attempt into a denial
//! - a fixed seed reproduces the whole experiment

use channel_sim_core_rs::{Experiment, RngManager, SimulationConfig, TrialEngine};
use proptest::prelude::*;

prop_compose! {
    fn arb_config()(machine_count in 1usize..8)(
        machine_count in Just(machine_count),
        capacity in 0..=machine_count,
        tick_probability in 0.01f64..0.5,
        observation_interval in 0.01f64..6.0,
        connection_rate in prop::collection::vec(0.0f64..5.0, machine_count),
        release_rate in prop::collection::vec(0.0f64..5.0, machine_count),
        seed in any::<u64>(),
    ) -> SimulationConfig {
        SimulationConfig {
            machine_count,
            channel_capacity: capacity,
            tick_probability,
            trial_count: 4,
            observation_interval,
            confidence_quantile: 1.96,
            connection_rate,
            release_rate,
            rng_seed: seed,
            margin_normalization: Default::default(),
        }
    }
}

proptest! {
    #[test]
    fn prop_capacity_never_exceeded(config in arb_config()) {
        let mut engine = TrialEngine::new(config.machine_count);
        let mut rng = RngManager::new(config.rng_seed);

        let mut violation = None;
        let outcome = engine.run_observed(&config, &mut rng, |tick, engine| {
            if engine.connected_count() > config.channel_capacity || tick.denials > tick.attempts {
                violation = Some((engine.connected_count(), *tick));
            }
        });

        prop_assert_eq!(violation, None);
        prop_assert!(outcome.denials <= outcome.attempts);
        prop_assert_eq!(outcome.ticks, config.ticks_per_trial());
    }

    #[test]
    fn prop_zero_capacity_denies_all(config in arb_config()) {
        let config = SimulationConfig { channel_capacity: 0, ..config };
        let mut engine = TrialEngine::new(config.machine_count);
        let mut rng = RngManager::new(config.rng_seed);

        let outcome = engine.run(&config, &mut rng);
        prop_assert_eq!(outcome.attempts, outcome.denials);
    }

    #[test]
    fn prop_fixed_seed_is_deterministic(config in arb_config()) {
        let first = Experiment::new(config.clone()).unwrap().run();
        let second = Experiment::new(config).unwrap().run();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_totals_match_per_trial_counts(config in arb_config()) {
        let result = Experiment::new(config).unwrap().run();

        prop_assert_eq!(result.total_attempts, result.per_trial_attempts.iter().sum::<u64>());
        prop_assert_eq!(result.total_denials, result.per_trial_denials.iter().sum::<u64>());
        for (a, d) in result.per_trial_attempts.iter().zip(&result.per_trial_denials) {
            prop_assert!(d <= a);
        }
        if result.total_attempts == 0 {
            prop_assert!(!result.estimate.is_defined());
        } else {
            let interval = result.estimate.defined().unwrap();
            prop_assert!(interval.failure_probability.is_finite());
            prop_assert!(interval.margin.is_finite());
        }
    }
}
