//! Trial engine - one observation window over the whole machine pool
//!
//! # Tick rule
//!
//! Machines are visited in index order and each receives exactly one uniform
//! draw `r` per tick:
//!
//! ```text
//! Idle:      r <= connection_rate[i] * tick_probability
//!              -> attempt; connect if connected < capacity, else denial
//! Connected: r <= release_rate[i] * tick_probability
//!              -> release (not counted)
//! ```
//!
//! The capacity check sees every transition already applied earlier in the
//! same tick.
//!
//! # Critical Invariants
//!
//! 1. `connected_count() <= channel_capacity` after every machine visit
//! 2. `denials <= attempts` for every tick and every trial
//! 3. The pool is all-idle at the start of every trial

use crate::config::SimulationConfig;
use crate::core::time::TickClock;
use crate::models::machine::{MachinePool, MachineState};
use crate::rng::RandomSource;
use serde::{Deserialize, Serialize};

/// Counts produced by a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickOutcome {
    pub attempts: u64,
    pub denials: u64,
}

/// Counts produced by one trial
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialOutcome {
    pub attempts: u64,
    pub denials: u64,
    /// Number of ticks the trial ran
    pub ticks: usize,
}

impl TrialOutcome {
    fn absorb(&mut self, tick: TickOutcome) {
        self.attempts += tick.attempts;
        self.denials += tick.denials;
        self.ticks += 1;
    }
}

/// Runs trials over a pool of machines
///
/// The engine owns the machine states; the config and the random source are
/// borrowed per call.
///
/// # Example
///
/// ```rust
/// use channel_sim_core_rs::{RngManager, SimulationConfig, TrialEngine};
///
/// let config = SimulationConfig::uniform(5, 2, 0.1, 1, 4.0, 1.96, 2.0, 1.0);
/// let mut engine = TrialEngine::new(config.machine_count);
/// let mut rng = RngManager::new(12345);
///
/// let outcome = engine.run(&config, &mut rng);
/// assert!(outcome.denials <= outcome.attempts);
/// assert!(engine.connected_count() <= config.channel_capacity);
/// ```
#[derive(Debug, Clone)]
pub struct TrialEngine {
    pool: MachinePool,
}

impl TrialEngine {
    /// Create an engine for `machine_count` machines, all idle
    pub fn new(machine_count: usize) -> Self {
        Self {
            pool: MachinePool::new(machine_count),
        }
    }

    /// Return every machine to `Idle`
    pub fn reset(&mut self) {
        self.pool.reset();
    }

    /// Machine states
    pub fn pool(&self) -> &MachinePool {
        &self.pool
    }

    /// Machines currently holding a channel
    pub fn connected_count(&self) -> usize {
        self.pool.connected_count()
    }

    /// Apply the tick rule once to every machine
    ///
    /// # Panics
    /// Panics if the config has fewer rates than the pool has machines.
    pub fn step<R: RandomSource + ?Sized>(
        &mut self,
        config: &SimulationConfig,
        rng: &mut R,
    ) -> TickOutcome {
        let mut outcome = TickOutcome::default();
        let tick_probability = config.tick_probability;

        for machine in 0..self.pool.len() {
            // One draw per machine per tick, whichever branch is taken
            let r = rng.next_f64();

            match self.pool.state(machine) {
                MachineState::Idle => {
                    if r <= config.connection_rate[machine] * tick_probability {
                        outcome.attempts += 1;
                        if self.pool.connected_count() < config.channel_capacity {
                            self.pool.connect(machine);
                        } else {
                            outcome.denials += 1;
                        }
                    }
                }
                MachineState::Connected => {
                    if r <= config.release_rate[machine] * tick_probability {
                        self.pool.release(machine);
                    }
                }
            }
        }

        outcome
    }

    /// Run one full trial from an all-idle pool
    pub fn run<R: RandomSource + ?Sized>(
        &mut self,
        config: &SimulationConfig,
        rng: &mut R,
    ) -> TrialOutcome {
        self.run_observed(config, rng, |_, _| {})
    }

    /// Run one full trial, calling `observe` after every tick
    ///
    /// The observer receives the tick's counts and the engine as it stands
    /// after the tick, which lets callers inspect the pool tick by tick.
    pub fn run_observed<R, F>(
        &mut self,
        config: &SimulationConfig,
        rng: &mut R,
        mut observe: F,
    ) -> TrialOutcome
    where
        R: RandomSource + ?Sized,
        F: FnMut(&TickOutcome, &TrialEngine),
    {
        self.reset();

        let mut clock = TickClock::new(config.tick_probability, config.observation_interval);
        let mut outcome = TrialOutcome::default();

        while clock.has_next() {
            let tick = self.step(config, rng);
            outcome.absorb(tick);
            observe(&tick, self);
            clock.advance();
        }

        outcome
    }
}
