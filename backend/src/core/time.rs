//! Virtual time for a single trial
//!
//! A trial observes the channel pool over a fixed window. Time advances in
//! discrete ticks of length `step`; the clock starts at `step` and a tick is
//! run while the clock is strictly below the window length.

use serde::{Deserialize, Serialize};

/// Virtual clock for one observation window
///
/// # Example
/// ```
/// use channel_sim_core_rs::TickClock;
///
/// let mut clock = TickClock::new(0.25, 1.0);
/// let mut ticks = 0;
/// while clock.has_next() {
///     ticks += 1;
///     clock.advance();
/// }
/// assert_eq!(ticks, 3); // 0.25, 0.5, 0.75
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickClock {
    /// Current clock value
    now: f64,
    /// Tick length
    step: f64,
    /// Length of the observation window
    horizon: f64,
    /// Ticks completed since the last reset
    ticks_elapsed: usize,
}

impl TickClock {
    /// Create a clock positioned at its first tick
    ///
    /// # Panics
    /// Panics if `step` is not a positive finite number.
    pub fn new(step: f64, horizon: f64) -> Self {
        assert!(step.is_finite() && step > 0.0, "step must be positive");
        Self {
            now: step,
            step,
            horizon,
            ticks_elapsed: 0,
        }
    }

    /// Whether another tick falls inside the window
    pub fn has_next(&self) -> bool {
        self.now < self.horizon
    }

    /// Move the clock forward by one tick
    ///
    /// The clock is advanced by repeated addition, so accumulated rounding
    /// decides the last tick exactly as a running sum would.
    pub fn advance(&mut self) {
        self.now += self.step;
        self.ticks_elapsed += 1;
    }

    /// Rewind to the first tick
    pub fn reset(&mut self) {
        self.now = self.step;
        self.ticks_elapsed = 0;
    }

    /// Current clock value
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Ticks completed since the last reset
    pub fn ticks_elapsed(&self) -> usize {
        self.ticks_elapsed
    }

    /// Tick length
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Length of the observation window
    pub fn horizon(&self) -> f64 {
        self.horizon
    }

    /// Number of ticks a full window runs, without simulating anything
    ///
    /// # Example
    /// ```
    /// use channel_sim_core_rs::TickClock;
    ///
    /// assert_eq!(TickClock::ticks_in_window(0.5, 0.5), 0);
    /// assert_eq!(TickClock::ticks_in_window(0.5, 2.0), 3);
    /// ```
    pub fn ticks_in_window(step: f64, horizon: f64) -> usize {
        let mut clock = Self::new(step, horizon);
        while clock.has_next() {
            clock.advance();
        }
        clock.ticks_elapsed()
    }
}
