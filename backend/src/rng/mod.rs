//! Deterministic random number generation
//!
//! Uses xorshift64* algorithm for fast, deterministic random number generation.
//! CRITICAL: All randomness in the simulator MUST go through this module.
//!
//! The trial engine never owns a generator. It borrows a [`RandomSource`]
//! from the experiment runner, which seeds one generator exactly once per
//! experiment.

mod xorshift;

pub use xorshift::RngManager;

/// Source of uniform draws in `[0.0, 1.0)`
///
/// Implemented by [`RngManager`]. Tests implement it with scripted values to
/// drive the trial engine through exact scenarios.
pub trait RandomSource {
    /// Next uniform draw in `[0.0, 1.0)`
    fn next_f64(&mut self) -> f64;
}

impl RandomSource for RngManager {
    fn next_f64(&mut self) -> f64 {
        RngManager::next_f64(self)
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_f64(&mut self) -> f64 {
        (**self).next_f64()
    }
}
