//! Machines competing for connection channels
//!
//! Each machine is a two-state automaton: it is either idle or holding one
//! channel. A [`MachinePool`] stores the states of all machines for the
//! duration of one trial, together with the number currently connected.
//!
//! # Critical Invariants
//!
//! 1. `connected_count()` always equals the number of `Connected` entries
//! 2. Every machine is `Idle` right after `reset()`

use serde::{Deserialize, Serialize};

/// State of a single machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MachineState {
    /// Not holding a channel; may attempt to connect
    #[default]
    Idle,
    /// Holding a channel; may release it
    Connected,
}

impl MachineState {
    pub fn is_connected(self) -> bool {
        matches!(self, MachineState::Connected)
    }
}

/// States of every machine in one trial
///
/// # Example
///
/// ```rust
/// use channel_sim_core_rs::{MachinePool, MachineState};
///
/// let mut pool = MachinePool::new(3);
/// pool.connect(1);
/// assert_eq!(pool.connected_count(), 1);
/// assert_eq!(pool.state(1), MachineState::Connected);
///
/// pool.reset();
/// assert_eq!(pool.connected_count(), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachinePool {
    states: Vec<MachineState>,
    connected: usize,
}

impl MachinePool {
    /// Create a pool of `machine_count` idle machines
    pub fn new(machine_count: usize) -> Self {
        Self {
            states: vec![MachineState::Idle; machine_count],
            connected: 0,
        }
    }

    /// Return every machine to `Idle`
    pub fn reset(&mut self) {
        self.states.fill(MachineState::Idle);
        self.connected = 0;
    }

    /// Number of machines in the pool
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// State of machine `index`
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn state(&self, index: usize) -> MachineState {
        self.states[index]
    }

    /// All machine states in index order
    pub fn states(&self) -> &[MachineState] {
        &self.states
    }

    /// Number of machines currently holding a channel
    pub fn connected_count(&self) -> usize {
        self.connected
    }

    /// Move machine `index` to `Connected`
    ///
    /// No-op if it is already connected.
    pub fn connect(&mut self, index: usize) {
        if !self.states[index].is_connected() {
            self.states[index] = MachineState::Connected;
            self.connected += 1;
        }
    }

    /// Move machine `index` to `Idle`
    ///
    /// No-op if it is already idle.
    pub fn release(&mut self, index: usize) {
        if self.states[index].is_connected() {
            self.states[index] = MachineState::Idle;
            self.connected -= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_pool_is_idle() {
        let pool = MachinePool::new(4);
        assert_eq!(pool.len(), 4);
        assert!(pool.states().iter().all(|s| *s == MachineState::Idle));
        assert_eq!(pool.connected_count(), 0);
    }

    #[test]
    fn test_connect_and_release_are_idempotent() {
        let mut pool = MachinePool::new(2);
        pool.connect(0);
        pool.connect(0);
        assert_eq!(pool.connected_count(), 1);

        pool.release(0);
        pool.release(0);
        assert_eq!(pool.connected_count(), 0);
    }

    #[test]
    fn test_reset_clears_connections() {
        let mut pool = MachinePool::new(3);
        pool.connect(0);
        pool.connect(2);
        pool.reset();
        assert_eq!(pool.connected_count(), 0);
        assert_eq!(pool.state(2), MachineState::Idle);
    }
}
