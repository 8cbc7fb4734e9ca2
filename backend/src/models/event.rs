//! Event logging for experiment auditing.
//!
//! Events capture the milestones of an experiment: each completed trial and
//! the final estimate. They let callers and tests check what happened in
//! which order without re-running anything.
//!
//! # Example
//!
//! ```rust
//! use channel_sim_core_rs::models::{Event, EventLog};
//!
//! let mut log = EventLog::new();
//! log.log(Event::TrialCompleted {
//!     trial: 0,
//!     ticks: 49,
//!     attempts: 12,
//!     denials: 3,
//! });
//!
//! assert_eq!(log.events_of_type("TrialCompleted").len(), 1);
//! ```

/// Experiment event capturing a milestone.
///
/// Trial-scoped events carry the zero-based trial index.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// One trial finished and its counts were accumulated
    TrialCompleted {
        trial: usize,
        ticks: usize,
        attempts: u64,
        denials: u64,
    },

    /// The estimator produced a failure probability and interval
    EstimateComputed {
        trials: usize,
        total_attempts: u64,
        total_denials: u64,
        failure_probability: f64,
        lower_bound: f64,
        upper_bound: f64,
    },

    /// The estimator could not produce a value (no attempts were observed)
    EstimateUndefined { trials: usize },
}

impl Event {
    /// Trial index for trial-scoped events
    pub fn trial(&self) -> Option<usize> {
        match self {
            Event::TrialCompleted { trial, .. } => Some(*trial),
            _ => None,
        }
    }

    /// Get a short description of the event type
    pub fn event_type(&self) -> &'static str {
        match self {
            Event::TrialCompleted { .. } => "TrialCompleted",
            Event::EstimateComputed { .. } => "EstimateComputed",
            Event::EstimateUndefined { .. } => "EstimateUndefined",
        }
    }
}

/// Event log for storing and querying experiment events.
///
/// This is a simple wrapper around Vec<Event> with convenience methods.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    /// Create a new empty event log
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Add an event to the log
    pub fn log(&mut self, event: Event) {
        self.events.push(event);
    }

    /// Get the number of events logged
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Check if the log is empty
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Get all events
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Get events of a specific type
    pub fn events_of_type(&self, event_type: &str) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    /// Get events for a specific trial
    pub fn events_for_trial(&self, trial: usize) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.trial() == Some(trial))
            .collect()
    }

    /// Clear all events
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn completed(trial: usize) -> Event {
        Event::TrialCompleted {
            trial,
            ticks: 10,
            attempts: 4,
            denials: 1,
        }
    }

    #[test]
    fn test_event_type() {
        assert_eq!(completed(0).event_type(), "TrialCompleted");
        assert_eq!(
            Event::EstimateUndefined { trials: 3 }.event_type(),
            "EstimateUndefined"
        );
    }

    #[test]
    fn test_event_trial() {
        assert_eq!(completed(7).trial(), Some(7));
        assert_eq!(Event::EstimateUndefined { trials: 3 }.trial(), None);
    }

    #[test]
    fn test_event_log_basic() {
        let mut log = EventLog::new();

        assert_eq!(log.len(), 0);
        assert!(log.is_empty());

        log.log(completed(0));

        assert_eq!(log.len(), 1);
        assert!(!log.is_empty());
    }

    #[test]
    fn test_event_log_query_by_trial() {
        let mut log = EventLog::new();
        log.log(completed(0));
        log.log(completed(1));
        log.log(completed(1));

        assert_eq!(log.events_for_trial(1).len(), 2);
        assert_eq!(log.events_for_trial(2).len(), 0);
    }

    #[test]
    fn test_event_log_clear() {
        let mut log = EventLog::new();
        log.log(completed(0));
        log.clear();
        assert!(log.is_empty());
    }
}
