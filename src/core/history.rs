//! Bounded state history.
//!
//! The history is a ring buffer of visited states, oldest first. Once the
//! configured maximum is reached, recording a new state evicts the oldest one.
//! A maximum of zero disables recording entirely.

use super::state::State;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::VecDeque;
use std::time::Duration;

/// A single visited state and the time it was recorded.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StateRecord<S> {
    /// The state that was entered
    pub state: S,
    /// When the state was recorded
    pub recorded_at: DateTime<Utc>,
}

/// Ordered, bounded history of visited states.
///
/// # Example
///
/// ```rust
/// use switchyard::core::{State, StateHistory};
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug)]
/// enum Phase { One, Two, Three, Four }
///
/// impl State for Phase {}
///
/// let mut history = StateHistory::new(3);
/// history.record(Phase::One);
/// history.record(Phase::Two);
/// history.record(Phase::Three);
/// history.record(Phase::Four);
///
/// assert_eq!(history.states(), vec![Phase::Two, Phase::Three, Phase::Four]);
/// ```
#[derive(Clone, Debug, Serialize)]
pub struct StateHistory<S> {
    records: VecDeque<StateRecord<S>>,
    max_len: usize,
}

impl<S: State> StateHistory<S> {
    /// Create an empty history holding at most `max_len` states.
    pub fn new(max_len: usize) -> Self {
        Self {
            records: VecDeque::new(),
            max_len,
        }
    }

    /// Record a state, evicting the oldest entries beyond the bound.
    ///
    /// Recording the same state twice in a row is not deduplicated.
    pub fn record(&mut self, state: S) {
        if self.max_len == 0 {
            return;
        }

        while self.records.len() >= self.max_len {
            self.records.pop_front();
        }

        self.records.push_back(StateRecord {
            state,
            recorded_at: Utc::now(),
        });
    }

    /// The recorded states, oldest first.
    pub fn states(&self) -> Vec<S> {
        self.records.iter().map(|r| r.state.clone()).collect()
    }

    /// The recorded states with their timestamps, oldest first.
    pub fn records(&self) -> impl Iterator<Item = &StateRecord<S>> {
        self.records.iter()
    }

    /// The most recently recorded state.
    pub fn latest(&self) -> Option<&S> {
        self.records.back().map(|r| &r.state)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The configured bound.
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Time elapsed between the oldest and the newest record.
    ///
    /// Returns `None` if nothing has been recorded.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.records.front(), self.records.back()) {
            let duration = last.recorded_at.signed_duration_since(first.recorded_at);
            duration.to_std().ok()
        } else {
            None
        }
    }
}
