//! Bounded state transition history.
//!
//! Machines tick every frame for the lifetime of their owner, so history is
//! kept in a fixed-capacity ring: once full, recording a transition evicts
//! the oldest one.

use super::state::StateId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// Default number of transitions a machine remembers.
pub const DEFAULT_HISTORY_CAPACITY: usize = 32;

/// Record of a single state switch.
///
/// `None` on either side means "no registered state": the machine was empty,
/// was cleared, or the state was a temporary one.
///
/// # Example
///
/// ```rust
/// use combat_fsm::core::StateTransition;
/// use combat_fsm::state_id;
/// use chrono::Utc;
///
/// state_id! {
///     enum Pose { Standing, Crouching }
/// }
///
/// let transition = StateTransition {
///     from: Some(Pose::Standing),
///     to: Some(Pose::Crouching),
///     timestamp: Utc::now(),
/// };
/// assert_eq!(transition.to, Some(Pose::Crouching));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateTransition<K: StateId> {
    /// The state being left
    pub from: Option<K>,
    /// The state being entered
    pub to: Option<K>,
    /// When the switch happened
    pub timestamp: DateTime<Utc>,
}

/// Most recent transitions of a machine, oldest first.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateHistory<K: StateId> {
    capacity: usize,
    transitions: VecDeque<StateTransition<K>>,
}

impl<K: StateId> Default for StateHistory<K> {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }
}

impl<K: StateId> StateHistory<K> {
    /// Create an empty history with the default capacity.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty history that keeps at most `capacity` transitions.
    ///
    /// A capacity of zero disables recording.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            transitions: VecDeque::with_capacity(capacity),
        }
    }

    /// Record a transition, evicting the oldest one when full.
    ///
    /// # Example
    ///
    /// ```rust
    /// use combat_fsm::core::{StateHistory, StateTransition};
    /// use combat_fsm::state_id;
    /// use chrono::Utc;
    ///
    /// state_id! {
    ///     enum Step { A, B, C }
    /// }
    ///
    /// let mut history = StateHistory::with_capacity(1);
    /// history.record(StateTransition { from: Some(Step::A), to: Some(Step::B), timestamp: Utc::now() });
    /// history.record(StateTransition { from: Some(Step::B), to: Some(Step::C), timestamp: Utc::now() });
    ///
    /// assert_eq!(history.len(), 1);
    /// assert_eq!(history.last().unwrap().to, Some(Step::C));
    /// ```
    pub fn record(&mut self, transition: StateTransition<K>) {
        if self.capacity == 0 {
            return;
        }
        if self.transitions.len() == self.capacity {
            self.transitions.pop_front();
        }
        self.transitions.push_back(transition);
    }

    /// States traversed, starting with the `from` of the oldest retained
    /// transition.
    pub fn get_path(&self) -> Vec<Option<K>> {
        let mut path = Vec::with_capacity(self.transitions.len() + 1);
        if let Some(first) = self.transitions.front() {
            path.push(first.from);
        }
        path.extend(self.transitions.iter().map(|t| t.to));
        path
    }

    /// Time between the oldest and newest retained transitions.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.transitions.front()?, self.transitions.back()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    /// Retained transitions, oldest first.
    pub fn transitions(&self) -> impl Iterator<Item = &StateTransition<K>> {
        self.transitions.iter()
    }

    /// Most recent transition.
    pub fn last(&self) -> Option<&StateTransition<K>> {
        self.transitions.back()
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.transitions.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    crate::state_id! {
        enum TestState {
            Idle,
            Moving,
            Attacking,
            Dead,
        }
        final: [Dead]
    }

    fn transition(from: Option<TestState>, to: Option<TestState>) -> StateTransition<TestState> {
        StateTransition {
            from,
            to,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn new_history_is_empty() {
        let history: StateHistory<TestState> = StateHistory::new();
        assert!(history.is_empty());
        assert!(history.get_path().is_empty());
        assert!(history.duration().is_none());
        assert_eq!(history.capacity(), DEFAULT_HISTORY_CAPACITY);
    }

    #[test]
    fn get_path_returns_state_sequence() {
        let mut history = StateHistory::new();
        history.record(transition(None, Some(TestState::Idle)));
        history.record(transition(Some(TestState::Idle), Some(TestState::Moving)));
        history.record(transition(Some(TestState::Moving), Some(TestState::Attacking)));

        assert_eq!(
            history.get_path(),
            vec![
                None,
                Some(TestState::Idle),
                Some(TestState::Moving),
                Some(TestState::Attacking)
            ]
        );
    }

    #[test]
    fn full_history_evicts_oldest() {
        let mut history = StateHistory::with_capacity(2);
        history.record(transition(None, Some(TestState::Idle)));
        history.record(transition(Some(TestState::Idle), Some(TestState::Moving)));
        history.record(transition(Some(TestState::Moving), Some(TestState::Dead)));

        assert_eq!(history.len(), 2);
        assert_eq!(
            history.get_path(),
            vec![
                Some(TestState::Idle),
                Some(TestState::Moving),
                Some(TestState::Dead)
            ]
        );
    }

    #[test]
    fn zero_capacity_records_nothing() {
        let mut history = StateHistory::with_capacity(0);
        history.record(transition(None, Some(TestState::Idle)));
        assert!(history.is_empty());
    }

    #[test]
    fn single_transition_has_duration_zero() {
        let mut history = StateHistory::new();
        history.record(transition(None, Some(TestState::Idle)));
        assert_eq!(history.duration(), Some(Duration::from_secs(0)));
    }

    #[test]
    fn duration_calculates_elapsed_time() {
        let mut history = StateHistory::new();
        let start = Utc::now();
        history.record(StateTransition {
            from: None,
            to: Some(TestState::Idle),
            timestamp: start,
        });
        history.record(StateTransition {
            from: Some(TestState::Idle),
            to: Some(TestState::Moving),
            timestamp: start + chrono::Duration::milliseconds(250),
        });

        assert_eq!(history.duration(), Some(Duration::from_millis(250)));
    }

    #[test]
    fn history_serializes_correctly() {
        let mut history = StateHistory::with_capacity(4);
        history.record(transition(Some(TestState::Idle), Some(TestState::Moving)));

        let json = serde_json::to_string(&history).unwrap();
        let deserialized: StateHistory<TestState> = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized.len(), 1);
        assert_eq!(deserialized.capacity(), 4);
        assert_eq!(deserialized.last(), history.last());
    }
}
