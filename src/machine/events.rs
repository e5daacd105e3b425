//! Notifications published by a machine when its current state changes.

use crate::core::StateId;
use crate::events::{EventSource, SubscriptionId};

/// Fan-out of state change notifications to external listeners.
///
/// `None` stands for "no registered state" (empty machine, cleared machine or
/// a temporary state).
pub struct StateEventSystem<K: StateId> {
    state_changed: EventSource<Option<K>>,
    state_transition: EventSource<(Option<K>, Option<K>)>,
}

impl<K: StateId> StateEventSystem<K> {
    pub fn new() -> Self {
        Self {
            state_changed: EventSource::new(),
            state_transition: EventSource::new(),
        }
    }

    /// Listen for the new state after every switch.
    pub fn on_state_changed<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(Option<K>) + Send + Sync + 'static,
    {
        self.state_changed.subscribe(move |state| listener(*state))
    }

    /// Listen for `(from, to)` after every switch.
    pub fn on_state_transition<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(Option<K>, Option<K>) + Send + Sync + 'static,
    {
        self.state_transition
            .subscribe(move |(from, to)| listener(*from, *to))
    }

    pub fn unsubscribe_state_changed(&self, id: SubscriptionId) -> bool {
        self.state_changed.unsubscribe(id)
    }

    pub fn unsubscribe_state_transition(&self, id: SubscriptionId) -> bool {
        self.state_transition.unsubscribe(id)
    }

    pub fn notify_state_changed(&self, new_state: Option<K>) {
        self.state_changed.emit(&new_state);
    }

    pub fn notify_state_transition(&self, from: Option<K>, to: Option<K>) {
        self.state_transition.emit(&(from, to));
    }
}

impl<K: StateId> Default for StateEventSystem<K> {
    fn default() -> Self {
        Self::new()
    }
}
