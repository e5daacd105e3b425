//! Per-state records: the state's behavior and its outgoing transitions.

use crate::core::{Guard, State, StateId};
use std::fmt;

/// Outgoing edge: a target key plus the guard that permits it.
#[derive(Clone, Debug)]
pub struct Transition<K: StateId> {
    target: K,
    guard: Guard,
}

impl<K: StateId> Transition<K> {
    pub fn new(target: K, guard: Guard) -> Self {
        Self { target, guard }
    }

    pub fn target(&self) -> K {
        self.target
    }

    /// Evaluate the guard.
    pub fn is_satisfied(&self) -> bool {
        self.guard.check()
    }
}

/// Record kept for every key a machine knows about.
///
/// A node is created either when a state is registered or when a transition
/// mentions a key that has no state yet. Until a state is attached the node
/// only carries transitions and the key counts as unregistered.
pub struct StateNode<K: StateId> {
    state: Option<Box<dyn State>>,
    auto: Vec<Transition<K>>,
    event: Vec<Transition<K>>,
}

impl<K: StateId> StateNode<K> {
    pub(crate) fn declared() -> Self {
        Self {
            state: None,
            auto: Vec::new(),
            event: Vec::new(),
        }
    }

    pub(crate) fn attach(&mut self, state: Box<dyn State>) {
        self.state = Some(state);
    }

    pub fn has_state(&self) -> bool {
        self.state.is_some()
    }

    pub(crate) fn state_mut(&mut self) -> Option<&mut (dyn State + 'static)> {
        self.state.as_deref_mut()
    }

    /// Transitions polled on every update, in declaration order.
    pub fn auto(&self) -> &[Transition<K>] {
        &self.auto
    }

    /// Transitions consulted only on request, in declaration order.
    pub fn event(&self) -> &[Transition<K>] {
        &self.event
    }

    pub(crate) fn push_auto(&mut self, transition: Transition<K>) {
        self.auto.push(transition);
    }

    pub(crate) fn push_event(&mut self, transition: Transition<K>) {
        self.event.push(transition);
    }
}

impl<K: StateId> fmt::Debug for StateNode<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateNode")
            .field("has_state", &self.has_state())
            .field("auto", &self.auto)
            .field("event", &self.event)
            .finish()
    }
}
