//! Declaration and evaluation of automatic and event transitions.

use super::node::Transition;
use super::registry::StateRegistry;
use crate::core::{Guard, StateId};

/// Stores transitions on the registry's nodes and evaluates them.
///
/// The manager owns the registry so that every declared transition lands on
/// a node, even when the states involved are registered later.
pub struct TransitionManager<K: StateId> {
    registry: StateRegistry<K>,
}

impl<K: StateId> TransitionManager<K> {
    pub fn new(registry: StateRegistry<K>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &StateRegistry<K> {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut StateRegistry<K> {
        &mut self.registry
    }

    /// Append an automatic transition; declaration order is evaluation order.
    pub fn add_auto_transition(&mut self, from: K, to: K, guard: Guard) {
        self.registry.check_and_declare(to);
        self.registry
            .check_and_declare(from)
            .push_auto(Transition::new(to, guard));
    }

    /// Append an event transition, consulted only by
    /// [`evaluate_event_transition`](Self::evaluate_event_transition).
    pub fn add_event_transition(&mut self, from: K, to: K, guard: Guard) {
        self.registry.check_and_declare(to);
        self.registry
            .check_and_declare(from)
            .push_event(Transition::new(to, guard));
    }

    /// Target of the first automatic transition out of `current` whose guard
    /// passes. Later transitions are not evaluated once one matches.
    pub fn evaluate_auto_transitions(&self, current: K) -> Option<K> {
        if !self.registry.is_registered(current) {
            return None;
        }

        self.registry
            .get_node(current)?
            .auto()
            .iter()
            .find(|transition| transition.is_satisfied())
            .map(Transition::target)
    }

    /// `Some(target)` if `current` declares an event transition to `target`
    /// whose guard passes right now.
    pub fn evaluate_event_transition(&self, current: K, target: K) -> Option<K> {
        if !self.registry.is_registered(current) {
            return None;
        }

        self.registry
            .get_node(current)?
            .event()
            .iter()
            .any(|transition| transition.target() == target && transition.is_satisfied())
            .then_some(target)
    }
}

impl<K: StateId> Default for TransitionManager<K> {
    fn default() -> Self {
        Self::new(StateRegistry::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::State;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    crate::state_id! {
        enum TestState {
            Idle,
            Moving,
            Attacking,
            Dead,
        }
        final: [Dead]
    }

    struct Noop;

    impl State for Noop {}

    fn manager_with(states: &[TestState]) -> TransitionManager<TestState> {
        let mut manager = TransitionManager::default();
        for state in states {
            manager
                .registry_mut()
                .register_state(*state, Box::new(Noop))
                .unwrap();
        }
        manager
    }

    #[test]
    fn first_matching_auto_transition_wins() {
        let mut manager = manager_with(&[TestState::Idle, TestState::Moving, TestState::Attacking]);
        let evaluated = Arc::new(AtomicUsize::new(0));
        let third = Arc::clone(&evaluated);

        manager.add_auto_transition(TestState::Idle, TestState::Dead, Guard::new(|| false));
        manager.add_auto_transition(TestState::Idle, TestState::Moving, Guard::always());
        manager.add_auto_transition(
            TestState::Idle,
            TestState::Attacking,
            Guard::new(move || {
                third.fetch_add(1, Ordering::Relaxed);
                true
            }),
        );

        assert_eq!(
            manager.evaluate_auto_transitions(TestState::Idle),
            Some(TestState::Moving)
        );
        assert_eq!(evaluated.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn no_matching_auto_transition_returns_none() {
        let mut manager = manager_with(&[TestState::Idle, TestState::Moving]);
        manager.add_auto_transition(TestState::Idle, TestState::Moving, Guard::new(|| false));

        assert_eq!(manager.evaluate_auto_transitions(TestState::Idle), None);
    }

    #[test]
    fn unregistered_state_has_no_auto_transitions() {
        let mut manager = TransitionManager::default();
        manager.add_auto_transition(TestState::Idle, TestState::Moving, Guard::always());

        assert!(!manager.registry().is_registered(TestState::Idle));
        assert_eq!(manager.evaluate_auto_transitions(TestState::Idle), None);
    }

    #[test]
    fn adding_transitions_declares_both_ends() {
        let mut manager: TransitionManager<TestState> = TransitionManager::default();
        manager.add_event_transition(TestState::Moving, TestState::Dead, Guard::always());

        assert!(manager.registry().get_node(TestState::Moving).is_some());
        assert!(manager.registry().get_node(TestState::Dead).is_some());
    }

    #[test]
    fn event_transition_requires_matching_target_and_guard() {
        let mut manager = manager_with(&[TestState::Idle, TestState::Moving, TestState::Dead]);
        manager.add_event_transition(TestState::Idle, TestState::Moving, Guard::always());
        manager.add_event_transition(TestState::Idle, TestState::Dead, Guard::new(|| false));

        assert_eq!(
            manager.evaluate_event_transition(TestState::Idle, TestState::Moving),
            Some(TestState::Moving)
        );
        assert_eq!(
            manager.evaluate_event_transition(TestState::Idle, TestState::Dead),
            None
        );
        assert_eq!(
            manager.evaluate_event_transition(TestState::Idle, TestState::Attacking),
            None
        );
    }

    #[test]
    fn event_transitions_are_not_automatic() {
        let mut manager = manager_with(&[TestState::Idle, TestState::Moving]);
        manager.add_event_transition(TestState::Idle, TestState::Moving, Guard::always());

        assert_eq!(manager.evaluate_auto_transitions(TestState::Idle), None);
    }
}
