//! Property-based tests for machines and the combo sequencer.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated inputs.

use combat_fsm::combo::{Attack, Combo, ComboManager};
use combat_fsm::core::{Guard, State, StateId};
use combat_fsm::machine::{FiniteStateMachine, MAX_CHAINED_REQUESTS};
use combat_fsm::state_id;
use proptest::prelude::*;
use std::collections::HashSet;

state_id! {
    enum TestState {
        Idle,
        Patrol,
        Chase,
        Attack,
        Dead,
    }
    final: [Dead]
}

const ALL: [TestState; 5] = [
    TestState::Idle,
    TestState::Patrol,
    TestState::Chase,
    TestState::Attack,
    TestState::Dead,
];

struct Noop;

impl State for Noop {}

prop_compose! {
    fn arbitrary_state()(variant in 0..ALL.len()) -> TestState {
        ALL[variant]
    }
}

prop_compose! {
    fn arbitrary_table()(
        lengths in prop::collection::vec(1..5usize, 1..5)
    ) -> Vec<Combo> {
        lengths
            .iter()
            .enumerate()
            .map(|(combo, len)| {
                let attacks = (0..*len).map(|attack| Attack::new(format!("c{combo}a{attack}"))).collect();
                Combo::new(format!("combo{combo}"), attacks)
            })
            .collect()
    }
}

fn full_machine(history_capacity: usize) -> FiniteStateMachine<TestState> {
    let mut machine = FiniteStateMachine::with_history_capacity(history_capacity);
    for state in ALL {
        machine.register_state(state, Noop).unwrap();
    }
    machine
}

proptest! {
    #[test]
    fn guard_is_deterministic(flag in any::<bool>()) {
        let guard = Guard::new(move || flag);
        prop_assert_eq!(guard.check(), guard.check());
        prop_assert_eq!(guard.check(), flag);
    }

    #[test]
    fn state_name_matches_variant(state in arbitrary_state()) {
        prop_assert_eq!(state.name(), format!("{state:?}"));
        prop_assert_eq!(state.is_final(), state == TestState::Dead);
    }

    #[test]
    fn first_passing_auto_transition_fires(
        transitions in prop::collection::vec((1..ALL.len(), any::<bool>()), 0..8)
    ) {
        let mut machine = full_machine(8);
        for &(target, passes) in &transitions {
            machine.add_automatic_transition(TestState::Idle, ALL[target], move || passes);
        }
        machine.try_set_current_state(TestState::Idle).unwrap();

        machine.update();

        let expected = transitions
            .iter()
            .find(|(_, passes)| *passes)
            .map_or(TestState::Idle, |(target, _)| ALL[*target]);
        prop_assert_eq!(machine.current_state(), Some(expected));
    }

    #[test]
    fn each_key_registers_once(keys in prop::collection::vec(arbitrary_state(), 0..12)) {
        let mut machine: FiniteStateMachine<TestState> = FiniteStateMachine::new();
        let accepted = keys
            .iter()
            .filter(|key| machine.register_state(**key, Noop).is_ok())
            .count();

        let distinct: HashSet<_> = keys.iter().copied().collect();
        prop_assert_eq!(accepted, distinct.len());
        prop_assert_eq!(machine.states().len(), distinct.len());
    }

    #[test]
    fn history_is_bounded_and_ends_at_current(
        capacity in 1..6usize,
        switches in prop::collection::vec(arbitrary_state(), 1..20)
    ) {
        let mut machine = full_machine(capacity);
        for state in &switches {
            prop_assert!(machine.set_current_state(*state));
        }

        let history = machine.history();
        prop_assert_eq!(history.len(), switches.len().min(capacity));
        prop_assert_eq!(history.last().map(|t| t.to), Some(switches.last().copied()));
        prop_assert_eq!(machine.current_state(), switches.last().copied());
    }

    #[test]
    fn queued_requests_stop_at_chain_limit(
        requests in prop::collection::vec(arbitrary_state(), 0..(2 * MAX_CHAINED_REQUESTS))
    ) {
        let mut machine = full_machine(4);
        let handle = machine.handle();
        for state in &requests {
            handle.request(*state);
        }

        let applied = machine.apply_pending_requests();

        prop_assert_eq!(applied, requests.len().min(MAX_CHAINED_REQUESTS));
        prop_assert_eq!(handle.pending(), 0);
        prop_assert_eq!(
            machine.current_state(),
            requests.iter().take(MAX_CHAINED_REQUESTS).last().copied()
        );
    }

    #[test]
    fn combo_cursor_stays_in_bounds(
        table in arbitrary_table(),
        gaps in prop::collection::vec(0.0f32..3.0, 1..30)
    ) {
        let mut combos = ComboManager::new(1.0, table).unwrap();
        let mut now = 0.0;

        for gap in gaps {
            now += gap;
            combos.get_attack_and_update_index(now);

            prop_assert!(combos.combo_index() < combos.combos().len());
            prop_assert!(combos.attack_index() < combos.current_combo().len());
            prop_assert_eq!(combos.last_attack_time(), now);
        }
    }

    #[test]
    fn quick_attacks_walk_one_combo_in_order(
        table in arbitrary_table(),
        count in 1..20usize
    ) {
        let mut combos = ComboManager::new(1.0, table).unwrap();
        let first = combos.combos()[0].clone();

        for step in 0..count {
            let attack = combos.get_attack_and_update_index(step as f32 * 0.5).clone();
            prop_assert_eq!(&attack, &first.attacks[step % first.len()]);
            prop_assert_eq!(combos.combo_index(), 0);
        }
    }
}
