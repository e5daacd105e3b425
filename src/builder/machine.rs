//! Builder for constructing state machines.

use crate::builder::error::BuildError;
use crate::builder::transition::{TransitionBuilder, TransitionDefinition, TransitionKind};
use crate::core::{Guard, State, StateId, DEFAULT_HISTORY_CAPACITY};
use crate::machine::{FiniteStateMachine, MachineHandle};

/// Builder for machines with a fluent API.
///
/// The handle the finished machine will drain is available before any state
/// is constructed, so states can capture it to request switches.
///
/// # Example
///
/// ```
/// use combat_fsm::builder::StateMachineBuilder;
/// use combat_fsm::core::State;
/// use combat_fsm::machine::MachineHandle;
/// use combat_fsm::state_id;
///
/// state_id! {
///     enum Light { Red, Green }
/// }
///
/// struct Flip {
///     handle: MachineHandle<Light>,
///     next: Light,
/// }
///
/// impl State for Flip {
///     fn on_update(&mut self) {
///         self.handle.request(self.next);
///     }
/// }
///
/// let builder = StateMachineBuilder::new();
/// let handle = builder.handle();
/// let mut machine = builder
///     .state(Light::Red, Flip { handle: handle.clone(), next: Light::Green })
///     .state(Light::Green, Flip { handle, next: Light::Red })
///     .initial(Light::Red)
///     .build()
///     .unwrap();
///
/// machine.update();
/// assert_eq!(machine.current_state(), Some(Light::Green));
/// ```
pub struct StateMachineBuilder<K: StateId> {
    handle: MachineHandle<K>,
    initial: Option<K>,
    states: Vec<(K, Box<dyn State>)>,
    transitions: Vec<TransitionDefinition<K>>,
    history_capacity: usize,
}

impl<K: StateId> StateMachineBuilder<K> {
    pub fn new() -> Self {
        Self {
            handle: MachineHandle::new(),
            initial: None,
            states: Vec::new(),
            transitions: Vec::new(),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }

    /// Handle of the machine being built.
    pub fn handle(&self) -> MachineHandle<K> {
        self.handle.clone()
    }

    /// Register `state` under `key`. Duplicates are reported by `build`.
    pub fn state<S>(self, key: K, state: S) -> Self
    where
        S: State + 'static,
    {
        self.boxed_state(key, Box::new(state))
    }

    pub fn boxed_state(mut self, key: K, state: Box<dyn State>) -> Self {
        self.states.push((key, state));
        self
    }

    /// Set the state entered by `build` (required).
    pub fn initial(mut self, key: K) -> Self {
        self.initial = Some(key);
        self
    }

    pub fn history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    pub fn auto_transition(mut self, from: K, to: K, guard: impl Into<Guard>) -> Self {
        self.transitions.push(TransitionDefinition {
            from,
            to,
            guard: guard.into(),
            kind: TransitionKind::Automatic,
        });
        self
    }

    pub fn event_transition(mut self, from: K, to: K, guard: impl Into<Guard>) -> Self {
        self.transitions.push(TransitionDefinition {
            from,
            to,
            guard: guard.into(),
            kind: TransitionKind::Event,
        });
        self
    }

    /// Add a transition using a builder.
    /// Returns an error if the builder fails validation.
    pub fn transition(mut self, builder: TransitionBuilder<K>) -> Result<Self, BuildError> {
        self.transitions.push(builder.build()?);
        Ok(self)
    }

    /// Register everything, then enter the initial state.
    pub fn build(self) -> Result<FiniteStateMachine<K>, BuildError> {
        let initial = self.initial.ok_or(BuildError::MissingInitialState)?;
        if self.states.is_empty() {
            return Err(BuildError::NoStates);
        }

        let mut machine = FiniteStateMachine::from_parts(self.handle, self.history_capacity);
        for (key, state) in self.states {
            machine.register_boxed(key, state)?;
        }
        for transition in self.transitions {
            match transition.kind {
                TransitionKind::Automatic => {
                    machine.add_automatic_transition(transition.from, transition.to, transition.guard)
                }
                TransitionKind::Event => {
                    machine.add_event_transition(transition.from, transition.to, transition.guard)
                }
            };
        }

        machine.try_set_current_state(initial)?;
        Ok(machine)
    }
}

impl<K: StateId> Default for StateMachineBuilder<K> {
    fn default() -> Self {
        Self::new()
    }
}
