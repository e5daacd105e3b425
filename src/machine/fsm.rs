//! The finite state machine driving a set of registered states.

use super::error::FsmError;
use super::events::StateEventSystem;
use super::handle::{MachineHandle, Request};
use super::registry::StateRegistry;
use super::transitions::TransitionManager;
use crate::core::{Guard, State, StateHistory, StateId, StateTransition, DEFAULT_HISTORY_CAPACITY};
use chrono::Utc;
use std::fmt;
use tracing::{debug, error, warn};

/// Upper bound on requests applied back to back by one entry point.
///
/// States that keep requesting each other from `on_enter` would otherwise
/// spin forever inside a single tick.
pub const MAX_CHAINED_REQUESTS: usize = 64;

enum Current<K> {
    Empty,
    Registered(K),
    Temporary(Box<dyn State>),
}

/// Finite state machine over states registered under keys of type `K`.
///
/// The owner registers states, enters an initial one and then calls
/// [`update`](Self::update) once per frame (plus [`fixed_update`](Self::fixed_update)
/// and [`late_update`](Self::late_update) from the matching phases). A state
/// can own another machine and tick it from its own `on_update`, which gives
/// hierarchical behavior.
///
/// # Example
///
/// ```rust
/// use combat_fsm::core::State;
/// use combat_fsm::machine::FiniteStateMachine;
/// use combat_fsm::state_id;
/// use std::sync::atomic::{AtomicBool, Ordering};
/// use std::sync::Arc;
///
/// state_id! {
///     enum Door { Closed, Open }
/// }
///
/// struct Still;
/// impl State for Still {}
///
/// let pushed = Arc::new(AtomicBool::new(false));
/// let guard = Arc::clone(&pushed);
///
/// let mut machine = FiniteStateMachine::new();
/// machine
///     .register_state(Door::Closed, Still)?
///     .register_state(Door::Open, Still)?;
/// machine.add_automatic_transition(Door::Closed, Door::Open, move || guard.load(Ordering::Relaxed));
/// machine.try_set_current_state(Door::Closed)?;
///
/// machine.update();
/// assert_eq!(machine.current_state(), Some(Door::Closed));
///
/// pushed.store(true, Ordering::Relaxed);
/// machine.update();
/// assert_eq!(machine.current_state(), Some(Door::Open));
/// # Ok::<(), combat_fsm::machine::FsmError>(())
/// ```
pub struct FiniteStateMachine<K: StateId> {
    transitions: TransitionManager<K>,
    events: StateEventSystem<K>,
    current: Current<K>,
    handle: MachineHandle<K>,
    history: StateHistory<K>,
}

impl<K: StateId> FiniteStateMachine<K> {
    pub fn new() -> Self {
        Self::with_history_capacity(DEFAULT_HISTORY_CAPACITY)
    }

    /// Create a machine that remembers at most `capacity` transitions.
    pub fn with_history_capacity(capacity: usize) -> Self {
        Self::from_parts(MachineHandle::new(), capacity)
    }

    pub(crate) fn from_parts(handle: MachineHandle<K>, history_capacity: usize) -> Self {
        Self {
            transitions: TransitionManager::new(StateRegistry::new()),
            events: StateEventSystem::new(),
            current: Current::Empty,
            handle,
            history: StateHistory::with_capacity(history_capacity),
        }
    }

    // Configuration

    /// Register `state` under `key`. Fails if `key` already has a state.
    pub fn register_state<S>(&mut self, key: K, state: S) -> Result<&mut Self, FsmError>
    where
        S: State + 'static,
    {
        self.register_boxed(key, Box::new(state))
    }

    pub fn register_boxed(&mut self, key: K, state: Box<dyn State>) -> Result<&mut Self, FsmError> {
        self.transitions.registry_mut().register_state(key, state)?;
        debug!(state = key.name(), "registered state");
        Ok(self)
    }

    /// Declare a transition polled on every [`update`](Self::update) while
    /// `from` is current. The first passing guard in declaration order wins.
    pub fn add_automatic_transition(&mut self, from: K, to: K, guard: impl Into<Guard>) -> &mut Self {
        self.transitions.add_auto_transition(from, to, guard.into());
        self
    }

    /// Declare a transition that only fires through
    /// [`fire_event_transition`](Self::fire_event_transition).
    pub fn add_event_transition(&mut self, from: K, to: K, guard: impl Into<Guard>) -> &mut Self {
        self.transitions.add_event_transition(from, to, guard.into());
        self
    }

    // Inspection

    /// Key of the current state; `None` when empty or running a temporary state.
    pub fn current_state(&self) -> Option<K> {
        match self.current {
            Current::Registered(key) => Some(key),
            Current::Empty | Current::Temporary(_) => None,
        }
    }

    pub fn has_current_state(&self) -> bool {
        !matches!(self.current, Current::Empty)
    }

    pub fn is_temporary(&self) -> bool {
        matches!(self.current, Current::Temporary(_))
    }

    /// Handle for requesting switches from states and listeners.
    pub fn handle(&self) -> MachineHandle<K> {
        self.handle.clone()
    }

    pub fn events(&self) -> &StateEventSystem<K> {
        &self.events
    }

    pub fn history(&self) -> &StateHistory<K> {
        &self.history
    }

    pub fn registry(&self) -> &StateRegistry<K> {
        self.transitions.registry()
    }

    /// Registered keys in registration order.
    pub fn states(&self) -> Vec<K> {
        self.registry().get_states()
    }

    // State operations

    /// Switch to the state registered under `key`.
    ///
    /// Runs `on_exit` on the old state, `on_enter` on the new one, publishes
    /// the change and then applies any requests queued meanwhile.
    pub fn try_set_current_state(&mut self, key: K) -> Result<(), FsmError> {
        self.switch_to(key)?;
        self.apply_pending_requests();
        Ok(())
    }

    /// Lenient variant of [`try_set_current_state`](Self::try_set_current_state):
    /// an unregistered key is logged and the current state is kept.
    ///
    /// Returns whether the switch happened.
    pub fn set_current_state(&mut self, key: K) -> bool {
        match self.try_set_current_state(key) {
            Ok(()) => true,
            Err(err) => {
                error!(state = key.name(), error = %err, "state not found; register it first");
                false
            }
        }
    }

    /// Run `state` as the current state without registering it.
    ///
    /// The temporary state has no declared transitions and cannot be reached
    /// by key; it is dropped when the machine switches away from it.
    pub fn set_temporary_state<S>(&mut self, state: S)
    where
        S: State + 'static,
    {
        let from = self.current_state();
        let mut state: Box<dyn State> = Box::new(state);

        self.exit_current();
        state.on_enter();
        self.publish(from, None);
        self.current = Current::Temporary(state);

        self.apply_pending_requests();
    }

    /// Exit the current state and leave the machine empty.
    pub fn clear_state(&mut self) {
        self.clear_current();
        self.apply_pending_requests();
    }

    /// Target of the event transition from the current state to `target`,
    /// if one is declared and its guard passes.
    pub fn evaluate_event_transition(&self, target: K) -> Option<K> {
        let current = self.current_state()?;
        self.transitions.evaluate_event_transition(current, target)
    }

    /// Switch to `target` only if a declared event transition permits it.
    pub fn fire_event_transition(&mut self, target: K) -> bool {
        match self.evaluate_event_transition(target) {
            Some(target) => self.set_current_state(target),
            None => false,
        }
    }

    // Lifecycle

    /// Per-frame tick.
    ///
    /// Applies queued requests, then evaluates automatic transitions. When
    /// one fires the machine switches and the outgoing state's `on_update`
    /// is skipped for this tick; otherwise the current state is updated.
    pub fn update(&mut self) {
        self.apply_pending_requests();

        let key = match self.current {
            Current::Empty => {
                error!("attempted to update a machine with no current state");
                return;
            }
            Current::Registered(key) => Some(key),
            Current::Temporary(_) => None,
        };

        if let Some(next) = key.and_then(|key| self.transitions.evaluate_auto_transitions(key)) {
            match self.switch_to(next) {
                Ok(()) => {
                    self.apply_pending_requests();
                    return;
                }
                Err(err) => {
                    error!(state = next.name(), error = %err, "automatic transition target has no state");
                }
            }
        }

        if let Some(state) = self.current_behavior_mut() {
            state.on_update();
        }
        self.apply_pending_requests();
    }

    pub fn fixed_update(&mut self) {
        if let Some(state) = self.current_behavior_mut() {
            state.on_fixed_update();
        }
        self.apply_pending_requests();
    }

    pub fn late_update(&mut self) {
        if let Some(state) = self.current_behavior_mut() {
            state.on_late_update();
        }
        self.apply_pending_requests();
    }

    /// Apply queued requests in order. Returns how many were applied.
    pub fn apply_pending_requests(&mut self) -> usize {
        let mut applied = 0;
        while let Some(request) = self.handle.pop() {
            if applied == MAX_CHAINED_REQUESTS {
                let dropped = self.handle.discard() + 1;
                warn!(dropped, "request chain limit reached; discarding remaining requests");
                break;
            }

            match request {
                Request::Switch(key) => {
                    if let Err(err) = self.switch_to(key) {
                        error!(state = key.name(), error = %err, "requested state not found; keeping current state");
                    }
                }
                Request::Clear => self.clear_current(),
            }
            applied += 1;
        }
        applied
    }

    /// Drop queued requests without applying them.
    pub fn discard_pending_requests(&mut self) -> usize {
        self.handle.discard()
    }

    fn switch_to(&mut self, key: K) -> Result<(), FsmError> {
        if !self.transitions.registry().is_registered(key) {
            return Err(FsmError::InvalidState {
                state: key.name().to_string(),
            });
        }

        let from = self.current_state();
        self.exit_current();
        if let Some(state) = self.transitions.registry_mut().state_mut(key) {
            state.on_enter();
        }
        self.publish(from, Some(key));
        self.current = Current::Registered(key);
        Ok(())
    }

    fn clear_current(&mut self) {
        let from = self.current_state();
        self.exit_current();
        self.publish(from, None);
        self.current = Current::Empty;
    }

    fn exit_current(&mut self) {
        if let Some(state) = self.current_behavior_mut() {
            state.on_exit();
        }
    }

    fn publish(&mut self, from: Option<K>, to: Option<K>) {
        debug!(
            from = from.as_ref().map(StateId::name),
            to = to.as_ref().map(StateId::name),
            "state transition"
        );
        self.events.notify_state_changed(to);
        self.events.notify_state_transition(from, to);
        self.history.record(StateTransition {
            from,
            to,
            timestamp: Utc::now(),
        });
    }

    fn current_behavior_mut(&mut self) -> Option<&mut (dyn State + 'static)> {
        match &mut self.current {
            Current::Empty => None,
            Current::Registered(key) => {
                let key = *key;
                self.transitions.registry_mut().state_mut(key)
            }
            Current::Temporary(state) => Some(state.as_mut()),
        }
    }
}

impl<K: StateId> Default for FiniteStateMachine<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: StateId> fmt::Debug for FiniteStateMachine<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FiniteStateMachine")
            .field("current", &self.current_state())
            .field("temporary", &self.is_temporary())
            .field("states", &self.states())
            .field("pending", &self.handle.pending())
            .finish()
    }
}
