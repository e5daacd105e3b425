//! Builder for declaring state transitions.

use crate::builder::error::BuildError;
use crate::core::{Guard, StateId};

/// How a declared transition fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TransitionKind {
    /// Polled on every update while the source state is current.
    #[default]
    Automatic,
    /// Fired on demand through `fire_event_transition`.
    Event,
}

/// A validated transition ready to be added to a machine.
#[derive(Clone, Debug)]
pub struct TransitionDefinition<K: StateId> {
    pub from: K,
    pub to: K,
    pub guard: Guard,
    pub kind: TransitionKind,
}

/// Builder for transitions with a fluent API.
///
/// Without a guard the transition is unconditional.
///
/// # Example
///
/// ```
/// use combat_fsm::builder::{TransitionBuilder, TransitionKind};
/// use combat_fsm::state_id;
///
/// state_id! {
///     enum Stance { Guarding, Striking }
/// }
///
/// let transition = TransitionBuilder::new()
///     .from(Stance::Guarding)
///     .to(Stance::Striking)
///     .when(|| true)
///     .on_event()
///     .build()
///     .unwrap();
///
/// assert_eq!(transition.kind, TransitionKind::Event);
/// assert!(transition.guard.check());
/// ```
pub struct TransitionBuilder<K: StateId> {
    from: Option<K>,
    to: Option<K>,
    guard: Option<Guard>,
    kind: TransitionKind,
}

impl<K: StateId> TransitionBuilder<K> {
    pub fn new() -> Self {
        Self {
            from: None,
            to: None,
            guard: None,
            kind: TransitionKind::Automatic,
        }
    }

    /// Set the source state (required).
    pub fn from(mut self, state: K) -> Self {
        self.from = Some(state);
        self
    }

    /// Set the target state (required).
    pub fn to(mut self, state: K) -> Self {
        self.to = Some(state);
        self
    }

    pub fn guard(mut self, guard: Guard) -> Self {
        self.guard = Some(guard);
        self
    }

    /// Add a guard using a closure (optional).
    pub fn when<F>(mut self, predicate: F) -> Self
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        self.guard = Some(Guard::new(predicate));
        self
    }

    /// Poll the transition on every update (the default).
    pub fn automatic(mut self) -> Self {
        self.kind = TransitionKind::Automatic;
        self
    }

    /// Only fire the transition on demand.
    pub fn on_event(mut self) -> Self {
        self.kind = TransitionKind::Event;
        self
    }

    pub fn build(self) -> Result<TransitionDefinition<K>, BuildError> {
        let from = self.from.ok_or(BuildError::MissingFromState)?;
        let to = self.to.ok_or(BuildError::MissingToState)?;

        Ok(TransitionDefinition {
            from,
            to,
            guard: self.guard.unwrap_or_else(Guard::always),
            kind: self.kind,
        })
    }
}

impl<K: StateId> Default for TransitionBuilder<K> {
    fn default() -> Self {
        Self::new()
    }
}
