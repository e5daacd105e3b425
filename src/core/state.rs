//! State identity and state lifecycle traits.
//!
//! A machine separates *which* state is active (a [`StateId`] key) from *what*
//! the state does while active (a [`State`] implementation registered under
//! that key). Keys are cheap, comparable values; behaviors are boxed trait
//! objects owned by the machine.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::hash::Hash;

/// Key identifying a registered state inside one machine.
///
/// Keys are usually fieldless enums generated with [`state_id!`](crate::state_id).
/// Two registrations under the same key are rejected, so a key always names
/// exactly one behavior.
///
/// # Example
///
/// ```rust
/// use combat_fsm::core::StateId;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
/// enum Stance {
///     Idle,
///     Guarding,
///     Dead,
/// }
///
/// impl StateId for Stance {
///     fn name(&self) -> &str {
///         match self {
///             Self::Idle => "Idle",
///             Self::Guarding => "Guarding",
///             Self::Dead => "Dead",
///         }
///     }
///
///     fn is_final(&self) -> bool {
///         matches!(self, Self::Dead)
///     }
/// }
///
/// assert_eq!(Stance::Guarding.name(), "Guarding");
/// assert!(Stance::Dead.is_final());
/// ```
pub trait StateId:
    Copy + Eq + Hash + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync + 'static
{
    /// Display name used in logs and diagnostics.
    fn name(&self) -> &str;

    /// Whether the machine is not expected to leave this state.
    ///
    /// Purely informational: the machine does not refuse transitions out of
    /// a final state.
    fn is_final(&self) -> bool {
        false
    }
}

/// Behavior run by a machine while a state is current.
///
/// Every hook defaults to a no-op, so an implementation only overrides what
/// it needs. Hooks cannot reach the owning machine directly; a state that
/// wants to leave holds a [`MachineHandle`](crate::machine::MachineHandle)
/// and requests the switch.
///
/// Event subscriptions belong in [`on_enter`](State::on_enter) and must be
/// released in [`on_exit`](State::on_exit).
pub trait State: Send {
    /// Called when the state becomes current.
    fn on_enter(&mut self) {}

    /// Called when the state stops being current.
    fn on_exit(&mut self) {}

    /// Per-frame tick, skipped on frames where an automatic transition fires.
    fn on_update(&mut self) {}

    /// Fixed-step physics tick.
    fn on_fixed_update(&mut self) {}

    /// Post-update tick.
    fn on_late_update(&mut self) {}
}
