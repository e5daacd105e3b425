//! Combat FSM: hierarchical state machines and combo sequencing for
//! action-combat agents.
//!
//! The crate has two layers. The machine layer is generic: states are
//! behaviors registered under copyable keys, transitions are guarded
//! predicates evaluated once per tick, and a state may own a machine of its
//! own. The combat layer builds enemy and player brains on top of it,
//! together with the combo sequencer, health, hit reactions and the attack
//! slot allocator they share.
//!
//! # Core Concepts
//!
//! - **Keys**: state identifiers implement [`StateId`], usually via [`state_id!`]
//! - **Behaviors**: [`State`] hooks run while a key is current
//! - **Guards**: predicates controlling automatic and event transitions
//! - **Handles**: [`MachineHandle`] queues switches requested from inside states
//! - **Combos**: [`ComboManager`] walks ordered attack sequences with a time window
//!
//! # Example
//!
//! ```rust
//! use combat_fsm::{state_id, State, StateMachineBuilder};
//! use std::sync::atomic::{AtomicBool, Ordering};
//! use std::sync::Arc;
//!
//! state_id! {
//!     enum Sentry { Idle, Alert }
//! }
//!
//! struct Quiet;
//! impl State for Quiet {}
//!
//! let noise = Arc::new(AtomicBool::new(false));
//! let heard = Arc::clone(&noise);
//!
//! let mut machine = StateMachineBuilder::new()
//!     .state(Sentry::Idle, Quiet)
//!     .state(Sentry::Alert, Quiet)
//!     .auto_transition(Sentry::Idle, Sentry::Alert, move || heard.load(Ordering::Relaxed))
//!     .initial(Sentry::Idle)
//!     .build()?;
//!
//! machine.update();
//! assert_eq!(machine.current_state(), Some(Sentry::Idle));
//!
//! noise.store(true, Ordering::Relaxed);
//! machine.update();
//! assert_eq!(machine.current_state(), Some(Sentry::Alert));
//! # Ok::<(), combat_fsm::BuildError>(())
//! ```

pub mod builder;
pub mod combat;
pub mod combo;
pub mod config;
pub mod core;
pub mod events;
pub mod machine;

// Re-export commonly used types
pub use builder::{BuildError, StateMachineBuilder, TransitionBuilder};
pub use combo::{Attack, Combo, ComboConfig, ComboError, ComboManager};
pub use config::{CombatConfig, ConfigError};
pub use core::{Guard, State, StateHistory, StateId, StateTransition};
pub use events::{EventSource, SubscriptionId, Subscriptions};
pub use machine::{FiniteStateMachine, FsmError, MachineHandle};
