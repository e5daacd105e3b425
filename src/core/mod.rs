//! Core state machine types.
//!
//! This module contains the vocabulary shared by every machine:
//! - State keys via the `StateId` trait and behaviors via the `State` trait
//! - Guard conditions for declarative transitions
//! - Bounded transition history

mod guard;
mod history;
mod state;

pub use guard::Guard;
pub use history::{StateHistory, StateTransition, DEFAULT_HISTORY_CAPACITY};
pub use state::{State, StateId};
