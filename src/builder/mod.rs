//! Builder API for ergonomic state machine construction.
//!
//! This module provides fluent builders and the [`state_id!`](crate::state_id)
//! macro for creating machines with minimal boilerplate.

pub mod error;
pub mod machine;
pub mod macros;
pub mod transition;

pub use error::BuildError;
pub use machine::StateMachineBuilder;
pub use transition::{TransitionBuilder, TransitionDefinition, TransitionKind};
