//! Runtime state machine: registry, transitions, notifications and the
//! machine that ties them together.

mod error;
mod events;
mod fsm;
mod handle;
mod node;
mod registry;
mod transitions;

pub use error::FsmError;
pub use events::StateEventSystem;
pub use fsm::{FiniteStateMachine, MAX_CHAINED_REQUESTS};
pub use handle::{MachineHandle, Request};
pub use node::{StateNode, Transition};
pub use registry::StateRegistry;
pub use transitions::TransitionManager;
