//! Combat agents built on the state machine.
//!
//! Collaborators ([`Health`], [`HitReactStatus`], [`Combatant`],
//! [`AttackSlotManager`], [`CombatContext`]) hold the game-side state and
//! publish signals through [`EventSource`](crate::events::EventSource).
//! [`EnemyBrain`] and [`PlayerBrain`] wire them into state machines whose
//! states subscribe to those signals while active. Scene queries, input and
//! presentation come in through the [`TargetSensor`], [`InputSource`] and
//! [`AgentEffects`] traits.

mod combatant;
mod context;
mod effects;
mod enemy;
mod health;
mod hit;
mod player;
mod sensors;
mod slots;
mod states;

pub use combatant::Combatant;
pub use context::CombatContext;
pub use effects::{AgentEffects, NoEffects};
pub use enemy::{EnemyBrain, EnemyDeps, EnemyState, MoveStep};
pub use health::Health;
pub use hit::{HitReactStatus, HitReceiver};
pub use player::{PlayerBrain, PlayerDeps, PlayerState};
pub use sensors::{InputSource, TargetSensor};
pub use slots::{AgentId, AttackSlotManager, SlotCandidate};
pub use states::{Death, HitKeys, HitReaction, DESPAWN_DELAY};
