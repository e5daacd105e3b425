//! Enemy brain: a two-level machine driven by hits, slots and counters.
//!
//! ```text
//! Move ──hit──▶ Hit ──dead──▶ Death
//!  │ ▲           │
//!  │ └─recover───┘
//!  │ ▲
//!  │ └─attack end── Attack ──hit──▶ Hit
//!  └──in range (FollowPlayer)──▶ Attack
//! ```
//!
//! Move owns a sub machine: Reposition until granted an attack slot, then
//! FollowPlayer; OnCounter when the player counters.

use super::combatant::Combatant;
use super::effects::AgentEffects;
use super::health::Health;
use super::hit::HitReactStatus;
use super::sensors::TargetSensor;
use super::states::{Death, HitKeys, HitReaction};
use crate::builder::{BuildError, StateMachineBuilder};
use crate::core::{State, DEFAULT_HISTORY_CAPACITY};
use crate::events::Subscriptions;
use crate::machine::{FiniteStateMachine, MachineHandle};
use crate::state_id;
use std::sync::Arc;
use tracing::warn;

state_id! {
    /// Top-level enemy states.
    pub enum EnemyState {
        Move,
        Attack,
        Hit,
        Death,
    }
    final: [Death]
}

state_id! {
    /// Steps of the enemy's Move state.
    pub enum MoveStep {
        Reposition,
        FollowPlayer,
        OnCounter,
    }
}

/// Collaborators an enemy brain drives.
#[derive(Clone)]
pub struct EnemyDeps {
    pub combatant: Arc<Combatant>,
    pub health: Arc<Health>,
    pub hit_status: Arc<HitReactStatus>,
    pub sensor: Arc<dyn TargetSensor>,
    pub effects: Arc<dyn AgentEffects>,
}

struct Reposition {
    effects: Arc<dyn AgentEffects>,
}

impl State for Reposition {
    fn on_update(&mut self) {
        self.effects.reposition();
    }
}

struct FollowPlayer {
    parent: MachineHandle<EnemyState>,
    deps: EnemyDeps,
}

impl State for FollowPlayer {
    fn on_update(&mut self) {
        self.deps.effects.jog_toward_target();

        let Some(distance) = self.deps.sensor.distance_to_target() else {
            return;
        };
        if distance < self.deps.combatant.counter_distance() {
            self.deps.combatant.set_can_counter(true);
            self.deps.effects.set_counter_icon(true);
        }
        if self.deps.combatant.can_attack_at(distance) {
            self.parent.request(EnemyState::Attack);
        }
    }
}

struct OnCounter {
    deps: EnemyDeps,
}

impl State for OnCounter {
    fn on_enter(&mut self) {
        self.deps.effects.freeze_attack_animation();
        self.deps.combatant.set_can_counter(false);
        self.deps.effects.set_counter_icon(false);
    }
}

struct Move {
    parent: MachineHandle<EnemyState>,
    steps: FiniteStateMachine<MoveStep>,
    deps: EnemyDeps,
    subscriptions: Subscriptions,
}

impl Move {
    fn new(parent: MachineHandle<EnemyState>, deps: EnemyDeps) -> Result<Self, BuildError> {
        let steps = StateMachineBuilder::new()
            .state(
                MoveStep::FollowPlayer,
                FollowPlayer {
                    parent: parent.clone(),
                    deps: deps.clone(),
                },
            )
            .state(
                MoveStep::Reposition,
                Reposition {
                    effects: Arc::clone(&deps.effects),
                },
            )
            .state(MoveStep::OnCounter, OnCounter { deps: deps.clone() })
            .initial(MoveStep::Reposition)
            .build()?;

        Ok(Self {
            parent,
            steps,
            deps,
            subscriptions: Subscriptions::new(),
        })
    }
}

impl State for Move {
    fn on_enter(&mut self) {
        self.steps.set_current_state(MoveStep::Reposition);

        let steps = self.steps.handle();
        self.subscriptions.watch(&self.deps.combatant, Combatant::on_counter, {
            let steps = steps.clone();
            move |_| steps.request(MoveStep::OnCounter)
        });
        self.subscriptions
            .watch(&self.deps.combatant, Combatant::start_attack_phase, move |_| {
                steps.request(MoveStep::FollowPlayer)
            });
        let parent = self.parent.clone();
        self.subscriptions
            .watch(&self.deps.hit_status, HitReactStatus::hit_start, move |_| {
                parent.request(EnemyState::Hit)
            });

        self.deps.effects.play_movement_animation();
    }

    fn on_update(&mut self) {
        self.steps.update();
    }

    fn on_exit(&mut self) {
        self.subscriptions.release();
        self.steps.discard_pending_requests();
    }
}

struct Attack {
    handle: MachineHandle<EnemyState>,
    deps: EnemyDeps,
    subscriptions: Subscriptions,
}

impl State for Attack {
    fn on_enter(&mut self) {
        let handle = self.handle.clone();
        self.subscriptions
            .watch(&self.deps.hit_status, HitReactStatus::hit_start, move |_| {
                handle.request(EnemyState::Hit)
            });
        let handle = self.handle.clone();
        self.subscriptions
            .watch(&self.deps.combatant, Combatant::attack_end, move |_| {
                handle.request(EnemyState::Move)
            });

        match self.deps.combatant.do_simple_random_attack() {
            Some(attack) => self.deps.effects.play_attack(&attack),
            None => {
                warn!("attack state entered while an attack is in progress");
                self.handle.request(EnemyState::Move);
            }
        }
    }

    fn on_exit(&mut self) {
        self.deps.combatant.reset_attack_flags();
        self.subscriptions.release();
    }
}

/// State machine driving one enemy.
///
/// # Example
///
/// ```rust
/// use combat_fsm::combat::{
///     Combatant, EnemyBrain, EnemyDeps, EnemyState, Health, HitReactStatus, NoEffects, TargetSensor,
/// };
/// use combat_fsm::combo::{Attack, Combo, ComboManager};
/// use combat_fsm::config::{CombatantConfig, HealthConfig};
/// use std::sync::Arc;
///
/// struct FarAway;
/// impl TargetSensor for FarAway {
///     fn distance_to_target(&self) -> Option<f32> {
///         Some(50.0)
///     }
/// }
///
/// let combos = ComboManager::new(1.0, vec![Combo::new("basic", vec![Attack::new("slash")])])?;
/// let mut brain = EnemyBrain::new(EnemyDeps {
///     combatant: Arc::new(Combatant::new(CombatantConfig::default(), combos)),
///     health: Arc::new(Health::new(HealthConfig::default())),
///     hit_status: Arc::new(HitReactStatus::new()),
///     sensor: Arc::new(FarAway),
///     effects: Arc::new(NoEffects),
/// })?;
///
/// brain.update();
/// assert_eq!(brain.current_state(), Some(EnemyState::Move));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct EnemyBrain {
    machine: FiniteStateMachine<EnemyState>,
}

impl EnemyBrain {
    /// Wire the enemy's states and enter Move.
    pub fn new(deps: EnemyDeps) -> Result<Self, BuildError> {
        Self::with_history_capacity(deps, DEFAULT_HISTORY_CAPACITY)
    }

    /// Like [`new`](Self::new), keeping at most `capacity` transitions in
    /// the machine's history.
    pub fn with_history_capacity(deps: EnemyDeps, capacity: usize) -> Result<Self, BuildError> {
        let builder = StateMachineBuilder::new().history_capacity(capacity);
        let handle = builder.handle();

        let machine = builder
            .state(EnemyState::Move, Move::new(handle.clone(), deps.clone())?)
            .state(
                EnemyState::Attack,
                Attack {
                    handle: handle.clone(),
                    deps: deps.clone(),
                    subscriptions: Subscriptions::new(),
                },
            )
            .state(
                EnemyState::Hit,
                HitReaction::new(
                    handle,
                    HitKeys {
                        hit: EnemyState::Hit,
                        recover: EnemyState::Move,
                        death: EnemyState::Death,
                    },
                    Arc::clone(&deps.combatant),
                    Arc::clone(&deps.health),
                    Arc::clone(&deps.hit_status),
                    Arc::clone(&deps.effects),
                ),
            )
            .state(EnemyState::Death, Death::new(deps.effects))
            .initial(EnemyState::Move)
            .build()?;

        Ok(Self { machine })
    }

    pub fn update(&mut self) {
        self.machine.update();
    }

    pub fn fixed_update(&mut self) {
        self.machine.fixed_update();
    }

    pub fn late_update(&mut self) {
        self.machine.late_update();
    }

    pub fn current_state(&self) -> Option<EnemyState> {
        self.machine.current_state()
    }

    pub fn machine(&self) -> &FiniteStateMachine<EnemyState> {
        &self.machine
    }

    pub fn machine_mut(&mut self) -> &mut FiniteStateMachine<EnemyState> {
        &mut self.machine
    }
}
