//! Player brain: input-driven attacks, counters and hit reactions.

use super::combatant::Combatant;
use super::context::CombatContext;
use super::effects::AgentEffects;
use super::health::Health;
use super::hit::HitReactStatus;
use super::sensors::{InputSource, TargetSensor};
use super::states::{Death, HitKeys, HitReaction};
use crate::builder::{BuildError, StateMachineBuilder};
use crate::core::{State, DEFAULT_HISTORY_CAPACITY};
use crate::events::Subscriptions;
use crate::machine::{FiniteStateMachine, MachineHandle};
use crate::state_id;
use std::sync::Arc;
use tracing::warn;

state_id! {
    /// Player states.
    pub enum PlayerState {
        Move,
        Attack,
        Counter,
        Hit,
        Death,
    }
    final: [Death]
}

/// Collaborators a player brain drives.
#[derive(Clone)]
pub struct PlayerDeps {
    pub combatant: Arc<Combatant>,
    pub health: Arc<Health>,
    pub hit_status: Arc<HitReactStatus>,
    pub input: Arc<dyn InputSource>,
    pub sensor: Arc<dyn TargetSensor>,
    pub effects: Arc<dyn AgentEffects>,
    pub context: Arc<CombatContext>,
}

impl PlayerDeps {
    fn counterable_target(&self) -> Option<Arc<Combatant>> {
        self.sensor
            .counterable_target()
            .filter(|target| target.can_counter())
    }

    /// Shared input handling: counter first, then attack.
    fn poll_input(&self, handle: &MachineHandle<PlayerState>, allow_counter: bool) {
        if allow_counter
            && self.input.counter_pressed()
            && self.combatant.can_attack()
            && self.counterable_target().is_some()
        {
            handle.request(PlayerState::Counter);
        } else if self.input.attack_pressed() && self.combatant.can_attack() {
            handle.request(PlayerState::Attack);
        }
    }

    fn start_combo_attack(&self, handle: &MachineHandle<PlayerState>) {
        match self.combatant.do_combo_attack(self.context.now()) {
            Some(attack) => self.effects.play_attack(&attack),
            None => {
                warn!("attack requested while the previous one is still running");
                handle.request(PlayerState::Move);
            }
        }
    }

    fn watch_hits(&self, subscriptions: &mut Subscriptions, handle: &MachineHandle<PlayerState>) {
        let handle = handle.clone();
        subscriptions.watch(&self.hit_status, HitReactStatus::hit_start, move |_| {
            handle.request(PlayerState::Hit)
        });
    }

    fn watch_attack_end(
        &self,
        subscriptions: &mut Subscriptions,
        handle: &MachineHandle<PlayerState>,
    ) {
        let handle = handle.clone();
        subscriptions.watch(&self.combatant, Combatant::attack_end, move |_| {
            handle.request(PlayerState::Move)
        });
    }
}

struct Move {
    handle: MachineHandle<PlayerState>,
    deps: PlayerDeps,
    subscriptions: Subscriptions,
}

impl State for Move {
    fn on_enter(&mut self) {
        self.deps.watch_hits(&mut self.subscriptions, &self.handle);
    }

    fn on_update(&mut self) {
        self.deps.effects.move_with_input();
        self.deps.poll_input(&self.handle, true);
    }

    fn on_exit(&mut self) {
        self.subscriptions.release();
    }
}

struct Attack {
    handle: MachineHandle<PlayerState>,
    deps: PlayerDeps,
    subscriptions: Subscriptions,
}

impl State for Attack {
    fn on_enter(&mut self) {
        self.deps.watch_hits(&mut self.subscriptions, &self.handle);
        self.deps.watch_attack_end(&mut self.subscriptions, &self.handle);

        self.deps.effects.leap_toward_target();
        self.deps.start_combo_attack(&self.handle);
    }

    fn on_update(&mut self) {
        self.deps.poll_input(&self.handle, true);
    }

    fn on_exit(&mut self) {
        self.subscriptions.release();
    }
}

struct Counter {
    handle: MachineHandle<PlayerState>,
    deps: PlayerDeps,
    subscriptions: Subscriptions,
}

impl State for Counter {
    fn on_enter(&mut self) {
        self.deps.watch_hits(&mut self.subscriptions, &self.handle);
        self.deps.watch_attack_end(&mut self.subscriptions, &self.handle);

        let Some(target) = self.deps.counterable_target() else {
            warn!("counter target vanished before the counter started");
            self.handle.request(PlayerState::Move);
            return;
        };
        target.counter();
        self.deps.effects.leap_toward_target();
        self.deps.start_combo_attack(&self.handle);
    }

    fn on_update(&mut self) {
        self.deps.poll_input(&self.handle, false);
    }

    fn on_exit(&mut self) {
        self.subscriptions.release();
    }
}

/// State machine driving the player character.
///
/// Input is polled every tick. From Move or Attack, a counter press with a
/// counterable opponent nearby wins over an attack press; an attack press
/// during Attack re-enters it for the next step of the combo once the
/// combatant's attack window reopens.
pub struct PlayerBrain {
    machine: FiniteStateMachine<PlayerState>,
}

impl PlayerBrain {
    /// Wire the player's states and enter Move.
    pub fn new(deps: PlayerDeps) -> Result<Self, BuildError> {
        Self::with_history_capacity(deps, DEFAULT_HISTORY_CAPACITY)
    }

    /// Like [`new`](Self::new), keeping at most `capacity` transitions in
    /// the machine's history.
    pub fn with_history_capacity(deps: PlayerDeps, capacity: usize) -> Result<Self, BuildError> {
        let builder = StateMachineBuilder::new().history_capacity(capacity);
        let handle = builder.handle();

        let machine = builder
            .state(
                PlayerState::Move,
                Move {
                    handle: handle.clone(),
                    deps: deps.clone(),
                    subscriptions: Subscriptions::new(),
                },
            )
            .state(
                PlayerState::Attack,
                Attack {
                    handle: handle.clone(),
                    deps: deps.clone(),
                    subscriptions: Subscriptions::new(),
                },
            )
            .state(
                PlayerState::Counter,
                Counter {
                    handle: handle.clone(),
                    deps: deps.clone(),
                    subscriptions: Subscriptions::new(),
                },
            )
            .state(
                PlayerState::Hit,
                HitReaction::new(
                    handle,
                    HitKeys {
                        hit: PlayerState::Hit,
                        recover: PlayerState::Move,
                        death: PlayerState::Death,
                    },
                    Arc::clone(&deps.combatant),
                    Arc::clone(&deps.health),
                    Arc::clone(&deps.hit_status),
                    Arc::clone(&deps.effects),
                ),
            )
            .state(PlayerState::Death, Death::new(deps.effects))
            .initial(PlayerState::Move)
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

    pub fn current_state(&self) -> Option<PlayerState> {
        self.machine.current_state()
    }

    pub fn machine(&self) -> &FiniteStateMachine<PlayerState> {
        &self.machine
    }

    pub fn machine_mut(&mut self) -> &mut FiniteStateMachine<PlayerState> {
        &mut self.machine
    }
}
