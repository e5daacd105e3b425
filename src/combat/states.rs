//! States shared by every combat brain.

use super::combatant::Combatant;
use super::effects::AgentEffects;
use super::health::Health;
use super::hit::HitReactStatus;
use crate::core::{State, StateId};
use crate::events::Subscriptions;
use crate::machine::MachineHandle;
use std::sync::Arc;
use tracing::info;

/// Seconds a dead agent stays in the scene.
pub const DESPAWN_DELAY: f32 = 3.0;

/// Plays out a hit reaction.
///
/// Entering interrupts any attack. A new hit while reacting re-enters the
/// state. Each tick, death takes priority; otherwise the agent recovers once
/// the reaction has finished.
pub struct HitReaction<K: StateId> {
    handle: MachineHandle<K>,
    keys: HitKeys<K>,
    combatant: Arc<Combatant>,
    health: Arc<Health>,
    status: Arc<HitReactStatus>,
    effects: Arc<dyn AgentEffects>,
    subscriptions: Subscriptions,
}

/// Where a [`HitReaction`] leads.
#[derive(Clone, Copy, Debug)]
pub struct HitKeys<K> {
    /// The hit state itself, re-entered on a new hit.
    pub hit: K,
    pub recover: K,
    pub death: K,
}

impl<K: StateId> HitReaction<K> {
    pub fn new(
        handle: MachineHandle<K>,
        keys: HitKeys<K>,
        combatant: Arc<Combatant>,
        health: Arc<Health>,
        status: Arc<HitReactStatus>,
        effects: Arc<dyn AgentEffects>,
    ) -> Self {
        Self {
            handle,
            keys,
            combatant,
            health,
            status,
            effects,
            subscriptions: Subscriptions::new(),
        }
    }
}

impl<K: StateId> State for HitReaction<K> {
    fn on_enter(&mut self) {
        self.combatant.interrupt_attack();
        self.combatant.set_in_hit_state(true);
        self.effects.set_counter_icon(false);

        let handle = self.handle.clone();
        let hit = self.keys.hit;
        self.subscriptions
            .watch(&self.status, HitReactStatus::hit_start, move |_| handle.request(hit));
    }

    fn on_update(&mut self) {
        if self.health.is_dead() {
            self.handle.request(self.keys.death);
        } else if !self.status.is_hitting() {
            self.handle.request(self.keys.recover);
        }
    }

    fn on_exit(&mut self) {
        self.subscriptions.release();
        self.combatant.set_in_hit_state(false);
    }
}

/// Terminal state: plays death effects and schedules the despawn.
pub struct Death {
    effects: Arc<dyn AgentEffects>,
}

impl Death {
    pub fn new(effects: Arc<dyn AgentEffects>) -> Self {
        Self { effects }
    }
}

impl State for Death {
    fn on_enter(&mut self) {
        info!("agent died");
        self.effects.play_death_animation();
        self.effects.play_death_sound();
        self.effects.despawn_after(DESPAWN_DELAY);
    }
}
