//! Shared combat state for one encounter.

use super::combatant::Combatant;
use super::health::Health;
use super::slots::{AgentId, AttackSlotManager, SlotCandidate};
use crate::config::SlotConfig;
use crate::events::SubscriptionId;
use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use tracing::info;

#[derive(Debug)]
struct Enemy {
    id: AgentId,
    combatant: Arc<Combatant>,
    health: Arc<Health>,
    death_subscription: SubscriptionId,
}

/// Game clock, enemy roster and attack slot allocator for one encounter.
///
/// Created once by the owner and handed to every agent as
/// `Arc<CombatContext>`. Enemies leave the roster automatically when their
/// health reports death.
#[derive(Debug)]
pub struct CombatContext {
    clock: Mutex<f32>,
    slots: Mutex<AttackSlotManager>,
    enemies: Mutex<Vec<Enemy>>,
}

impl CombatContext {
    pub fn new(slots: SlotConfig) -> Self {
        Self {
            clock: Mutex::new(0.0),
            slots: Mutex::new(AttackSlotManager::new(slots)),
            enemies: Mutex::new(Vec::new()),
        }
    }

    /// Seconds of game time elapsed since the encounter started.
    pub fn now(&self) -> f32 {
        *self.clock.lock()
    }

    /// Add an enemy to the roster. Re-adding an id replaces the old entry.
    pub fn add_enemy(self: &Arc<Self>, id: AgentId, combatant: Arc<Combatant>, health: Arc<Health>) {
        self.remove_enemy(id);

        let context: Weak<Self> = Arc::downgrade(self);
        let death_subscription = health.death().subscribe(move |_| {
            if let Some(context) = context.upgrade() {
                context.remove_enemy(id);
            }
        });

        self.enemies.lock().push(Enemy {
            id,
            combatant,
            health,
            death_subscription,
        });
        info!(agent = %id, "enemy joined the encounter");
    }

    /// Drop an enemy from the roster. Returns whether it was present.
    pub fn remove_enemy(&self, id: AgentId) -> bool {
        let removed = {
            let mut enemies = self.enemies.lock();
            let position = enemies.iter().position(|enemy| enemy.id == id);
            position.map(|position| enemies.remove(position))
        };

        match removed {
            Some(enemy) => {
                enemy.health.death().unsubscribe(enemy.death_subscription);
                self.slots.lock().remove_agent(id);
                info!(agent = %id, "enemy left the encounter");
                true
            }
            None => false,
        }
    }

    pub fn enemies(&self) -> Vec<AgentId> {
        self.enemies.lock().iter().map(|enemy| enemy.id).collect()
    }

    pub fn enemy_count(&self) -> usize {
        self.enemies.lock().len()
    }

    /// Advance the clock by `dt` and run the slot allocator over the roster.
    ///
    /// `weigh` scores each enemy; see [`candidate_weight`](Self::candidate_weight).
    /// Returns the enemies granted a slot.
    pub fn tick<F>(&self, dt: f32, weigh: F) -> Vec<AgentId>
    where
        F: Fn(AgentId, &Health) -> f32,
    {
        *self.clock.lock() += dt;

        let roster: Vec<(AgentId, Arc<Combatant>, Arc<Health>)> = self
            .enemies
            .lock()
            .iter()
            .map(|enemy| (enemy.id, Arc::clone(&enemy.combatant), Arc::clone(&enemy.health)))
            .collect();

        // `weigh` runs unlocked so it may query or change the roster.
        let candidates: Vec<SlotCandidate> = roster
            .into_iter()
            .map(|(id, combatant, health)| SlotCandidate {
                id,
                combatant,
                weight: weigh(id, &health),
            })
            .collect();

        self.slots.lock().tick(dt, &candidates)
    }

    /// Slot priority from the enemy's position relative to the player.
    pub fn candidate_weight(&self, alignment_dot: f32, distance: f32, current_hits: u32) -> f32 {
        self.slots
            .lock()
            .candidate_weight(alignment_dot, distance, current_hits)
    }

    pub fn available_slots(&self) -> u32 {
        self.slots.lock().available_slots()
    }
}

impl Default for CombatContext {
    fn default() -> Self {
        Self::new(SlotConfig::default())
    }
}
