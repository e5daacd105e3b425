//! Limits how many agents attack the same target at once.

use super::combatant::Combatant;
use crate::config::SlotConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// Stable identifier of an agent taking part in combat.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(pub u64);

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "agent-{}", self.0)
    }
}

/// An agent competing for an attack slot, with its current priority.
#[derive(Clone, Debug)]
pub struct SlotCandidate {
    pub id: AgentId,
    pub combatant: Arc<Combatant>,
    pub weight: f32,
}

/// Slot-limited allocator of attack permission.
///
/// A fixed pool of slots regenerates over time. At every assignment interval
/// the highest-weighted eligible candidate is granted a slot: its
/// [`Combatant::start_attacking`] is called and it goes on cooldown.
#[derive(Debug)]
pub struct AttackSlotManager {
    config: SlotConfig,
    available: u32,
    recovery_timer: f32,
    assignment_timer: f32,
    cooldowns: HashMap<AgentId, f32>,
}

impl AttackSlotManager {
    pub fn new(config: SlotConfig) -> Self {
        Self {
            available: config.max_slots,
            config,
            recovery_timer: 0.0,
            assignment_timer: 0.0,
            cooldowns: HashMap::new(),
        }
    }

    /// Advance by `dt` seconds and run due assignments.
    /// Returns the agents granted a slot during this tick.
    pub fn tick(&mut self, dt: f32, candidates: &[SlotCandidate]) -> Vec<AgentId> {
        self.update_cooldowns(dt);
        self.regenerate(dt);

        let mut assigned = Vec::new();
        let interval = self.config.slot_assignment_interval;
        if interval <= 0.0 {
            assigned.extend(self.attempt_assignment(candidates));
            return assigned;
        }

        self.assignment_timer += dt;
        while self.assignment_timer >= interval {
            self.assignment_timer -= interval;
            assigned.extend(self.attempt_assignment(candidates));
        }
        assigned
    }

    fn update_cooldowns(&mut self, dt: f32) {
        self.cooldowns.retain(|id, remaining| {
            *remaining -= dt;
            if *remaining <= 0.0 {
                debug!(agent = %id, "attack cooldown over");
                false
            } else {
                true
            }
        });
    }

    fn regenerate(&mut self, dt: f32) {
        if self.available >= self.config.max_slots {
            return;
        }
        self.recovery_timer += dt;
        if self.recovery_timer >= self.config.slot_recovery_time {
            self.available += 1;
            self.recovery_timer = 0.0;
            debug!(available = self.available, max = self.config.max_slots, "slot regenerated");
        }
    }

    fn attempt_assignment(&mut self, candidates: &[SlotCandidate]) -> Option<AgentId> {
        if self.available == 0 {
            debug!("no attack slots available");
            return None;
        }

        let mut best: Option<&SlotCandidate> = None;
        for candidate in candidates {
            if candidate.combatant.is_attacking()
                || candidate.combatant.in_hit_state()
                || self.is_in_cooldown(candidate.id)
            {
                continue;
            }
            if best.map_or(true, |best| candidate.weight > best.weight) {
                best = Some(candidate);
            }
        }

        let best = best?;
        if best.weight < self.config.required_minimum_weight {
            debug!(
                agent = %best.id,
                weight = best.weight,
                required = self.config.required_minimum_weight,
                "best candidate below minimum weight"
            );
            return None;
        }

        best.combatant.start_attacking();
        self.cooldowns.insert(best.id, self.config.attack_cooldown_time);
        self.available -= 1;
        info!(
            agent = %best.id,
            weight = best.weight,
            available = self.available,
            max = self.config.max_slots,
            "attack slot assigned"
        );
        Some(best.id)
    }

    /// Priority of an agent from its position relative to the target.
    ///
    /// `alignment_dot` is the dot product of the target's facing with the
    /// direction toward the agent; agents behind or beside the target score
    /// higher. Closer agents and agents with more hits left score higher.
    pub fn candidate_weight(&self, alignment_dot: f32, distance: f32, current_hits: u32) -> f32 {
        let weights = &self.config.weights;
        let alignment = (1.0 - alignment_dot) * weights.alignment;
        let range = (1.0 - (distance / weights.max_range).clamp(0.0, 1.0)) * weights.range;
        let health = (current_hits as f32 / weights.health_reference).clamp(0.0, 1.0) * weights.health;
        alignment + range + health
    }

    pub fn is_in_cooldown(&self, id: AgentId) -> bool {
        self.cooldowns.get(&id).is_some_and(|remaining| *remaining > 0.0)
    }

    /// Forget an agent, e.g. once it died.
    pub fn remove_agent(&mut self, id: AgentId) {
        self.cooldowns.remove(&id);
    }

    pub fn available_slots(&self) -> u32 {
        self.available
    }

    pub fn max_slots(&self) -> u32 {
        self.config.max_slots
    }

    pub fn config(&self) -> &SlotConfig {
        &self.config
    }
}
