//! Attack bookkeeping for one agent.

use crate::combo::{Attack, ComboManager};
use crate::config::CombatantConfig;
use crate::events::EventSource;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

/// Per-agent combat collaborator.
///
/// Owns the agent's combo cursor and the flags other systems read: whether
/// it may start an attack, whether it is mid-attack, whether it can be
/// countered and whether it is reacting to a hit. The game reports animation
/// milestones back through [`land_hit`](Self::land_hit) and
/// [`end_attack`](Self::end_attack).
#[derive(Debug)]
pub struct Combatant {
    config: CombatantConfig,
    combos: Mutex<ComboManager>,
    current_attack: Mutex<Option<Attack>>,
    closes_combo: AtomicBool,
    can_attack: AtomicBool,
    attacking: AtomicBool,
    can_counter: AtomicBool,
    in_hit_state: AtomicBool,
    attack_start: EventSource<()>,
    attack_end: EventSource<()>,
    start_attack_phase: EventSource<()>,
    counter: EventSource<()>,
}

impl Combatant {
    pub fn new(config: CombatantConfig, combos: ComboManager) -> Self {
        Self {
            config,
            combos: Mutex::new(combos),
            current_attack: Mutex::new(None),
            closes_combo: AtomicBool::new(false),
            can_attack: AtomicBool::new(true),
            attacking: AtomicBool::new(false),
            can_counter: AtomicBool::new(false),
            in_hit_state: AtomicBool::new(false),
            attack_start: EventSource::new(),
            attack_end: EventSource::new(),
            start_attack_phase: EventSource::new(),
            counter: EventSource::new(),
        }
    }

    /// Whether an attack may start against a target `distance` away.
    pub fn can_attack_at(&self, distance: f32) -> bool {
        self.can_attack() && distance < self.config.attack_distance
    }

    /// Start a random attack outside any combo.
    ///
    /// Returns `None` if an attack is already in progress.
    pub fn do_simple_random_attack(&self) -> Option<Attack> {
        if !self.can_attack() {
            return None;
        }
        let attack = self.combos.lock().get_random_attack().clone();
        self.closes_combo.store(true, Ordering::SeqCst);
        Some(self.begin_attack(attack))
    }

    /// Start the next attack of the combo sequence at game time `now`.
    ///
    /// Returns `None` if an attack is already in progress.
    pub fn do_combo_attack(&self, now: f32) -> Option<Attack> {
        if !self.can_attack() {
            return None;
        }
        let (attack, closes_combo) = {
            let mut combos = self.combos.lock();
            let attack = combos.get_attack_and_update_index(now).clone();
            (attack, combos.attack_index() == 0)
        };
        self.closes_combo.store(closes_combo, Ordering::SeqCst);
        Some(self.begin_attack(attack))
    }

    fn begin_attack(&self, attack: Attack) -> Attack {
        self.can_attack.store(false, Ordering::SeqCst);
        self.attacking.store(true, Ordering::SeqCst);
        *self.current_attack.lock() = Some(attack.clone());
        debug!(attack = %attack.name, "attack started");
        self.attack_start.notify();
        attack
    }

    /// Hit frame of the current attack.
    ///
    /// Reopens the attack window for the next combo step unless the current
    /// attack closes its combo. Returns whether the window was reopened.
    pub fn land_hit(&self) -> bool {
        if !self.is_attacking() || self.closes_combo.load(Ordering::SeqCst) {
            return false;
        }
        self.can_attack.store(true, Ordering::SeqCst);
        true
    }

    /// End of the attack animation.
    pub fn end_attack(&self) {
        self.can_attack.store(true, Ordering::SeqCst);
        self.attacking.store(false, Ordering::SeqCst);
        *self.current_attack.lock() = None;
        self.attack_end.notify();
    }

    /// Abort the current attack without signalling its end.
    pub fn interrupt_attack(&self) {
        self.can_counter.store(false, Ordering::SeqCst);
        self.reset_attack_flags();
    }

    /// Clear attack flags when leaving an attacking state.
    pub fn reset_attack_flags(&self) {
        self.can_attack.store(true, Ordering::SeqCst);
        self.can_counter.store(false, Ordering::SeqCst);
        self.attacking.store(false, Ordering::SeqCst);
        *self.current_attack.lock() = None;
    }

    /// Granted an attack slot: begin closing in on the target.
    pub fn start_attacking(&self) {
        self.start_attack_phase.notify();
    }

    /// Countered by the opponent.
    pub fn counter(&self) {
        debug!("countered");
        self.counter.notify();
    }

    pub fn can_attack(&self) -> bool {
        self.can_attack.load(Ordering::SeqCst)
    }

    pub fn is_attacking(&self) -> bool {
        self.attacking.load(Ordering::SeqCst)
    }

    pub fn can_counter(&self) -> bool {
        self.can_counter.load(Ordering::SeqCst)
    }

    pub fn set_can_counter(&self, value: bool) {
        self.can_counter.store(value, Ordering::SeqCst);
    }

    pub fn in_hit_state(&self) -> bool {
        self.in_hit_state.load(Ordering::SeqCst)
    }

    pub fn set_in_hit_state(&self, value: bool) {
        self.in_hit_state.store(value, Ordering::SeqCst);
    }

    pub fn current_attack(&self) -> Option<Attack> {
        self.current_attack.lock().clone()
    }

    pub fn attack_distance(&self) -> f32 {
        self.config.attack_distance
    }

    pub fn counter_distance(&self) -> f32 {
        self.config.counter_distance
    }

    /// Snapshot of the combo cursor.
    pub fn combos(&self) -> ComboManager {
        self.combos.lock().clone()
    }

    pub fn attack_start(&self) -> &EventSource<()> {
        &self.attack_start
    }

    pub fn attack_end(&self) -> &EventSource<()> {
        &self.attack_end
    }

    pub fn start_attack_phase(&self) -> &EventSource<()> {
        &self.start_attack_phase
    }

    pub fn on_counter(&self) -> &EventSource<()> {
        &self.counter
    }
}
