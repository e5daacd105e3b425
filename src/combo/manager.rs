//! Sequential and random attack selection over a combo table.

use super::data::{Attack, Combo, ComboConfig};
use super::error::ComboError;
use super::validation::validate;
use rand::Rng;
use stillwater::validation::Validation;
use tracing::debug;

/// Cursor over a validated combo table.
///
/// Attacks landing within `cooldown` seconds of each other walk through the
/// current combo in order, wrapping at its end. When the window lapses the
/// cursor moves to the start of the next combo. Timestamps are supplied by
/// the caller from its game clock.
///
/// # Example
///
/// ```
/// use combat_fsm::combo::{Attack, Combo, ComboManager};
///
/// let mut combos = ComboManager::new(
///     2.0,
///     vec![
///         Combo::new("a", vec![Attack::new("atk1"), Attack::new("atk2")]),
///         Combo::new("b", vec![Attack::new("atk3"), Attack::new("atk2"), Attack::new("atk4")]),
///     ],
/// )?;
///
/// assert_eq!(combos.get_attack_and_update_index(0.0).name, "atk1");
/// assert_eq!(combos.get_attack_and_update_index(0.5).name, "atk2");
/// // 2.5s since the last attack: the window lapsed, so combo "b" starts.
/// assert_eq!(combos.get_attack_and_update_index(3.0).name, "atk3");
/// # Ok::<(), combat_fsm::combo::ComboError>(())
/// ```
#[derive(Clone, Debug)]
pub struct ComboManager {
    combos: Vec<Combo>,
    cooldown: f32,
    combo_index: usize,
    attack_index: usize,
    last_attack_time: f32,
}

impl ComboManager {
    pub fn new(cooldown: f32, combos: Vec<Combo>) -> Result<Self, ComboError> {
        Self::from_config(ComboConfig { cooldown, combos })
    }

    /// Validate `config` and start at the first attack of the first combo.
    ///
    /// Every problem in the table is reported in one
    /// [`ComboError::InvalidConfig`].
    pub fn from_config(config: ComboConfig) -> Result<Self, ComboError> {
        match validate(&config) {
            Validation::Success(_) => Ok(Self {
                combos: config.combos,
                cooldown: config.cooldown,
                combo_index: 0,
                attack_index: 0,
                last_attack_time: 0.0,
            }),
            Validation::Failure(errors) => Err(ComboError::InvalidConfig {
                violations: errors.iter().cloned().collect(),
            }),
        }
    }

    /// Whether an attack at `now` continues the current combo.
    ///
    /// Always records `now` as the last attack time, even when returning
    /// `false`, so call it once per attack.
    pub fn can_continue_combo(&mut self, now: f32) -> bool {
        let can_continue = now - self.last_attack_time < self.cooldown;
        self.last_attack_time = now;
        can_continue
    }

    /// Next attack in sequence, advancing the cursor.
    ///
    /// If the combo window lapsed, the cursor first moves to the start of the
    /// next combo (wrapping). The attack index then advances, wrapping within
    /// the current combo.
    ///
    /// Only a lapsed window changes the combo: finishing a combo inside the
    /// window starts the same combo again.
    pub fn get_attack_and_update_index(&mut self, now: f32) -> &Attack {
        if !self.can_continue_combo(now) {
            self.update_combo_index();
        }

        let attack_index = self.attack_index;
        let len = self.combos[self.combo_index].len();
        self.attack_index = (attack_index + 1) % len;

        let attack = &self.combos[self.combo_index].attacks[attack_index];
        debug!(
            combo = self.combo_index,
            attack = attack_index,
            name = %attack.name,
            "combo step"
        );
        attack
    }

    /// Whether the cursor points at the final attack of the current combo.
    pub fn is_current_attack_last_in_combo(&self) -> bool {
        self.attack_index + 1 == self.current_combo().len()
    }

    /// Move to the next combo (wrapping) and rewind to its first attack.
    /// Returns the new combo index.
    pub fn update_combo_index(&mut self) -> usize {
        self.combo_index = (self.combo_index + 1) % self.combos.len();
        self.attack_index = 0;
        self.combo_index
    }

    /// Uniformly random combo; the cursor is untouched.
    pub fn get_random_combo(&self) -> &Combo {
        self.get_random_combo_with(&mut rand::thread_rng())
    }

    pub fn get_random_combo_with<R: Rng + ?Sized>(&self, rng: &mut R) -> &Combo {
        &self.combos[rng.gen_range(0..self.combos.len())]
    }

    /// Uniformly random attack of a uniformly random combo; the cursor is
    /// untouched.
    pub fn get_random_attack(&self) -> &Attack {
        self.get_random_attack_with(&mut rand::thread_rng())
    }

    pub fn get_random_attack_with<R: Rng + ?Sized>(&self, rng: &mut R) -> &Attack {
        let combo = self.get_random_combo_with(rng);
        &combo.attacks[rng.gen_range(0..combo.len())]
    }

    pub fn current_combo(&self) -> &Combo {
        &self.combos[self.combo_index]
    }

    pub fn combo_index(&self) -> usize {
        self.combo_index
    }

    pub fn attack_index(&self) -> usize {
        self.attack_index
    }

    pub fn last_attack_time(&self) -> f32 {
        self.last_attack_time
    }

    pub fn cooldown(&self) -> f32 {
        self.cooldown
    }

    pub fn combos(&self) -> &[Combo] {
        &self.combos
    }
}
