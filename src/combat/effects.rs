//! Side effects states trigger on the game side.

use crate::combo::Attack;

/// Presentation and movement hooks driven by combat states.
///
/// Every method defaults to a no-op, so an implementation only overrides the
/// effects it renders.
pub trait AgentEffects: Send + Sync {
    fn play_movement_animation(&self) {}

    /// Per-tick steering toward the agent's waiting position.
    fn reposition(&self) {}

    /// Per-tick steering toward the current target.
    fn jog_toward_target(&self) {}

    /// Per-tick movement from player input.
    fn move_with_input(&self) {}

    fn leap_toward_target(&self) {}

    fn set_counter_icon(&self, _visible: bool) {}

    /// Stop the attack animation in place after being countered.
    fn freeze_attack_animation(&self) {}

    fn play_attack(&self, _attack: &Attack) {}

    fn play_death_animation(&self) {}

    fn play_death_sound(&self) {}

    /// Remove the agent from the scene after `seconds`.
    fn despawn_after(&self, _seconds: f32) {}
}

/// Effects sink that renders nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoEffects;

impl AgentEffects for NoEffects {}
