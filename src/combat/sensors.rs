//! Inputs the combat states poll from the scene and the player.

use super::combatant::Combatant;
use std::sync::Arc;

/// Scene queries about the agent's current target.
pub trait TargetSensor: Send + Sync {
    /// Distance to the target, if there is one.
    fn distance_to_target(&self) -> Option<f32>;

    /// Nearby opponent that can currently be countered.
    fn counterable_target(&self) -> Option<Arc<Combatant>> {
        None
    }
}

/// Player buttons, polled once per tick.
pub trait InputSource: Send + Sync {
    fn attack_pressed(&self) -> bool;

    fn counter_pressed(&self) -> bool;
}
