//! Designer data for attack sequencing.

use serde::{Deserialize, Serialize};

fn default_damage() -> f32 {
    1.0
}

fn default_cooldown() -> f32 {
    1.0
}

/// A single attack a combatant can perform.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Attack {
    pub name: String,
    /// Animation clip played for the attack. Empty means "use `name`".
    #[serde(default)]
    pub animation: String,
    #[serde(default = "default_damage")]
    pub damage: f32,
}

impl Attack {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            animation: String::new(),
            damage: default_damage(),
        }
    }

    pub fn with_animation(mut self, animation: impl Into<String>) -> Self {
        self.animation = animation.into();
        self
    }

    pub fn with_damage(mut self, damage: f32) -> Self {
        self.damage = damage;
        self
    }

    /// Animation clip to play, falling back to the attack name.
    pub fn animation(&self) -> &str {
        if self.animation.is_empty() {
            &self.name
        } else {
            &self.animation
        }
    }
}

/// Ordered sequence of attacks performed back to back.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Combo {
    #[serde(default)]
    pub name: String,
    pub attacks: Vec<Attack>,
}

impl Combo {
    pub fn new(name: impl Into<String>, attacks: Vec<Attack>) -> Self {
        Self {
            name: name.into(),
            attacks,
        }
    }

    pub fn len(&self) -> usize {
        self.attacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attacks.is_empty()
    }
}

/// Combo table plus the window, in seconds, within which a new attack
/// continues the current combo.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComboConfig {
    #[serde(default = "default_cooldown")]
    pub cooldown: f32,
    pub combos: Vec<Combo>,
}
