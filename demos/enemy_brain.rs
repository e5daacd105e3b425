//! Simulated encounter: two enemies close in on a player who counters and
//! chains combos.
//!
//! Run with `RUST_LOG=debug` to see every transition and combo step.

use combat_fsm::combat::{
    AgentEffects, AgentId, CombatContext, Combatant, EnemyBrain, EnemyDeps, Health, HitReactStatus,
    HitReceiver, InputSource, NoEffects, PlayerBrain, PlayerDeps, TargetSensor,
};
use combat_fsm::combo::Attack;
use combat_fsm::config::CombatConfig;
use parking_lot::Mutex;
use std::error::Error;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

const CONFIG: &str = r#"{
    "combo": {
        "cooldown": 0.8,
        "combos": [
            { "name": "opener", "attacks": [ { "name": "jab" }, { "name": "cross" }, { "name": "hook" } ] },
            { "name": "sweep", "attacks": [ { "name": "low kick" }, { "name": "roundhouse", "damage": 2.0 } ] }
        ]
    },
    "health": { "max_hits": 3 },
    "slots": { "max_slots": 1, "slot_assignment_interval": 0.5 },
    "history_capacity": 16
}"#;

const FRAME: f32 = 0.1;

/// Enemy closing in at a fixed speed once it starts jogging.
struct Approach {
    distance: Mutex<f32>,
}

impl TargetSensor for Approach {
    fn distance_to_target(&self) -> Option<f32> {
        Some(*self.distance.lock())
    }
}

impl AgentEffects for Approach {
    fn jog_toward_target(&self) {
        let mut distance = self.distance.lock();
        *distance = (*distance - 0.4).max(1.0);
    }

    fn play_attack(&self, attack: &Attack) {
        info!(attack = %attack.name, "enemy swings");
    }
}

/// Player that counters any open window and otherwise keeps attacking.
struct Reflexes {
    enemies: Vec<Arc<Combatant>>,
    attack: AtomicBool,
}

impl TargetSensor for Reflexes {
    fn distance_to_target(&self) -> Option<f32> {
        Some(1.5)
    }

    fn counterable_target(&self) -> Option<Arc<Combatant>> {
        self.enemies.iter().find(|enemy| enemy.can_counter()).cloned()
    }
}

impl InputSource for Reflexes {
    fn attack_pressed(&self) -> bool {
        self.attack.load(Ordering::Relaxed)
    }

    fn counter_pressed(&self) -> bool {
        true
    }
}

struct EnemyAgent {
    id: AgentId,
    brain: EnemyBrain,
    combatant: Arc<Combatant>,
    receiver: HitReceiver,
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = CombatConfig::from_json_str(CONFIG)?;
    let context = Arc::new(CombatContext::new(config.slots.clone()));

    let mut enemies = Vec::new();
    for (id, start) in [(1, 8.0), (2, 12.0)] {
        let id = AgentId(id);
        let combatant = Arc::new(Combatant::new(config.combatant.clone(), config.combo_manager()?));
        let health = Arc::new(Health::new(config.health.clone()));
        let hit_status = Arc::new(HitReactStatus::new());
        let approach = Arc::new(Approach {
            distance: Mutex::new(start),
        });

        let brain = EnemyBrain::with_history_capacity(
            EnemyDeps {
                combatant: Arc::clone(&combatant),
                health: Arc::clone(&health),
                hit_status: Arc::clone(&hit_status),
                sensor: approach.clone(),
                effects: approach,
            },
            config.history_capacity,
        )?;
        brain.machine().events().on_state_transition(move |from, to| {
            info!(agent = %id, ?from, ?to, "enemy state");
        });

        context.add_enemy(id, Arc::clone(&combatant), Arc::clone(&health));
        enemies.push(EnemyAgent {
            id,
            brain,
            combatant,
            receiver: HitReceiver::new(health, hit_status),
        });
    }

    let reflexes = Arc::new(Reflexes {
        enemies: enemies.iter().map(|enemy| Arc::clone(&enemy.combatant)).collect(),
        attack: AtomicBool::new(false),
    });
    let player_combatant = Arc::new(Combatant::new(config.combatant.clone(), config.combo_manager()?));
    let mut player = PlayerBrain::with_history_capacity(
        PlayerDeps {
            combatant: Arc::clone(&player_combatant),
            health: Arc::new(Health::new(config.health.clone())),
            hit_status: Arc::new(HitReactStatus::new()),
            input: reflexes.clone(),
            sensor: reflexes.clone(),
            effects: Arc::new(NoEffects),
            context: Arc::clone(&context),
        },
        config.history_capacity,
    )?;
    player.machine().events().on_state_transition(|from, to| {
        info!(?from, ?to, "player state");
    });

    for frame in 0..120 {
        context.tick(FRAME, |_, health| {
            context.candidate_weight(0.0, 2.0, health.current_hits())
        });

        player.update();
        for enemy in &mut enemies {
            enemy.brain.update();
        }

        // Player attacks land on the first enemy still standing.
        if player_combatant.is_attacking() && frame % 3 == 0 {
            if let Some(target) = enemies.iter().find(|enemy| enemy.receiver.can_be_hit()) {
                info!(agent = %target.id, "player lands a hit");
                target.receiver.hit();
                player_combatant.land_hit();
            }
        }
        if player_combatant.is_attacking() && frame % 3 == 2 {
            player_combatant.end_attack();
        }
        reflexes.attack.store(frame % 4 == 0, Ordering::Relaxed);

        for enemy in &enemies {
            if enemy.combatant.is_attacking() && frame % 5 == 4 {
                enemy.combatant.end_attack();
            }
            if enemy.receiver.status().is_hitting() && frame % 2 == 1 {
                enemy.receiver.status().finish_hit();
            }
        }
    }

    info!(remaining = context.enemy_count(), "encounter over");
    Ok(())
}
