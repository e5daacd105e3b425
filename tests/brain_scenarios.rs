//! End-to-end scenarios driving enemy and player brains through their
//! collaborators, the way a game loop would.

use combat_fsm::combat::{
    AgentEffects, AgentId, CombatContext, Combatant, EnemyBrain, EnemyDeps, EnemyState, Health,
    HitReactStatus, HitReceiver, InputSource, PlayerBrain, PlayerDeps, PlayerState, TargetSensor,
};
use combat_fsm::combo::{Attack, Combo, ComboManager};
use combat_fsm::config::{CombatConfig, CombatantConfig, HealthConfig, SlotConfig};
use combat_fsm::core::DEFAULT_HISTORY_CAPACITY;
use combat_fsm::StateId;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Default)]
struct Recorder {
    log: Mutex<Vec<String>>,
}

impl Recorder {
    fn push(&self, entry: impl Into<String>) {
        self.log.lock().push(entry.into());
    }

    fn has(&self, entry: &str) -> bool {
        self.log.lock().iter().any(|logged| logged == entry)
    }

    fn count(&self, entry: &str) -> usize {
        self.log.lock().iter().filter(|logged| *logged == entry).count()
    }

    fn attacks(&self) -> Vec<String> {
        self.log
            .lock()
            .iter()
            .filter_map(|logged| logged.strip_prefix("attack ").map(str::to_string))
            .collect()
    }

    fn clear(&self) {
        self.log.lock().clear();
    }
}

impl AgentEffects for Recorder {
    fn reposition(&self) {
        self.push("reposition");
    }

    fn jog_toward_target(&self) {
        self.push("jog");
    }

    fn move_with_input(&self) {
        self.push("move");
    }

    fn leap_toward_target(&self) {
        self.push("leap");
    }

    fn set_counter_icon(&self, visible: bool) {
        self.push(format!("counter icon {visible}"));
    }

    fn freeze_attack_animation(&self) {
        self.push("freeze");
    }

    fn play_attack(&self, attack: &Attack) {
        self.push(format!("attack {}", attack.name));
    }

    fn play_death_animation(&self) {
        self.push("death");
    }

    fn despawn_after(&self, seconds: f32) {
        self.push(format!("despawn {seconds}"));
    }
}

#[derive(Default)]
struct Sensor {
    distance: Mutex<Option<f32>>,
    target: Mutex<Option<Arc<Combatant>>>,
}

impl Sensor {
    fn set_distance(&self, distance: f32) {
        *self.distance.lock() = Some(distance);
    }
}

impl TargetSensor for Sensor {
    fn distance_to_target(&self) -> Option<f32> {
        *self.distance.lock()
    }

    fn counterable_target(&self) -> Option<Arc<Combatant>> {
        self.target.lock().clone()
    }
}

#[derive(Default)]
struct Buttons {
    attack: AtomicBool,
    counter: AtomicBool,
}

impl InputSource for Buttons {
    fn attack_pressed(&self) -> bool {
        self.attack.load(Ordering::SeqCst)
    }

    fn counter_pressed(&self) -> bool {
        self.counter.load(Ordering::SeqCst)
    }
}

fn combatant(attacks: &[&str]) -> Arc<Combatant> {
    let combo = Combo::new("chain", attacks.iter().copied().map(Attack::new).collect());
    let combos = ComboManager::new(1.0, vec![combo]).unwrap();
    Arc::new(Combatant::new(CombatantConfig::default(), combos))
}

struct EnemyRig {
    brain: EnemyBrain,
    combatant: Arc<Combatant>,
    health: Arc<Health>,
    receiver: HitReceiver,
    sensor: Arc<Sensor>,
    effects: Arc<Recorder>,
}

fn enemy(max_hits: u32) -> EnemyRig {
    enemy_with_history(max_hits, DEFAULT_HISTORY_CAPACITY)
}

fn enemy_with_history(max_hits: u32, history_capacity: usize) -> EnemyRig {
    let combatant = combatant(&["claw"]);
    let health = Arc::new(Health::new(HealthConfig {
        max_hits,
        ..HealthConfig::default()
    }));
    let hit_status = Arc::new(HitReactStatus::new());
    let sensor = Arc::new(Sensor::default());
    let effects = Arc::new(Recorder::default());

    let brain = EnemyBrain::with_history_capacity(
        EnemyDeps {
            combatant: Arc::clone(&combatant),
            health: Arc::clone(&health),
            hit_status: Arc::clone(&hit_status),
            sensor: sensor.clone(),
            effects: effects.clone(),
        },
        history_capacity,
    )
    .unwrap();

    EnemyRig {
        brain,
        receiver: HitReceiver::new(Arc::clone(&health), hit_status),
        combatant,
        health,
        sensor,
        effects,
    }
}

struct PlayerRig {
    brain: PlayerBrain,
    combatant: Arc<Combatant>,
    receiver: HitReceiver,
    buttons: Arc<Buttons>,
    sensor: Arc<Sensor>,
    effects: Arc<Recorder>,
}

fn player(context: &Arc<CombatContext>) -> PlayerRig {
    let combatant = combatant(&["jab", "cross", "hook"]);
    let health = Arc::new(Health::new(HealthConfig::default()));
    let hit_status = Arc::new(HitReactStatus::new());
    let buttons = Arc::new(Buttons::default());
    let sensor = Arc::new(Sensor::default());
    let effects = Arc::new(Recorder::default());

    let brain = PlayerBrain::new(PlayerDeps {
        combatant: Arc::clone(&combatant),
        health: Arc::clone(&health),
        hit_status: Arc::clone(&hit_status),
        input: buttons.clone(),
        sensor: sensor.clone(),
        effects: effects.clone(),
        context: Arc::clone(context),
    })
    .unwrap();

    PlayerRig {
        brain,
        receiver: HitReceiver::new(health, hit_status),
        combatant,
        buttons,
        sensor,
        effects,
    }
}

fn instant_slots() -> SlotConfig {
    SlotConfig {
        slot_assignment_interval: 0.0,
        ..SlotConfig::default()
    }
}

#[test]
fn enemy_repositions_until_granted_a_slot_then_attacks() {
    let mut rig = enemy(5);
    let context = Arc::new(CombatContext::new(instant_slots()));
    context.add_enemy(AgentId(1), Arc::clone(&rig.combatant), Arc::clone(&rig.health));
    rig.sensor.set_distance(10.0);

    rig.brain.update();
    assert_eq!(rig.brain.current_state(), Some(EnemyState::Move));
    assert!(rig.effects.has("reposition"));
    assert!(!rig.effects.has("jog"));

    let granted = context.tick(0.1, |_, _| 1.0);
    assert_eq!(granted, vec![AgentId(1)]);

    rig.brain.update();
    assert_eq!(rig.brain.current_state(), Some(EnemyState::Move));
    assert!(rig.effects.has("jog"));

    rig.sensor.set_distance(1.0);
    rig.brain.update();
    assert_eq!(rig.brain.current_state(), Some(EnemyState::Attack));
    assert_eq!(rig.effects.attacks(), vec!["claw".to_string()]);
    assert!(rig.combatant.is_attacking());
}

#[test]
fn enemy_returns_to_reposition_after_attack_ends() {
    let mut rig = enemy(5);
    rig.combatant.start_attacking();
    rig.sensor.set_distance(1.0);

    rig.brain.update();
    assert_eq!(rig.brain.current_state(), Some(EnemyState::Attack));

    rig.combatant.end_attack();
    rig.effects.clear();
    rig.brain.update();

    assert_eq!(rig.brain.current_state(), Some(EnemyState::Move));
    assert!(rig.effects.has("reposition"));
    assert!(!rig.effects.has("jog"));
    assert!(rig.combatant.can_attack());
}

#[test]
fn enemy_reacts_to_hit_and_recovers() {
    let mut rig = enemy(5);

    assert!(rig.receiver.hit());
    rig.brain.update();
    assert_eq!(rig.brain.current_state(), Some(EnemyState::Hit));
    assert!(rig.combatant.in_hit_state());
    assert_eq!(rig.health.current_hits(), 4);

    rig.brain.update();
    assert_eq!(rig.brain.current_state(), Some(EnemyState::Hit));

    rig.receiver.status().finish_hit();
    rig.brain.update();
    assert_eq!(rig.brain.current_state(), Some(EnemyState::Move));
    assert!(!rig.combatant.in_hit_state());
}

#[test]
fn hit_during_attack_interrupts_it() {
    let mut rig = enemy(5);
    rig.combatant.start_attacking();
    rig.sensor.set_distance(1.0);
    rig.brain.update();
    assert_eq!(rig.brain.current_state(), Some(EnemyState::Attack));

    rig.receiver.hit();
    rig.brain.update();

    assert_eq!(rig.brain.current_state(), Some(EnemyState::Hit));
    assert!(!rig.combatant.is_attacking());
}

#[test]
fn lethal_hit_leads_to_death_and_leaves_the_roster() {
    let mut rig = enemy(1);
    let context = Arc::new(CombatContext::new(instant_slots()));
    context.add_enemy(AgentId(7), Arc::clone(&rig.combatant), Arc::clone(&rig.health));

    assert!(rig.receiver.hit());
    assert!(rig.health.is_dead());
    assert_eq!(context.enemy_count(), 0);

    rig.brain.update();
    assert_eq!(rig.brain.current_state(), Some(EnemyState::Death));
    assert!(EnemyState::Death.is_final());
    assert!(rig.effects.has("death"));
    assert!(rig.effects.has("despawn 3"));

    assert!(!rig.receiver.hit());
    rig.brain.update();
    assert_eq!(rig.brain.current_state(), Some(EnemyState::Death));
    assert_eq!(rig.effects.count("death"), 1);
}

#[test]
fn player_counter_freezes_the_enemy() {
    let context = Arc::new(CombatContext::new(instant_slots()));
    let mut foe = enemy(5);
    let mut hero = player(&context);

    foe.combatant.start_attacking();
    foe.sensor.set_distance(2.5);
    foe.brain.update();
    assert_eq!(foe.brain.current_state(), Some(EnemyState::Move));
    assert!(foe.combatant.can_counter());
    assert!(foe.effects.has("counter icon true"));

    *hero.sensor.target.lock() = Some(Arc::clone(&foe.combatant));
    hero.buttons.counter.store(true, Ordering::SeqCst);
    hero.brain.update();
    assert_eq!(hero.brain.current_state(), Some(PlayerState::Counter));
    assert!(hero.effects.has("leap"));
    assert_eq!(hero.effects.attacks(), vec!["jab".to_string()]);

    foe.effects.clear();
    foe.brain.update();
    assert!(foe.effects.has("freeze"));
    assert!(foe.effects.has("counter icon false"));
    assert!(!foe.combatant.can_counter());
}

#[test]
fn counter_needs_an_open_window() {
    let context = Arc::new(CombatContext::new(instant_slots()));
    let foe = enemy(5);
    let mut hero = player(&context);

    *hero.sensor.target.lock() = Some(Arc::clone(&foe.combatant));
    hero.buttons.counter.store(true, Ordering::SeqCst);
    hero.brain.update();

    assert_eq!(hero.brain.current_state(), Some(PlayerState::Move));
    assert!(hero.effects.has("move"));
}

#[test]
fn player_chains_a_combo_while_attack_is_held() {
    let context = Arc::new(CombatContext::new(instant_slots()));
    let mut hero = player(&context);
    hero.buttons.attack.store(true, Ordering::SeqCst);

    hero.brain.update();
    assert_eq!(hero.brain.current_state(), Some(PlayerState::Attack));

    // Without a landed hit the window stays shut.
    hero.brain.update();
    assert_eq!(hero.effects.attacks(), vec!["jab".to_string()]);

    assert!(hero.combatant.land_hit());
    hero.brain.update();
    assert!(hero.combatant.land_hit());
    hero.brain.update();
    assert_eq!(
        hero.effects.attacks(),
        vec!["jab".to_string(), "cross".to_string(), "hook".to_string()]
    );

    // The closing attack does not reopen the window.
    assert!(!hero.combatant.land_hit());
    hero.brain.update();
    assert_eq!(hero.effects.attacks().len(), 3);

    hero.buttons.attack.store(false, Ordering::SeqCst);
    hero.combatant.end_attack();
    hero.brain.update();
    assert_eq!(hero.brain.current_state(), Some(PlayerState::Move));
}

#[test]
fn player_hit_cancels_attack() {
    let context = Arc::new(CombatContext::new(instant_slots()));
    let mut hero = player(&context);
    hero.buttons.attack.store(true, Ordering::SeqCst);
    hero.brain.update();
    assert_eq!(hero.brain.current_state(), Some(PlayerState::Attack));

    hero.buttons.attack.store(false, Ordering::SeqCst);
    hero.receiver.hit();
    hero.brain.update();
    assert_eq!(hero.brain.current_state(), Some(PlayerState::Hit));
    assert!(!hero.combatant.is_attacking());

    hero.receiver.status().finish_hit();
    hero.brain.update();
    assert_eq!(hero.brain.current_state(), Some(PlayerState::Move));
}

#[test]
fn enemy_history_honours_configured_capacity() {
    let config = CombatConfig::from_json_str(
        r#"{
            "combo": { "combos": [ { "attacks": [ { "name": "claw" } ] } ] },
            "history_capacity": 2
        }"#,
    )
    .unwrap();
    let mut rig = enemy_with_history(5, config.history_capacity);

    rig.receiver.hit();
    rig.brain.update();
    rig.receiver.status().finish_hit();
    rig.brain.update();

    let history = rig.brain.machine().history();
    assert_eq!(history.capacity(), 2);
    assert_eq!(history.len(), 2);
    assert_eq!(
        history.get_path(),
        vec![Some(EnemyState::Move), Some(EnemyState::Hit), Some(EnemyState::Move)]
    );
}

#[test]
fn player_history_honours_configured_capacity() {
    let context = Arc::new(CombatContext::new(instant_slots()));
    let brain = PlayerBrain::with_history_capacity(
        PlayerDeps {
            combatant: combatant(&["jab"]),
            health: Arc::new(Health::default()),
            hit_status: Arc::new(HitReactStatus::new()),
            input: Arc::new(Buttons::default()),
            sensor: Arc::new(Sensor::default()),
            effects: Arc::new(Recorder::default()),
            context,
        },
        0,
    )
    .unwrap();

    assert_eq!(brain.current_state(), Some(PlayerState::Move));
    assert!(brain.machine().history().is_empty());
}

#[test]
fn dropped_brain_stops_listening() {
    let rig = enemy(5);
    assert!(rig.combatant.start_attack_phase().listener_count() > 0);
    assert!(rig.receiver.status().hit_start().listener_count() > 0);

    drop(rig.brain);

    assert_eq!(rig.combatant.start_attack_phase().listener_count(), 0);
    assert_eq!(rig.combatant.on_counter().listener_count(), 0);
    assert_eq!(rig.receiver.status().hit_start().listener_count(), 0);
}
