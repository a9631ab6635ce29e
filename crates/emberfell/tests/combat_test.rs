//! # Combat Integration Tests
//!
//! Drives whole ticks through the public API: input in, events and
//! component state out.
//!
//! Run with: cargo test -p emberfell --test combat_test

use emberfell::content::Stat;
use emberfell::sim::{Actor, Boss, Cheats, HurtState, ItemCollectible};
use emberfell::{
    Content, Entity, EntityState, GameEvent, InputButton, InputState, QuestSignal, SimConfig,
    Simulation,
};

const CONTENT: &str = r#"
    [[animations]]
    name = "boss_idle"
    duration = 30

    [[animations]]
    name = "boss_idle2"
    duration = 30

    [[attacks]]
    name = "jab"
    damage = 5
    range = 16
    hit_delay = 1
    duration = 6
    next = "cross"

    [[attacks]]
    name = "cross"
    damage = 7
    range = 16
    hit_delay = 1
    duration = 6

    [[attacks]]
    name = "bite"
    damage = 2
    range = 20
    hit_delay = 5
    duration = 20

    [[items]]
    name = "berry"

    [[loot_tables]]
    name = "vase_loot"
    items = ["berry"]

    [[status_effects]]
    name = "fortified"
    stat = "def"
    change = 3

    [[prefabs]]
    name = "player"
    controller = "player"
    actor = true
    atk = 10
    hp = 30
    default_attack = "jab"

    [[prefabs]]
    name = "dummy"
    actor = true
    faction = 1
    def = 3
    hp = 20
    lvl = 1
    hurt_duration = 10
    solid = false

    [[prefabs]]
    name = "wall"
    actor = true
    faction = 1
    def = 20
    solid = false

    [[prefabs]]
    name = "vase"
    breakable = true
    solid = false
    loot_table = "vase_loot"

    [[prefabs]]
    name = "item_drop"
    solid = false
    collectible = true

    [[prefabs]]
    name = "biter"
    controller = "enemy"
    actor = true
    faction = 1
    atk = 2
    move_speed = 12
    default_attack = "bite"
    alert_radius = 64

    [[prefabs]]
    name = "boss"
    controller = "boss"
    actor = true
    faction = 1
    hp = 100
    anim_idle = "boss_idle2"
    solid = false

    [[prefabs]]
    name = "boss_spawn"
    actor = true
    faction = 1
    hp = 1
    tentacle = true
    solid = false
"#;

fn setup() -> (Simulation, Entity) {
    let content = Content::from_toml_str(CONTENT).expect("content");
    let mut sim = Simulation::new(SimConfig::default(), content).expect("simulation");
    let player = sim.spawn_named(0, 0, "player");
    (sim, player)
}

fn idle() -> InputState {
    InputState::new()
}

fn attack() -> InputState {
    InputState::with_press(InputButton::Attack)
}

fn actor(sim: &Simulation, e: Entity) -> Actor {
    *sim.world().get::<Actor>(e).expect("actor")
}

/// Test: atk 10 + 5 damage - 3 def = 12, halved to 6.
#[test]
fn test_hit_applies_halved_damage() {
    let (mut sim, _) = setup();
    let dummy = sim.spawn_named(100, 0, "dummy");

    sim.tick(&attack());

    assert_eq!(sim.hp(dummy), 14);
    assert_eq!(sim.state(dummy), EntityState::Hurt);
    assert!(sim.world().has::<HurtState>(dummy));
}

/// Test: a defense that swallows the hit leaves the target untouched.
#[test]
fn test_blocked_hit_is_a_miss() {
    let (mut sim, _) = setup();
    let wall = sim.spawn_named(100, 0, "wall");

    sim.tick(&attack());

    assert_eq!(sim.hp(wall), 10);
    assert_eq!(sim.state(wall), EntityState::Ready);
}

/// Test: pressing attack during a swing chains the combo.
#[test]
fn test_combo_chains_into_next_attack() {
    let (mut sim, player) = setup();
    let dummy = sim.spawn_named(100, 0, "dummy");

    sim.tick(&attack());
    assert_eq!(sim.hp(dummy), 14);
    sim.tick(&attack());
    for _ in 0..5 {
        sim.tick(&idle());
    }
    assert_eq!(sim.state(player), EntityState::Attack);

    // cross: 10 + 7 - 3 = 14, halved to 7
    sim.tick(&idle());
    assert_eq!(sim.hp(dummy), 7);
}

/// Test: lethal hits destroy, grant XP and report the defeat.
#[test]
fn test_defeat_grants_xp_and_levels() {
    let (mut sim, player) = setup();
    let dummy = sim.spawn_named(100, 0, "dummy");
    sim.set_hp(dummy, 1);
    if let Some(a) = sim.world_mut().get_mut::<Actor>(player) {
        a.xp = 49;
    }
    sim.events().drain();

    sim.tick(&attack());

    assert!(!sim.world().is_valid(dummy));
    let events = sim.events().drain();
    assert!(events.iter().any(|e| matches!(
        e,
        GameEvent::Quest {
            kind: QuestSignal::Defeat,
            ..
        }
    )));
    assert!(events.contains(&GameEvent::LevelUp {
        entity: player,
        level: 1
    }));
    let a = actor(&sim, player);
    assert_eq!((a.lvl, a.xp), (1, 1));
}

/// Test: a breakable drops its loot table where it stood.
#[test]
fn test_breakable_drops_loot() {
    let (mut sim, _) = setup();
    let vase = sim.spawn_named(100, 0, "vase");
    let berry = sim.content().find_item("berry");

    sim.tick(&attack());

    assert!(!sim.world().is_valid(vase));
    let drops = sim
        .world()
        .query::<(ItemCollectible,)>()
        .filter(|&e| sim.world().get::<ItemCollectible>(e).map(|c| c.item) == Some(berry))
        .count();
    assert_eq!(drops, 1);
}

/// Test: an enemy notices, closes in and bites.
#[test]
fn test_enemy_hunts_player() {
    let (mut sim, player) = setup();
    let biter = sim.spawn_named(-600, 0, "biter");

    for _ in 0..200 {
        sim.tick(&idle());
    }

    assert!(sim.hp(player) < 30);
    assert_eq!(
        sim.world()
            .get::<emberfell::sim::EnemyController>(biter)
            .and_then(|c| c.target),
        Some(player)
    );
}

/// Test: the boss wakes near the player and killing a tentacle stuns it.
#[test]
fn test_boss_wakes_and_tentacle_stuns() {
    let (mut sim, _) = setup();
    let boss = sim.spawn_named(1000, 0, "boss");

    sim.tick(&idle());
    let state = *sim.world().get::<Boss>(boss).expect("boss");
    assert!(state.active);
    assert!(sim.world().get::<Cheats>(boss).expect("cheats").god);

    sim.spawn_named(100, 0, "boss_spawn");
    sim.tick(&attack());
    assert_eq!(sim.world().get::<Boss>(boss).expect("boss").stun, 50);
    assert_eq!(sim.hp(boss), 99);

    sim.tick(&idle());
    assert!(!sim.world().get::<Cheats>(boss).expect("cheats").god);
}

/// Test: god mode makes an actor untouchable.
#[test]
fn test_invincible_targets_are_skipped() {
    let (mut sim, _) = setup();
    let dummy = sim.spawn_named(100, 0, "dummy");
    sim.world_mut().insert(
        dummy,
        Cheats {
            god: true,
            noclip: false,
        },
    );

    sim.tick(&attack());
    assert_eq!(sim.hp(dummy), 20);
}

/// Test: status effects expire after their duration.
#[test]
fn test_status_effect_expires() {
    let (mut sim, player) = setup();
    let fortified = sim.content().find_status_effect("fortified").expect("effect");
    sim.add_status_effect(player, fortified);
    assert_eq!(sim.stat(player, Stat::Def), 3);

    let duration = sim.config().tuning.status_effect_duration;
    for _ in 0..duration - 1 {
        sim.tick(&idle());
    }
    assert_eq!(sim.stat(player, Stat::Def), 3);
    sim.tick(&idle());
    assert_eq!(sim.stat(player, Stat::Def), 0);
}
