//! # Arena - Headless Scripted Run
//!
//! Loads content, builds a small walled region, spawns a player among
//! slimes, breakables and a boss, then drives the player with a fixed
//! input script and reports what happened.
//!
//! ```text
//! cargo run --bin arena [content.toml] [config.toml]
//! ```
//!
//! Same seed, same script, same report.

use emberfell::{
    Content, GameEvent, InputButton, InputState, QuestSignal, SimConfig, SimResult, Simulation,
    TileGrid,
};
use std::collections::BTreeMap;

/// Ticks the script runs for.
const TICKS: u64 = 1200;

const REGION: [&str; 12] = [
    "####################",
    "#..................#",
    "#..................#",
    "#....##............#",
    "#....##............#",
    "#..................#",
    "#..........###.....#",
    "#..................#",
    "#..................#",
    "#..................#",
    "#..................#",
    "####################",
];

/// World position of a tile centre.
const fn tile(x: i32, y: i32) -> (i32, i32) {
    (x * 256 + 128, y * 256 + 128)
}

fn main() {
    println!("═══════════════════════════════════════════════════════════════════");
    println!("                      EMBERFELL ARENA");
    println!("                       HEADLESS MODE");
    println!("═══════════════════════════════════════════════════════════════════");
    println!();

    if let Err(e) = run() {
        eprintln!("   ✗ FATAL: {e}");
        std::process::exit(1);
    }
}

fn run() -> SimResult<()> {
    let mut args = std::env::args().skip(1);
    let content_path = args
        .next()
        .unwrap_or_else(|| concat!(env!("CARGO_MANIFEST_DIR"), "/data/arena.toml").to_owned());
    let config = match args.next() {
        Some(path) => SimConfig::from_path(path)?,
        None => SimConfig::default(),
    };

    println!("📦 Loading content from {content_path} ...");
    let content = Content::from_path(&content_path)?;
    println!("   ✓ {} prefabs", content.prefab_count());

    let seed = config.seed;
    let mut sim = Simulation::new(config, content)?;
    let loops = sim.load_region(&TileGrid::from_rows(&REGION))?;
    println!("   ✓ Region loaded: {loops} boundary loops");
    println!("   ✓ Seed: {seed:#x}");
    println!();

    let (px, py) = tile(3, 8);
    let player = sim.spawn_named(px, py, "player");
    for (name, x, y) in [
        ("slime", 9, 8),
        ("slime", 12, 4),
        ("vase", 4, 9),
        ("vase", 5, 9),
        ("chest", 2, 2),
        ("bush", 8, 9),
        ("elder", 16, 2),
        ("boss", 15, 8),
    ] {
        let (x, y) = tile(x, y);
        sim.spawn_named(x, y, name);
    }
    println!("🏗️  {} entities spawned", sim.world().alive_count());
    println!();

    let mut counts: BTreeMap<&'static str, u32> = BTreeMap::new();
    let mut gold = 0;
    let mut kills = 0;

    for tick in 0..TICKS {
        let input = script(tick);
        sim.tick(&input);

        for event in sim.events().drain() {
            *counts.entry(event_name(&event)).or_default() += 1;
            match event {
                GameEvent::GoldCollected { amount } => gold += amount,
                GameEvent::Quest { kind, .. } => {
                    kills += 1;
                    if kind == QuestSignal::DefeatBoss {
                        println!("   ✓ Boss defeated on tick {tick}");
                    }
                }
                GameEvent::PlayerDefeated => {
                    println!("   ✗ Player defeated on tick {tick}");
                }
                _ => {}
            }
        }

        if !sim.world().is_valid(player) {
            break;
        }
    }

    println!("📊 Report after {} ticks", sim.tick_count());
    println!("   Player hp:   {}/{}", sim.hp(player), sim.max_hp(player));
    if let Some(at) = sim.position(player) {
        println!("   Player at:   ({}, {})", at.x, at.y);
    }
    println!("   Gold:        {gold}");
    println!("   Defeats:     {kills}");
    println!("   Alive:       {}", sim.world().alive_count());
    println!();
    println!("   Events:");
    for (name, count) in &counts {
        println!("     {name:<16} {count}");
    }
    Ok(())
}

/// Input for one tick of the scripted run.
fn script(tick: u64) -> InputState {
    let mut input = InputState::new();
    match tick {
        // walk right toward the first slime, swinging
        0..=299 => {
            input.set_axis(1.0, 0.0);
            if tick % 20 == 0 {
                input.button_down(InputButton::Attack);
            }
        }
        // break the vases behind
        300..=359 => {
            input.set_axis(-1.0, 0.3);
            if tick % 15 == 0 {
                input.button_down(InputButton::Attack);
            }
        }
        // dodge up, then head for the chest
        360 => input.button_down(InputButton::Roll),
        361..=599 => {
            input.set_axis(-0.5, -1.0);
            if tick % 30 == 0 {
                input.button_down(InputButton::Interact);
            }
        }
        // wander toward the boss, fighting
        _ => {
            input.set_axis(1.0, 0.1);
            if tick % 12 == 0 {
                input.button_down(InputButton::Attack);
            }
        }
    }
    input
}

fn event_name(event: &GameEvent) -> &'static str {
    match event {
        GameEvent::PlaySound { .. } => "sound",
        GameEvent::SpawnParticles { .. } => "particles",
        GameEvent::Hitstop { .. } => "hitstop",
        GameEvent::HintChanged { .. } => "hint",
        GameEvent::Dialog { .. } => "dialog",
        GameEvent::CraftingOpened { .. } => "crafting",
        GameEvent::ChestOpened { .. } => "chest",
        GameEvent::ShopOpened { .. } => "shop",
        GameEvent::Quest { .. } => "quest",
        GameEvent::PlayerDefeated => "player_defeated",
        GameEvent::GoldCollected { .. } => "gold",
        GameEvent::ItemCollected { .. } => "item",
        GameEvent::LevelUp { .. } => "level_up",
    }
}
