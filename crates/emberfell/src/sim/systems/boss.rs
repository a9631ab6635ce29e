//! Boss encounter script.
//!
//! ```text
//!   asleep ── player within activate ──> awake ── player past deactivate ──> asleep
//!
//!   awake:  stunned?  yes ─> count down, vulnerable, stunned idle
//!                     no  ─> invulnerable, active idle, run phase
//!
//!   Minions ── minion_phase_length ──> Tentacles ── tentacle_phase_length ──> Minions
//! ```
//!
//! Tentacles are the way in: each one killed stuns the boss, and the last
//! tentacle of a wave stuns it for much longer.

use crate::sim::components::{Actor, Animation, Boss, BossPhase, Cheats, Location};
use crate::sim::{squared, Simulation};
use emberfell_shared::Point;

/// Boss hp below each of these adds one minion per wave.
const MINION_HP_THRESHOLDS: [i32; 3] = [75, 50, 25];

/// Ticks between minion spawns within a wave.
const MINION_SPAWN_INTERVAL: i32 = 10;

pub(super) fn run(sim: &mut Simulation) {
    let Some(player_at) = sim.player().and_then(|p| sim.position(p)) else {
        return;
    };
    let tuning = sim.config.boss;

    for e in sim.world.query::<(Boss, Location, Animation, Cheats)>() {
        let (Some(mut boss), Some(at)) = (sim.world.get::<Boss>(e).copied(), sim.position(e))
        else {
            continue;
        };
        let distance = at.distance_squared(player_at);

        if !boss.active {
            if distance >= squared(tuning.activate_distance) {
                continue;
            }
            tracing::debug!("boss {} activated", sim.debug_name(e));
            boss.active = true;
        } else if distance > squared(tuning.deactivate_distance) {
            tracing::debug!("boss {} deactivated", sim.debug_name(e));
            boss.active = false;
            sim.world.insert(e, boss);
            continue;
        }

        let stunned = boss.stun > 0;
        let idle = if stunned {
            sim.builtins.anim_boss_idle
        } else {
            sim.builtins.anim_boss_active
        };
        if let Some(anim) = sim.world.get_mut::<Animation>(e) {
            anim.set.idle = idle;
        }
        if let Some(cheats) = sim.world.get_mut::<Cheats>(e) {
            cheats.god = !stunned;
        }
        if stunned {
            boss.stun -= 1;
            sim.world.insert(e, boss);
            continue;
        }

        boss.timer += 1;
        match boss.phase {
            BossPhase::Tentacles => {
                boss.stunned_tentacles = 0;
                if boss.timer == tuning.tentacle_spawn_time {
                    for _ in 0..tuning.tentacles_per_wave {
                        let spot = summon_spot(sim, at);
                        if let Some(prefab) = sim.builtins.prefab_tentacle {
                            sim.spawn(spot.x, spot.y, prefab);
                        }
                    }
                }
                if boss.timer > tuning.tentacle_phase_length {
                    boss.phase = BossPhase::Minions;
                    boss.timer = 0;
                }
            }
            BossPhase::Minions => {
                let hp = sim.world.get::<Actor>(e).map(|a| a.hp);
                let extra = hp.map_or(0, |hp| {
                    MINION_HP_THRESHOLDS.iter().filter(|&&t| hp < t).count()
                });
                #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
                let amount = 1 + extra as i32;
                if boss.timer < MINION_SPAWN_INTERVAL * amount
                    && boss.timer % MINION_SPAWN_INTERVAL == MINION_SPAWN_INTERVAL - 1
                {
                    let spot = summon_spot(sim, at);
                    if let Some(prefab) = sim.builtins.prefab_minion {
                        sim.spawn(spot.x, spot.y, prefab);
                    }
                }
                if boss.timer > tuning.minion_phase_length {
                    boss.phase = BossPhase::Tentacles;
                    boss.timer = 0;
                }
            }
        }
        sim.world.insert(e, boss);
    }
}

/// Random point in front of (below) the boss.
fn summon_spot(sim: &mut Simulation, at: Point) -> Point {
    let x = at.x + sim.roll(1000) - 500;
    let y = at.y + 200 + sim.roll(1000);
    Point::new(x, y)
}

/// Stuns every boss after a tentacle dies.
///
/// The kill that completes a wave stuns for `wave_stun`, every other kill
/// for `tentacle_stun`. Each kill also chips one hp off the boss, never
/// below 1.
pub(crate) fn stun_bosses(sim: &mut Simulation) {
    let tuning = sim.config.boss;
    for e in sim.world.query::<(Boss, Actor)>() {
        if let Some(boss) = sim.world.get_mut::<Boss>(e) {
            boss.stunned_tentacles += 1;
            boss.stun += if boss.stunned_tentacles == tuning.tentacles_per_wave {
                tuning.wave_stun
            } else {
                tuning.tentacle_stun
            };
        }
        if let Some(actor) = sim.world.get_mut::<Actor>(e) {
            actor.hp = (actor.hp - 1).max(1);
        }
    }
}
