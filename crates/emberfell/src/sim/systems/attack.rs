//! Attack resolution.
//!
//! ```text
//! tick 1 ........ launch attacker, play swing sound
//! hit_delay ..... resolve hits against everything in range and in front
//! > hit_delay ... attacker may steer at move_factor speed
//! > duration .... chain the queued attack or return to ready
//! ```
//!
//! Damage is `atk + attack.damage - def`, doubled on a crit, and actors
//! lose half of it rounded up.

use crate::content::{AttackDef, Stat};
use crate::events::{GameEvent, QuestSignal};
use crate::sim::components::{
    Actor, AttackState, Boss, Breakable, DebugLabel, Intent, Launch, Location, Misc,
    PlayerController,
};
use crate::sim::systems::stun_bosses;
use crate::sim::{squared, EntityState, Simulation};
use emberfell_core::Entity;
use emberfell_shared::{sanitize_angle, Point};

/// Chance to crit per point of luck, in tenths of a percent.
const CRIT_PER_LUCK: i32 = 25;

pub(super) fn run(sim: &mut Simulation) {
    let content = sim.content.clone();
    for e in sim.world.query::<(AttackState, Actor, Location)>() {
        let Some(state) = sim.world.get_mut::<AttackState>(e) else {
            continue;
        };
        state.time += 1;
        let time = state.time;
        let Some(attack) = state.attack.and_then(|id| content.attack(id)) else {
            sim.change_state(e, EntityState::Ready);
            continue;
        };

        if time > attack.hit_delay {
            steer(sim, e, attack);
        }
        if time == 1 {
            launch_attacker(sim, e, attack);
            sim.play_sound(attack.sound);
        }
        if time == attack.hit_delay {
            resolve_hits(sim, e, attack);
        }
        if !sim.world.is_valid(e) {
            continue;
        }

        if time > attack.duration {
            let queued = sim.world.get::<AttackState>(e).and_then(|s| s.queued);
            match queued {
                Some(next) => {
                    sim.world.insert(
                        e,
                        AttackState {
                            time: 0,
                            attack: Some(next),
                            queued: None,
                        },
                    );
                }
                None => sim.change_state(e, EntityState::Ready),
            }
        }
    }
}

fn steer(sim: &mut Simulation, e: Entity, attack: &AttackDef) {
    let (Some(intent), Some(actor)) = (
        sim.world.get::<Intent>(e).copied(),
        sim.world.get::<Actor>(e).copied(),
    ) else {
        return;
    };
    #[allow(clippy::cast_precision_loss)]
    let step = intent
        .direction
        .scaled_trunc(actor.move_speed as f32 * attack.move_factor);
    sim.apply_motion(e, step.x, step.y);
}

fn launch_attacker(sim: &mut Simulation, e: Entity, attack: &AttackDef) {
    let direction = sim
        .world
        .get::<Intent>(e)
        .map(|i| i.direction)
        .filter(|d| !d.is_zero());
    let angle = direction.map_or_else(|| sim.facing(e).angle(), |d| d.angle());
    if let Some(launch) = sim.world.get_or_attach::<Launch>(e) {
        launch.launch = attack.launch;
        launch.angle = angle;
    }
}

fn resolve_hits(sim: &mut Simulation, e: Entity, attack: &AttackDef) {
    let (Some(at), Some(attacker)) = (
        sim.position(e),
        sim.world.get::<Actor>(e).copied(),
    ) else {
        return;
    };
    let facing_angle = sim.facing(e).angle();

    for other in sim.world.query::<(Location,)>() {
        if other == e || !sim.world.is_valid(other) {
            continue;
        }
        let target_actor = sim.world.get::<Actor>(other).copied();
        if target_actor.is_some_and(|t| t.faction == attacker.faction) && !attack.friendly_fire {
            continue;
        }
        let Some(target_at) = sim.position(other) else {
            continue;
        };
        if at.distance_squared(target_at) > squared(attack.range) {
            continue;
        }
        if sim.is_invincible(other) {
            continue;
        }

        let angle_to = at.angle_to(target_at);
        let behind = sanitize_angle(angle_to - facing_angle);
        if !attack.surround && behind > 90 && behind < 270 {
            continue;
        }

        if sim.world.has::<Breakable>(other) {
            hit_breakable(sim, other, target_at);
        } else if let Some(target) = target_actor {
            if !hit_actor(sim, e, other, &target, attack, angle_to) {
                continue;
            }
        } else {
            continue;
        }

        if !attack.aoe {
            break;
        }
    }
}

fn hit_breakable(sim: &mut Simulation, other: Entity, at: Point) {
    let Some(breakable) = sim.world.get_mut::<Breakable>(other) else {
        return;
    };
    breakable.hits -= 1;
    if breakable.hits > 0 {
        sim.shake(other, 2);
        return;
    }

    if let Some(misc) = sim.world.get::<Misc>(other).copied() {
        sim.drop_misc_payload(&misc, at);
        let gold = sim.roll(3);
        sim.drop_gold(at.x, at.y, gold);
    }
    sim.drop_mini_inventory(other, at);
    sim.destroy(other);
}

/// Applies one hit to an actor.
///
/// # Returns
///
/// `false` if the hit did no damage and should not count as a connection.
fn hit_actor(
    sim: &mut Simulation,
    e: Entity,
    other: Entity,
    target: &Actor,
    attack: &AttackDef,
    angle_to: i32,
) -> bool {
    let Some(target_at) = sim.position(other) else {
        return false;
    };
    let mut damage = sim.stat(e, Stat::Atk) + attack.damage - sim.stat(other, Stat::Def);
    let crit_chance = sim.stat(e, Stat::Lck) * CRIT_PER_LUCK / 10;
    if sim.roll(100) < crit_chance {
        damage *= 2;
        sim.play_sound(sim.builtins.sound_crit);
        sim.spawn_particles(sim.builtins.particles_crit, target_at);
    }
    if damage <= 0 {
        return false;
    }

    if attack.hitstop > 0 {
        sim.emit(GameEvent::Hitstop {
            frames: attack.hitstop,
        });
    }
    let hp = target.hp - (damage + 1) / 2;
    if let Some(actor) = sim.world.get_mut::<Actor>(other) {
        actor.hp = hp;
    }

    if hp <= 0 {
        defeat(sim, other, target_at);
        grant_xp(sim, e, target.lvl);
    } else {
        sim.play_sound(sim.builtins.sound_hit);
        sim.world.insert(
            other,
            Launch {
                launch: attack.knockback,
                angle: angle_to,
            },
        );
        sim.change_state(other, EntityState::Hurt);
    }
    true
}

fn defeat(sim: &mut Simulation, other: Entity, at: Point) {
    if let Some(misc) = sim.world.get::<Misc>(other).copied() {
        sim.drop_misc_payload(&misc, at);

        let prefab = sim.world.get::<DebugLabel>(other).and_then(|l| l.prefab);
        let is_boss = sim.world.has::<Boss>(other);
        if is_boss {
            tracing::debug!("boss defeat");
            sim.emit(GameEvent::Quest {
                kind: QuestSignal::DefeatBoss,
                entity: other,
                prefab,
            });
        } else if !misc.tentacle {
            sim.emit(GameEvent::Quest {
                kind: QuestSignal::Defeat,
                entity: other,
                prefab,
            });
        }

        if misc.tentacle {
            stun_bosses(sim);
        } else {
            let gold = 1 + sim.roll(5);
            sim.drop_gold(at.x, at.y, gold);
        }
    }
    sim.drop_mini_inventory(other, at);

    if sim.world.has::<PlayerController>(other) {
        sim.emit(GameEvent::PlayerDefeated);
    }
    if let Some(actor) = sim.world.get_mut::<Actor>(other) {
        actor.hp = 0;
    }
    sim.destroy(other);
}

fn grant_xp(sim: &mut Simulation, e: Entity, defeated_lvl: i32) {
    let per_level = sim.config.tuning.xp_per_level;
    let Some(actor) = sim.world.get_mut::<Actor>(e) else {
        return;
    };
    let delta = defeated_lvl - actor.lvl + 1;
    if delta <= 0 {
        return;
    }
    actor.xp += delta;
    let mut levels = Vec::new();
    while actor.xp > per_level {
        actor.lvl += 1;
        actor.xp -= per_level;
        levels.push(actor.lvl);
    }
    for level in levels {
        tracing::debug!("level up! now {level}");
        sim.emit(GameEvent::LevelUp { entity: e, level });
    }
}
