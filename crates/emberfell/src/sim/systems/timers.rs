//! State timers and status effect decay.

use crate::sim::components::{AlertState, HurtState, RollingState, StatusEffects};
use crate::sim::{EntityState, Simulation};

/// Hurt duration that means "as long as the hurt animation".
const DURATION_FROM_ANIMATION: i32 = -1;

pub(super) fn run_hurt(sim: &mut Simulation) {
    for e in sim.world.query::<(HurtState,)>() {
        let Some(hurt) = sim.world.get_mut::<HurtState>(e) else {
            continue;
        };
        hurt.time += 1;
        let (time, duration) = (hurt.time, hurt.duration);
        let duration = if duration == DURATION_FROM_ANIMATION {
            sim.content.animation_duration(sim.current_animation(e))
        } else {
            duration
        };
        if time > duration {
            sim.change_state(e, EntityState::Ready);
        }
    }
}

pub(super) fn run_rolling(sim: &mut Simulation) {
    for e in sim.world.query::<(RollingState,)>() {
        let Some(roll) = sim.world.get_mut::<RollingState>(e) else {
            continue;
        };
        roll.time += 1;
        if roll.time > roll.duration {
            sim.change_state(e, EntityState::Ready);
        } else {
            let velocity = roll.velocity;
            sim.apply_motion(e, velocity.x, velocity.y);
        }
    }
}

pub(super) fn run_alert(sim: &mut Simulation) {
    for e in sim.world.query::<(AlertState,)>() {
        let Some(alert) = sim.world.get_mut::<AlertState>(e) else {
            continue;
        };
        alert.time += 1;
        let time = alert.time;
        if time > sim.content.animation_duration(sim.current_animation(e)) {
            sim.change_state(e, EntityState::Ready);
        }
    }
}

pub(super) fn decay_status_effects(sim: &mut Simulation) {
    for e in sim.world.query::<(StatusEffects,)>() {
        if let Some(effects) = sim.world.get_mut::<StatusEffects>(e) {
            for slot in effects.slots.iter_mut().filter(|s| s.remaining > 0) {
                slot.remaining -= 1;
            }
        }
    }
}
