//! Per-tick passes, run in a fixed order.
//!
//! Controllers write intents, intent resolution turns them into state
//! changes and motion, and integration plus collision run last so every
//! pass sees positions from the end of the previous tick.

mod attack;
mod boss;
mod collect;
mod collision;
mod cosmetic;
mod enemy;
mod hint;
mod intent;
mod motion;
mod path_follow;
mod player;
mod timers;

pub(crate) use boss::stun_bosses;
pub use player::intent_from_input;

use super::Simulation;
use crate::input::InputState;

pub(super) fn run_tick(sim: &mut Simulation, input: &InputState) {
    player::run(sim, input);
    enemy::run(sim);
    path_follow::run(sim);
    boss::run(sim);
    intent::run(sim);
    attack::run(sim);
    timers::run_hurt(sim);
    timers::run_rolling(sim);
    timers::run_alert(sim);
    timers::decay_status_effects(sim);
    collect::run(sim);
    cosmetic::run_shake(sim);
    cosmetic::run_launch(sim);
    hint::run(sim);
    motion::integrate(sim);
    collision::resolve_solids(sim);
    collision::resolve_field(sim);
}
