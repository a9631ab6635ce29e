//! Pickup animation: collectibles fly to their collector, rise, then vanish
//! into the inventory.

use crate::events::GameEvent;
use crate::sim::components::{BeingCollected, ItemCollectible, Location};
use crate::sim::{squared, Simulation};
use emberfell_shared::{angle_length_x, angle_length_y};

/// Top flight speed, reached after this many ticks.
const MAX_SPEED: i32 = 40;

/// Ticks after which the pickup rises twice as fast.
const FAST_RISE: i32 = 50;

/// Tick on which the pickup is credited and destroyed.
const COLLECT_TIME: i32 = 55;

pub(super) fn run(sim: &mut Simulation) {
    for e in sim.world.query::<(BeingCollected, Location)>() {
        let Some(collecting) = sim.world.get::<BeingCollected>(e).copied() else {
            continue;
        };
        let (Some(at), Some(target)) = (
            sim.position(e),
            collecting.collector.and_then(|c| sim.position(c)),
        ) else {
            sim.world.detach::<BeingCollected>(e);
            continue;
        };

        let mut time = collecting.time;
        let speed = time.min(MAX_SPEED);
        if at.distance_squared(target) < squared(speed) {
            sim.apply_motion(e, target.x - at.x, target.y - at.y);
            time = time.max(MAX_SPEED);
        } else {
            let angle = at.angle_to(target);
            sim.apply_motion(e, angle_length_x(angle, speed), angle_length_y(angle, speed));
        }

        if let Some(loc) = sim.world.get_mut::<Location>(e) {
            if time > MAX_SPEED {
                loc.zoff += 1;
            }
            if time > FAST_RISE {
                loc.zoff += 1;
            }
        }
        time += 1;
        if let Some(collecting) = sim.world.get_mut::<BeingCollected>(e) {
            collecting.time = time;
        }

        if time == COLLECT_TIME {
            match sim.world.get::<ItemCollectible>(e).copied() {
                Some(ItemCollectible { is_gold: true, .. }) => {
                    sim.emit(GameEvent::GoldCollected { amount: 1 });
                }
                Some(ItemCollectible {
                    item: Some(item), ..
                }) => {
                    sim.emit(GameEvent::ItemCollected { item, quantity: 1 });
                }
                _ => {}
            }
            sim.destroy(e);
        }
    }
}
