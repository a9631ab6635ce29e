//! Steers entities along their navgrid route.

use crate::sim::components::{Intent, IntentKind, Location, PathSpeed, Pathfinding};
use crate::sim::{squared, Simulation};
use emberfell_shared::{Point, Vec2, TILE_UNITS};

/// World position of a waypoint tile's centre.
fn tile_centre(tile: Point) -> Point {
    Point::new(
        tile.x * TILE_UNITS + TILE_UNITS / 2,
        tile.y * TILE_UNITS + TILE_UNITS / 2,
    )
}

pub(super) fn run(sim: &mut Simulation) {
    let tolerance = squared(sim.config.tuning.waypoint_tolerance);
    for e in sim.world.query::<(Location, Pathfinding)>() {
        let Some(at) = sim.position(e) else {
            continue;
        };
        let Some(path) = sim.world.get_mut::<Pathfinding>(e) else {
            continue;
        };
        if path.is_finished() {
            continue;
        }

        let mut next = tile_centre(path.waypoints[path.progress]);
        if at.distance_squared(next) < tolerance {
            path.progress += 1;
            if path.is_finished() {
                continue;
            }
            next = tile_centre(path.waypoints[path.progress]);
        }
        let speed = path.speed;
        let direction = Vec2::between(at, next).normalized();

        match speed {
            PathSpeed::AiDriven => {
                if let Some(intent) = sim.world.get_mut::<Intent>(e) {
                    intent.direction = direction;
                    if intent.kind == IntentKind::None {
                        intent.kind = IntentKind::Walk;
                    }
                }
            }
            PathSpeed::Fixed(speed) => {
                #[allow(clippy::cast_precision_loss)]
                let step = direction.scaled_trunc(speed as f32);
                sim.apply_motion(e, step.x, step.y);
            }
        }
    }
}
