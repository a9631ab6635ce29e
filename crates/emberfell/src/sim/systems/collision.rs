//! Solid separation.
//!
//! ```text
//!   entity vs entity:  overlap = r1 + r2 - dist
//!                      both pushable -> split by the other's share of weight
//!                      one pushable  -> it takes the whole overlap
//!
//!   entity vs field:   inside  -> snap to nearest point + normal * r
//!                      touching -> slide out along nearest -> entity
//! ```
//!
//! Positions are written in place, so later pairs see earlier pushes.

use crate::sim::components::{Location, Solid};
use crate::sim::{squared, Simulation};
use emberfell_core::Entity;
use emberfell_shared::Point;

pub(super) fn resolve_solids(sim: &mut Simulation) {
    let solids: Vec<Entity> = sim.world.query::<(Solid, Location)>().collect();
    for &a in &solids {
        if sim.is_noclip(a) {
            continue;
        }
        for &b in &solids {
            if a == b || sim.is_noclip(b) {
                continue;
            }
            let (Some(solid_a), Some(solid_b)) = (
                sim.world.get::<Solid>(a).copied(),
                sim.world.get::<Solid>(b).copied(),
            ) else {
                continue;
            };
            if !solid_a.pushable && !solid_b.pushable {
                continue;
            }
            let (Some(at_a), Some(at_b)) = (sim.position(a), sim.position(b)) else {
                continue;
            };

            let distance = at_a.distance_squared(at_b);
            let contact = solid_a.radius + solid_b.radius;
            if distance >= squared(contact) {
                continue;
            }
            #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
            let overlap = contact - (distance as f64).sqrt() as i32;
            let angle = at_a.angle_to(at_b);

            let (force_a, force_b) = split_overlap(&solid_a, &solid_b, overlap);
            if force_a > 0 {
                move_to(sim, a, at_a.offset(angle + 180, force_a));
            }
            if force_b > 0 {
                move_to(sim, b, at_b.offset(angle, force_b));
            }
        }
    }
}

/// How much of `overlap` each side of a pair absorbs.
fn split_overlap(a: &Solid, b: &Solid, overlap: i32) -> (i32, i32) {
    match (a.pushable, b.pushable) {
        (true, true) => {
            let total = a.weight + b.weight;
            #[allow(clippy::cast_precision_loss)]
            let share = if total > 0 {
                b.weight as f32 / total as f32
            } else {
                0.5
            };
            #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
            let force_a = (share * overlap as f32).round() as i32;
            (force_a, overlap - force_a)
        }
        (true, false) => (overlap, 0),
        _ => (0, overlap),
    }
}

pub(super) fn resolve_field(sim: &mut Simulation) {
    let attempts = sim.config.tuning.field_resolve_attempts;
    for e in sim.world.query::<(Solid, Location)>() {
        if sim.is_noclip(e) {
            continue;
        }
        let Some(radius) = sim.world.get::<Solid>(e).map(|s| s.radius) else {
            continue;
        };
        for _ in 0..attempts {
            let Some(at) = sim.position(e) else {
                break;
            };
            let nearest = sim.field.find_nearest(at.x, at.y);
            let out = if nearest.is_inside || nearest.distance_squared == 0 {
                nearest.point.offset(nearest.normal, radius)
            } else if nearest.distance_squared < squared(radius) {
                nearest.point.offset(nearest.point.angle_to(at), radius)
            } else {
                break;
            };
            move_to(sim, e, out);
        }
    }
}

fn move_to(sim: &mut Simulation, e: Entity, to: Point) {
    if let Some(loc) = sim.world.get_mut::<Location>(e) {
        loc.x = to.x;
        loc.y = to.y;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::components::Cheats;
    use crate::sim::tests::test_sim;

    fn solid(sim: &mut Simulation, x: i32, y: i32, weight: i32, pushable: bool) -> Entity {
        let e = sim.spawn_named(x, y, "rock");
        sim.world.insert(
            e,
            Solid {
                radius: 8,
                weight,
                pushable,
            },
        );
        e
    }

    fn x(sim: &Simulation, e: Entity) -> i32 {
        sim.position(e).unwrap().x
    }

    #[test]
    fn test_equal_weights_split_evenly() {
        let mut sim = test_sim();
        let a = solid(&mut sim, 0, 0, 10, true);
        let b = solid(&mut sim, 10, 0, 10, true);
        resolve_solids(&mut sim);
        assert_eq!((x(&sim, a), x(&sim, b)), (-3, 13));
    }

    #[test]
    fn test_heavier_moves_less() {
        let mut sim = test_sim();
        let light = solid(&mut sim, 0, 0, 10, true);
        let heavy = solid(&mut sim, 10, 0, 30, true);
        resolve_solids(&mut sim);
        assert_eq!((x(&sim, light), x(&sim, heavy)), (-5, 11));
    }

    #[test]
    fn test_fixed_solid_pushes_whole_overlap() {
        let mut sim = test_sim();
        let wall = solid(&mut sim, 0, 0, 10, false);
        let mover = solid(&mut sim, 10, 0, 10, true);
        resolve_solids(&mut sim);
        assert_eq!((x(&sim, wall), x(&sim, mover)), (0, 16));

        let other = solid(&mut sim, 30, 0, 10, false);
        let before = x(&sim, other);
        resolve_solids(&mut sim);
        assert_eq!(x(&sim, other), before);
    }

    #[test]
    fn test_zero_weights_split_evenly() {
        let mut sim = test_sim();
        let a = solid(&mut sim, 0, 0, 0, true);
        let b = solid(&mut sim, 12, 0, 0, true);
        resolve_solids(&mut sim);
        assert_eq!((x(&sim, a), x(&sim, b)), (-2, 14));
    }

    #[test]
    fn test_noclip_passes_through() {
        let mut sim = test_sim();
        let a = solid(&mut sim, 0, 0, 10, true);
        let b = solid(&mut sim, 10, 0, 10, true);
        sim.world.insert(
            a,
            Cheats {
                god: false,
                noclip: true,
            },
        );
        resolve_solids(&mut sim);
        assert_eq!((x(&sim, a), x(&sim, b)), (0, 10));
    }

    #[test]
    fn test_field_pushes_out_of_walls() {
        let mut sim = test_sim();
        sim.field_mut().add_rect(0, 0, 1000, 1000);
        let inside = sim.spawn_named(500, 10, "hero");
        let grazing = sim.spawn_named(200, -100, "hero");
        let clear = sim.spawn_named(800, -300, "hero");
        resolve_field(&mut sim);

        assert_eq!(sim.position(inside), Some(Point::new(500, -128)));
        assert_eq!(sim.position(grazing), Some(Point::new(200, -128)));
        assert_eq!(sim.position(clear), Some(Point::new(800, -300)));
    }

    #[test]
    fn test_field_ignores_noclip() {
        let mut sim = test_sim();
        sim.field_mut().add_rect(0, 0, 1000, 1000);
        let ghost = sim.spawn_named(500, 500, "hero");
        sim.set_noclip_mode(ghost, crate::sim::Toggle::On);
        resolve_field(&mut sim);
        assert_eq!(sim.position(ghost), Some(Point::new(500, 500)));
    }
}
