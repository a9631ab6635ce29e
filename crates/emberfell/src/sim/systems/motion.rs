//! Applies accumulated motion.

use crate::sim::components::{Location, Motion};
use crate::sim::Simulation;

/// Records every entity's previous position, then moves those with pending
/// motion. Motion is consumed.
pub(super) fn integrate(sim: &mut Simulation) {
    for e in sim.world.query::<(Location,)>() {
        let motion = sim.world.get::<Motion>(e).copied();
        let Some(loc) = sim.world.get_mut::<Location>(e) else {
            continue;
        };
        loc.prevx = loc.x;
        loc.prevy = loc.y;
        if let Some(motion) = motion {
            loc.x += motion.dx;
            loc.y += motion.dy;
            sim.world.detach::<Motion>(e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::tests::test_sim;

    #[test]
    fn test_motion_moves_once() {
        let mut sim = test_sim();
        let e = sim.spawn_named(10, 20, "rock");
        sim.apply_motion(e, 5, -5);

        integrate(&mut sim);
        let loc = *sim.world.get::<Location>(e).unwrap();
        assert_eq!((loc.x, loc.y, loc.prevx, loc.prevy), (15, 15, 10, 20));
        assert!(!sim.world.has::<Motion>(e));

        integrate(&mut sim);
        let loc = *sim.world.get::<Location>(e).unwrap();
        assert_eq!((loc.x, loc.y, loc.prevx, loc.prevy), (15, 15, 15, 15));
    }
}
