//! Shake jitter and launch decay.

use crate::sim::components::{Launch, Shake, Sprite};
use crate::sim::Simulation;
use emberfell_shared::{angle_length_x, angle_length_y};

/// Fraction of the remaining launch spent each tick.
const LAUNCH_DECAY: f32 = 0.2;

pub(super) fn run_shake(sim: &mut Simulation) {
    for e in sim.world.query::<(Shake, Sprite)>() {
        let Some(shake) = sim.world.get_mut::<Shake>(e) else {
            continue;
        };
        shake.timer -= 1;
        let timer = shake.timer;
        if timer <= 0 {
            sim.world.detach::<Shake>(e);
            continue;
        }
        if let Some(sprite) = sim.world.get_mut::<Sprite>(e) {
            match timer % 6 {
                1 => sprite.x -= 1,
                5 => sprite.x += 1,
                _ => {}
            }
        }
    }
}

pub(super) fn run_launch(sim: &mut Simulation) {
    for e in sim.world.query::<(Launch,)>() {
        let Some(launch) = sim.world.get_mut::<Launch>(e) else {
            continue;
        };
        if launch.launch <= 0 {
            sim.world.detach::<Launch>(e);
            continue;
        }
        #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
        let delta = (launch.launch as f32 * LAUNCH_DECAY).ceil() as i32;
        launch.launch -= delta;
        let angle = launch.angle;
        sim.apply_motion(e, angle_length_x(angle, delta), angle_length_y(angle, delta));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::components::Motion;
    use crate::sim::tests::test_sim;

    #[test]
    fn test_shake_jitters_and_settles() {
        let mut sim = test_sim();
        let e = sim.spawn_named(0, 0, "rock");
        sim.world.insert(e, Sprite::default());
        sim.shake(e, 1);

        let mut offsets = Vec::new();
        for _ in 0..8 {
            run_shake(&mut sim);
            offsets.push(sim.world.get::<Sprite>(e).unwrap().x);
        }
        assert_eq!(offsets, vec![-1, -1, 0, 0, 0, 0, -1, -1]);
        assert!(!sim.world.has::<Shake>(e));
    }

    #[test]
    fn test_launch_spends_everything() {
        let mut sim = test_sim();
        let e = sim.spawn_named(0, 0, "rock");
        sim.world.insert(
            e,
            Launch {
                launch: 100,
                angle: 0,
            },
        );

        let mut ticks = 0;
        while sim.world.has::<Launch>(e) {
            run_launch(&mut sim);
            ticks += 1;
            assert!(ticks < 100);
        }
        assert_eq!(sim.world.get::<Motion>(e), Some(&Motion { dx: 100, dy: 0 }));
    }

    #[test]
    fn test_launch_decay_rounds_up() {
        let mut sim = test_sim();
        let e = sim.spawn_named(0, 0, "rock");
        sim.world.insert(e, Launch { launch: 3, angle: 270 });
        run_launch(&mut sim);
        assert_eq!(sim.world.get::<Launch>(e).unwrap().launch, 2);
        assert_eq!(sim.world.get::<Motion>(e), Some(&Motion { dx: 0, dy: 1 }));
    }
}
