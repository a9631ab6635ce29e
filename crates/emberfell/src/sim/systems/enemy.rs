//! Chase-and-attack enemy AI.
//!
//! An enemy with an alert radius wakes when the player comes close, then
//! walks toward its target and attacks once inside its default attack's
//! range. Far targets use the navgrid if the enemy can path; targets past
//! the forget distance are dropped.

use crate::sim::components::{Actor, EnemyController, Intent, IntentKind, PathSpeed, Pathfinding};
use crate::sim::{squared, EntityState, Simulation};
use emberfell_shared::Vec2;

pub(super) fn run(sim: &mut Simulation) {
    let tuning = sim.config.tuning;
    for e in sim.world.query::<(EnemyController,)>() {
        let state = sim.state(e);
        let (Some(actor), Some(mut ai), Some(at)) = (
            sim.world.get::<Actor>(e).copied(),
            sim.world.get::<EnemyController>(e).copied(),
            sim.position(e),
        ) else {
            continue;
        };
        if !sim.world.has::<Intent>(e) {
            continue;
        }

        if ai.alert_radius > 0 && ai.target.is_none() && state == EntityState::Ready {
            let player = sim.player().and_then(|p| Some((p, sim.position(p)?)));
            if let Some((player, player_at)) = player {
                if at.distance_squared(player_at) <= squared(ai.alert_radius) {
                    ai.target = Some(player);
                    sim.change_state(e, EntityState::Alert);
                }
            }
        }

        let mut intent = Intent::default();
        let mut path_to = None;

        if let Some(target) = ai.target {
            match sim.position(target) {
                None => ai.target = None,
                Some(target_at) => {
                    let distance = at.distance_squared(target_at);
                    let range = actor
                        .default_attack
                        .and_then(|id| sim.content.attack(id))
                        .map_or(0, |a| a.range);

                    if distance <= squared(range) {
                        if state != EntityState::Attack {
                            intent.kind = IntentKind::Attack;
                        }
                    } else {
                        intent.kind = IntentKind::Walk;
                    }

                    if distance > squared(tuning.enemy_forget_distance) {
                        ai.target = None;
                        sim.world.detach::<Pathfinding>(e);
                    } else if ai.pathfinding
                        && intent.kind == IntentKind::Walk
                        && distance > squared(tuning.enemy_path_distance)
                    {
                        path_to = Some(target_at);
                    } else {
                        intent.direction = Vec2::between(at, target_at).normalized();
                    }
                }
            }
        }

        sim.world.insert(e, ai);
        if let Some(current) = sim.world.get_mut::<Intent>(e) {
            *current = intent;
        }
        if let Some(goal) = path_to {
            sim.set_path(e, goal.x, goal.y, PathSpeed::AiDriven);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::content::Content;
    use crate::sim::components::Location;
    use crate::tiles::TileGrid;
    use emberfell_core::Entity;

    const DOC: &str = r#"
        [[attacks]]
        name = "bite"
        range = 4

        [[prefabs]]
        name = "hero"
        actor = true
        controller = "player"

        [[prefabs]]
        name = "slime"
        actor = true
        controller = "enemy"
        default_attack = "bite"
        alert_radius = 20

        [[prefabs]]
        name = "hound"
        actor = true
        controller = "enemy"
        default_attack = "bite"
        alert_radius = 200
        pathfinding = true
    "#;

    fn sim() -> Simulation {
        Simulation::new(SimConfig::default(), Content::from_toml_str(DOC).unwrap()).unwrap()
    }

    fn intent(sim: &Simulation, e: Entity) -> Intent {
        *sim.world.get::<Intent>(e).unwrap()
    }

    fn target(sim: &Simulation, e: Entity) -> Option<Entity> {
        sim.world.get::<EnemyController>(e).unwrap().target
    }

    #[test]
    fn test_alerts_inside_radius_only() {
        let mut sim = sim();
        let hero = sim.spawn_named(0, 0, "hero");
        let near = sim.spawn_named(320, 0, "slime");
        let far = sim.spawn_named(321, 0, "slime");

        run(&mut sim);

        assert_eq!(target(&sim, near), Some(hero));
        assert_eq!(sim.state(near), EntityState::Alert);
        assert_eq!(target(&sim, far), None);
        assert_eq!(sim.state(far), EntityState::Ready);
        assert_eq!(intent(&sim, far).kind, IntentKind::None);
    }

    #[test]
    fn test_walks_toward_target_outside_range() {
        let mut sim = sim();
        let hero = sim.spawn_named(0, 0, "hero");
        let slime = sim.spawn_named(0, 300, "slime");
        run(&mut sim);
        assert_eq!(target(&sim, slime), Some(hero));

        let walk = intent(&sim, slime);
        assert_eq!(walk.kind, IntentKind::Walk);
        assert_eq!(walk.direction, Vec2::new(0.0, -1.0));
    }

    #[test]
    fn test_attacks_inside_range() {
        let mut sim = sim();
        sim.spawn_named(0, 0, "hero");
        let slime = sim.spawn_named(64, 0, "slime");
        run(&mut sim);
        assert_eq!(intent(&sim, slime).kind, IntentKind::Attack);

        sim.change_state(slime, EntityState::Attack);
        run(&mut sim);
        assert_eq!(intent(&sim, slime).kind, IntentKind::None);
    }

    #[test]
    fn test_forgets_far_or_missing_target() {
        let mut sim = sim();
        let hero = sim.spawn_named(0, 0, "hero");
        let slime = sim.spawn_named(100, 0, "slime");
        run(&mut sim);
        assert_eq!(target(&sim, slime), Some(hero));

        sim.world.get_mut::<Location>(slime).unwrap().x = 240 * 16 + 1;
        run(&mut sim);
        assert_eq!(target(&sim, slime), None);

        sim.world.get_mut::<EnemyController>(slime).unwrap().target = Some(hero);
        sim.destroy(hero);
        run(&mut sim);
        assert_eq!(target(&sim, slime), None);
    }

    #[test]
    fn test_far_pathfinder_sets_route() {
        let mut sim = sim();
        sim.load_region(&TileGrid::new(16, 4)).unwrap();
        sim.spawn_named(128, 128, "hero");
        let hound = sim.spawn_named(10 * 256 + 128, 128, "hound");
        run(&mut sim);

        let path = sim.world.get::<Pathfinding>(hound).unwrap();
        assert_eq!(path.speed, PathSpeed::AiDriven);
        assert_eq!(path.waypoints[0].x, 10);
        assert_eq!(intent(&sim, hound).kind, IntentKind::Walk);
        assert!(intent(&sim, hound).direction.is_zero());
    }
}
