//! Player control: interaction partner, item pickup and input to intent.

use crate::content::InteractionKind;
use crate::input::{InputButton, InputState};
use crate::sim::components::{
    BeingCollected, Intent, IntentKind, Interaction, ItemCollectible, Location, PlayerController,
    Solid, Sprite,
};
use crate::sim::{squared, EntityState, Simulation};
use emberfell_core::Entity;

/// Axis magnitude below which the player counts as standing still.
const WALK_DEADZONE: f32 = 0.01;

pub(super) fn run(sim: &mut Simulation, input: &InputState) {
    for e in sim.world.query::<(Location, PlayerController)>() {
        let Some(at) = sim.position(e) else {
            continue;
        };

        if sim.state(e) == EntityState::Ready {
            sim.interaction_partner = find_interaction_partner(sim, e);
        }

        let reach = squared(sim.config.tuning.collect_radius);
        for item in sim.world.query::<(Location, ItemCollectible)>() {
            if sim.world.has::<BeingCollected>(item) {
                continue;
            }
            let Some(item_at) = sim.position(item) else {
                continue;
            };
            if at.distance_squared(item_at) > reach {
                continue;
            }
            begin_collect(sim, e, item);
        }

        let partner = sim.interaction_partner;
        if let Some(intent) = sim.world.get_mut::<Intent>(e) {
            *intent = intent_from_input(input, partner);
        }
    }
}

fn find_interaction_partner(sim: &Simulation, e: Entity) -> Option<Entity> {
    let at = sim.position(e)?;
    let reach = squared(sim.config.tuning.interaction_radius);
    sim.world
        .query::<(Location, Interaction)>()
        .find(|&other| {
            let offers = sim
                .world
                .get::<Interaction>(other)
                .is_some_and(|i| i.kind != InteractionKind::None);
            offers
                && sim
                    .position(other)
                    .is_some_and(|p| at.distance_squared(p) <= reach)
        })
}

fn begin_collect(sim: &mut Simulation, collector: Entity, item: Entity) {
    sim.world.insert(
        item,
        BeingCollected {
            collector: Some(collector),
            time: 0,
        },
    );
    sim.world.detach::<Solid>(item);
    if let Some(sprite) = sim.world.get_mut::<Sprite>(item) {
        sprite.y -= 4;
        sprite.z -= 4;
    }
}

/// Maps one tick of input onto a player intent.
///
/// Presses are checked in priority order: attack, skills 1 to 3, interact,
/// roll. Without a press the intent is walk if the axis is outside the
/// deadzone. The direction is always the raw axis, normalized for rolls.
#[must_use]
pub fn intent_from_input(input: &InputState, partner: Option<Entity>) -> Intent {
    let axis = input.axis;
    let mut intent = Intent {
        kind: IntentKind::None,
        direction: axis,
        partner: None,
        attack_kind: 0,
    };

    let skills = [
        (InputButton::Attack, 0),
        (InputButton::Skill1, 1),
        (InputButton::Skill2, 2),
        (InputButton::Skill3, 3),
    ];
    if let Some(&(_, kind)) = skills.iter().find(|(button, _)| input.pressed(*button)) {
        intent.kind = IntentKind::Attack;
        intent.attack_kind = kind;
    } else if input.pressed(InputButton::Interact) {
        intent.kind = IntentKind::Interact;
        intent.partner = partner;
    } else if input.pressed(InputButton::Roll) {
        intent.kind = IntentKind::Roll;
        intent.direction = axis.normalized();
    } else if axis.x.abs() > WALK_DEADZONE || axis.y.abs() > WALK_DEADZONE {
        intent.kind = IntentKind::Walk;
    }
    intent
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::tests::test_sim;
    use emberfell_shared::Vec2;

    fn input(axis: (f32, f32), buttons: &[InputButton]) -> InputState {
        let mut input = InputState::new();
        input.set_axis(axis.0, axis.1);
        for &button in buttons {
            input.button_down(button);
        }
        input
    }

    #[test]
    fn test_attack_beats_everything() {
        let intent = intent_from_input(
            &input(
                (1.0, 0.0),
                &[InputButton::Roll, InputButton::Skill2, InputButton::Attack],
            ),
            None,
        );
        assert_eq!(intent.kind, IntentKind::Attack);
        assert_eq!(intent.attack_kind, 0);
        assert_eq!(intent.direction, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_skill_kinds() {
        let intent = intent_from_input(&input((0.0, 0.0), &[InputButton::Skill3]), None);
        assert_eq!(intent.kind, IntentKind::Attack);
        assert_eq!(intent.attack_kind, 3);
    }

    #[test]
    fn test_interact_carries_partner() {
        let partner = Some(Entity::NULL);
        let intent = intent_from_input(&input((0.0, 0.0), &[InputButton::Interact]), partner);
        assert_eq!(intent.kind, IntentKind::Interact);
        assert_eq!(intent.partner, partner);
    }

    #[test]
    fn test_roll_normalizes() {
        let intent = intent_from_input(&input((3.0, 4.0), &[InputButton::Roll]), None);
        assert_eq!(intent.kind, IntentKind::Roll);
        assert!((intent.direction.x - 0.6).abs() < 1e-6);
        assert!((intent.direction.y - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_walk_deadzone() {
        let idle = intent_from_input(&input((0.005, -0.01), &[]), None);
        assert_eq!(idle.kind, IntentKind::None);
        assert_eq!(idle.direction, Vec2::new(0.005, -0.01));

        let walk = intent_from_input(&input((0.0, -0.5), &[]), None);
        assert_eq!(walk.kind, IntentKind::Walk);
    }

    #[test]
    fn test_partner_found_within_reach() {
        let mut sim = test_sim();
        let hero = sim.spawn_named(0, 0, "hero");
        let post = sim.spawn_named(256, 0, "rock");
        sim.world.insert(
            post,
            Interaction {
                kind: InteractionKind::Talk,
            },
        );
        assert_eq!(find_interaction_partner(&sim, hero), Some(post));

        if let Some(loc) = sim.world.get_mut::<Location>(post) {
            loc.x = 257;
        }
        assert_eq!(find_interaction_partner(&sim, hero), None);
    }

    #[test]
    fn test_nearby_items_start_collecting() {
        let mut sim = test_sim();
        let hero = sim.spawn_named(0, 0, "hero");
        let near = sim.spawn_named(100, 100, "rock");
        let far = sim.spawn_named(1000, 0, "rock");
        for item in [near, far] {
            sim.world.insert(item, ItemCollectible::default());
            sim.world.insert(item, Sprite::default());
        }

        run(&mut sim, &InputState::new());

        let collecting = sim.world.get::<BeingCollected>(near).unwrap();
        assert_eq!(collecting.collector, Some(hero));
        assert_eq!(sim.world.get::<Sprite>(near).unwrap().y, -4);
        assert!(!sim.world.has::<BeingCollected>(far));
    }
}
