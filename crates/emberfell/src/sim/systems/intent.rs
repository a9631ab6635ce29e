//! Intent resolution: turns controller intents into motion, facing and
//! state changes.

use crate::content::{EquipSlot, Facing, InteractionKind};
use crate::events::GameEvent;
use crate::sim::components::{
    Actor, AnimState, Animation, AttackState, Intent, IntentKind, Interaction, Location,
    MiniInventory, Misc, PlayerController, RollingState, Sprite,
};
use crate::sim::{EntityState, Simulation};
use emberfell_core::Entity;
use emberfell_shared::Vec2;

/// Loot from a harvest lands this far below the harvested entity.
const HARVEST_DROP_OFFSET: i32 = 64;

pub(super) fn run(sim: &mut Simulation) {
    for e in sim.world.query::<(Intent, Actor)>() {
        let (Some(intent), Some(actor)) = (
            sim.world.get::<Intent>(e).copied(),
            sim.world.get::<Actor>(e).copied(),
        ) else {
            continue;
        };

        match sim.state(e) {
            EntityState::Ready => resolve_ready(sim, e, &intent, &actor),
            EntityState::Attack => match intent.kind {
                IntentKind::Attack => queue_next_attack(sim, e),
                IntentKind::Roll => start_roll(sim, e, intent.direction),
                _ => {}
            },
            EntityState::Hurt | EntityState::Rolling | EntityState::Alert => {}
        }
    }
}

fn resolve_ready(sim: &mut Simulation, e: Entity, intent: &Intent, actor: &Actor) {
    if !intent.direction.is_zero() {
        #[allow(clippy::cast_precision_loss)]
        let step = intent.direction.scaled_trunc(actor.move_speed as f32);
        sim.apply_motion(e, step.x, step.y);
    }

    match intent.kind {
        IntentKind::Attack => {
            let attack = if intent.attack_kind == 0 {
                actor.default_attack
            } else if sim.world.has::<PlayerController>(e) {
                let weapon = sim.equipment.get(EquipSlot::Weapon);
                sim.content
                    .item_skill(weapon, usize::from(intent.attack_kind - 1))
            } else {
                None
            };
            if let Some(attack) = attack {
                sim.change_state(e, EntityState::Attack);
                if let Some(state) = sim.world.get_mut::<AttackState>(e) {
                    state.attack = Some(attack);
                }
            }
        }
        IntentKind::Interact => {
            if let Some(partner) = intent.partner {
                interact(sim, partner);
            }
        }
        IntentKind::Roll => {
            if !intent.direction.is_zero() {
                start_roll(sim, e, intent.direction);
            }
        }
        IntentKind::Walk => {
            sim.set_anim_state(e, AnimState::Walking);
            if let Some(anim) = sim.world.get_mut::<Animation>(e) {
                anim.facing = facing_toward(intent.direction);
            }
        }
        IntentKind::None => sim.set_anim_state(e, AnimState::Idle),
    }
}

/// Facing closest to a direction. Horizontal wins ties.
fn facing_toward(direction: Vec2) -> Facing {
    if direction.x.abs() >= direction.y.abs() {
        if direction.x > 0.0 {
            Facing::Right
        } else {
            Facing::Left
        }
    } else if direction.y > 0.0 {
        Facing::Down
    } else {
        Facing::Up
    }
}

fn queue_next_attack(sim: &mut Simulation, e: Entity) {
    let content = sim.content.clone();
    if let Some(state) = sim.world.get_mut::<AttackState>(e) {
        if let Some(current) = state.attack.and_then(|id| content.attack(id)) {
            state.queued = current.next;
        }
    }
}

fn start_roll(sim: &mut Simulation, e: Entity, direction: Vec2) {
    let direction = direction.normalized();
    sim.change_state(e, EntityState::Rolling);
    if let Some(roll) = sim.world.get_mut::<RollingState>(e) {
        #[allow(clippy::cast_precision_loss)]
        let velocity = direction.scaled_trunc(roll.speed as f32);
        roll.velocity = velocity;
    }
}

fn interact(sim: &mut Simulation, partner: Entity) {
    let Some(kind) = sim.world.get::<Interaction>(partner).map(|i| i.kind) else {
        return;
    };
    match kind {
        InteractionKind::None | InteractionKind::Lift => {}
        InteractionKind::Debug => {
            tracing::debug!("interact with {}", sim.debug_name(partner));
        }
        InteractionKind::Talk => sim.emit(GameEvent::Dialog {
            entity: partner,
            villager: sim.villager(partner),
        }),
        InteractionKind::Craft => sim.emit(GameEvent::CraftingOpened { entity: partner }),
        InteractionKind::Shop => sim.emit(GameEvent::ShopOpened { entity: partner }),
        InteractionKind::Chest => {
            tracing::debug!("chest content:");
            if let Some(inv) = sim.world.get::<MiniInventory>(partner) {
                for (item, quantity) in inv.contents() {
                    let name = sim
                        .content
                        .item(item)
                        .map_or("?", |def| def.display_name.as_str());
                    tracing::debug!("  - {name} ({quantity}x)");
                }
            }
            sim.emit(GameEvent::ChestOpened { entity: partner });
        }
        InteractionKind::Harvest => harvest(sim, partner),
    }
}

fn harvest(sim: &mut Simulation, partner: Entity) {
    let (Some(misc), Some(at)) = (
        sim.world.get::<Misc>(partner).copied(),
        sim.world.get::<Location>(partner).map(Location::point),
    ) else {
        return;
    };
    sim.drop_loot(misc.loot_table, at.x, at.y + HARVEST_DROP_OFFSET);
    sim.world.detach::<Interaction>(partner);
    if let (Some(sprite), Some(harvested)) = (
        sim.world.get_mut::<Sprite>(partner),
        misc.harvested_sprite,
    ) {
        sprite.sprite = Some(harvested);
    }
}
