//! Prefab instantiation and drops.

use super::components::{
    Actor, Animation, Boss, Breakable, Cheats, DebugLabel, EnemyController, Hint, Intent,
    Interaction, ItemCollectible, Location, MiniInventory, Misc, PlayerController, Solid, Sprite,
    StateParams,
};
use super::Simulation;
use crate::content::{Controller, InteractionKind, ItemId, LootTableId, PrefabId};
use emberfell_core::Entity;
use emberfell_shared::Point;

impl Simulation {
    /// Instantiates a prefab at a world position.
    ///
    /// # Returns
    ///
    /// The new entity, or [`Entity::NULL`] if the prefab is unknown or the
    /// store is full.
    pub fn spawn(&mut self, x: i32, y: i32, prefab_id: PrefabId) -> Entity {
        let content = self.content.clone();
        let Some(prefab) = content.prefab(prefab_id) else {
            tracing::warn!("spawn of unknown prefab {prefab_id:?}");
            return Entity::NULL;
        };
        let e = self.world.create();
        if e.is_null() {
            return e;
        }

        let count = &mut self.spawn_counts[prefab_id.index()];
        *count += 1;
        let world = &mut self.world;
        world.insert(
            e,
            DebugLabel {
                name: format!("{}.{count}", prefab.name),
                prefab: Some(prefab_id),
            },
        );
        world.insert(
            e,
            Location::at(x + prefab.spawn_offset.x, y + prefab.spawn_offset.y),
        );

        if prefab.collectible {
            world.insert(
                e,
                ItemCollectible {
                    item: prefab.item,
                    is_gold: prefab.collect_gold,
                },
            );
        }
        if let Some(sprite) = prefab.sprite {
            world.insert(
                e,
                Sprite {
                    sprite: Some(sprite.sprite),
                    x: sprite.x,
                    y: sprite.y,
                    z: sprite.z,
                    bob: sprite.bob,
                    bob_duration: sprite.bob_duration,
                    bob_timer: 0,
                },
            );
        }
        if prefab.anims.idle.is_some() {
            world.insert(
                e,
                Animation {
                    set: prefab.anims,
                    ..Animation::default()
                },
            );
        }
        if prefab.interaction != InteractionKind::None {
            world.insert(
                e,
                Interaction {
                    kind: prefab.interaction,
                },
            );
        }
        if prefab.roll_speed != 0 || prefab.roll_duration != 0 || prefab.hurt_duration != 0 {
            world.insert(
                e,
                StateParams {
                    roll_speed: prefab.roll_speed,
                    roll_duration: prefab.roll_duration,
                    hurt_duration: prefab.hurt_duration,
                },
            );
        }
        if prefab.actor {
            world.insert(
                e,
                Actor {
                    lvl: prefab.lvl,
                    xp: prefab.xp,
                    faction: prefab.faction,
                    max_hp: prefab.max_hp,
                    hp: prefab.max_hp,
                    atk: prefab.atk,
                    def: prefab.def,
                    default_attack: prefab.default_attack,
                    move_speed: prefab.move_speed,
                },
            );
        }
        match prefab.controller {
            Controller::None => {}
            Controller::Player => {
                world.insert(e, PlayerController);
                world.insert(e, Intent::default());
                world.insert(e, Cheats::default());
            }
            Controller::Enemy => {
                world.insert(
                    e,
                    EnemyController {
                        alert_radius: prefab.alert_radius,
                        pathfinding: prefab.pathfinding,
                        target: None,
                    },
                );
                world.insert(e, Intent::default());
            }
            Controller::Boss => {
                world.insert(e, Boss::default());
                world.insert(e, Cheats::default());
            }
        }
        if prefab.breakable {
            world.insert(
                e,
                Breakable {
                    hits: prefab.break_hits,
                },
            );
        }
        if prefab.solid {
            world.insert(
                e,
                Solid {
                    radius: prefab.radius,
                    weight: prefab.weight,
                    pushable: prefab.pushable,
                },
            );
        }
        world.insert(
            e,
            Misc {
                loot_table: prefab.loot_table,
                sound_die: prefab.sound_die,
                particles_die: prefab.particles_die,
                harvested_sprite: prefab.harvested_sprite,
                tentacle: prefab.tentacle,
            },
        );
        if let Some(inv) = prefab.mini_inventory {
            world.insert(
                e,
                MiniInventory {
                    items: inv.items,
                    quantity: inv.quantity,
                    drop_on_destroy: inv.drop_on_destroy,
                },
            );
        }
        if let Some(hint) = &prefab.hint {
            world.insert(
                e,
                Hint {
                    text: hint.text.clone(),
                    radius: hint.radius,
                },
            );
        }
        e
    }

    /// Instantiates a prefab by name.
    ///
    /// # Returns
    ///
    /// [`Entity::NULL`] if no prefab has that name.
    pub fn spawn_named(&mut self, x: i32, y: i32, name: &str) -> Entity {
        match self.content.find_prefab(name) {
            Some(prefab) => self.spawn(x, y, prefab),
            None => Entity::NULL,
        }
    }

    /// Drops a collectible item.
    pub fn drop_item(&mut self, x: i32, y: i32, item: ItemId) -> Entity {
        let Some(prefab) = self.builtins.prefab_item_drop else {
            return Entity::NULL;
        };
        let e = self.spawn(x, y, prefab);
        let icon = self.content.item_icon(Some(item));
        if let Some(collectible) = self.world.get_or_attach::<ItemCollectible>(e) {
            collectible.item = Some(item);
        }
        if let Some(sprite) = self.world.get_or_attach::<Sprite>(e) {
            sprite.sprite = icon;
        }
        e
    }

    /// Drops `amount` gold pickups.
    pub fn drop_gold(&mut self, x: i32, y: i32, amount: i32) {
        let Some(prefab) = self.builtins.prefab_gold_drop else {
            return;
        };
        for _ in 0..amount {
            self.spawn(x, y, prefab);
        }
    }

    /// Rolls every entry of a loot table and drops the winners.
    pub fn drop_loot(&mut self, table: Option<LootTableId>, x: i32, y: i32) {
        let content = self.content.clone();
        let Some(table) = table.and_then(|id| content.loot_table(id)) else {
            return;
        };
        for entry in &table.entries {
            if self.roll(100) < entry.chance {
                for _ in 0..entry.quantity {
                    self.drop_item(x, y, entry.item);
                }
            }
        }
    }

    /// Drops the mini inventory of an entity about to be destroyed.
    pub(crate) fn drop_mini_inventory(&mut self, e: Entity, at: Point) {
        let Some(inv) = self.world.get::<MiniInventory>(e).copied() else {
            return;
        };
        if !inv.drop_on_destroy {
            return;
        }
        for (item, quantity) in inv.contents() {
            for _ in 0..quantity {
                self.drop_item(at.x, at.y, item);
            }
        }
    }

    /// Loot, death sound and death particles of a destroyed entity.
    pub(crate) fn drop_misc_payload(&mut self, misc: &Misc, at: Point) {
        self.drop_loot(misc.loot_table, at.x, at.y);
        self.play_sound(misc.sound_die);
        self.spawn_particles(misc.particles_die, at);
    }
}
