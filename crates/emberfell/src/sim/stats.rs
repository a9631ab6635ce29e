//! Derived combat stats, equipment, health and status effects.

use super::components::{Actor, Cheats, PlayerController, StatusEffects};
use super::Simulation;
use crate::content::{EquipSlot, ItemId, Stat, StatusEffectId};
use emberfell_core::Entity;

/// Items the player has equipped, one per [`EquipSlot`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Equipment {
    slots: [Option<ItemId>; 4],
}

impl Equipment {
    /// Item in a slot.
    #[inline]
    #[must_use]
    pub fn get(&self, slot: EquipSlot) -> Option<ItemId> {
        self.slots[slot.index()]
    }

    /// Equips or clears a slot.
    #[inline]
    pub fn set(&mut self, slot: EquipSlot, item: Option<ItemId>) {
        self.slots[slot.index()] = item;
    }
}

/// Switch argument for the debug cheats.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Toggle {
    /// Enable
    On,
    /// Disable
    Off,
    /// Invert the current value
    Flip,
}

impl Toggle {
    fn apply(self, value: &mut bool) {
        *value = match self {
            Self::On => true,
            Self::Off => false,
            Self::Flip => !*value,
        };
    }
}

impl Simulation {
    /// Effective value of a stat.
    ///
    /// Base atk and def come from the actor. The player adds equipment:
    /// weapon atk, head and body def, accessory lck. Active status effects
    /// apply last.
    ///
    /// # Returns
    ///
    /// 0 for entities without an [`Actor`].
    #[must_use]
    pub fn stat(&self, e: Entity, stat: Stat) -> i32 {
        let Some(actor) = self.world.get::<Actor>(e) else {
            return 0;
        };
        let mut value = match stat {
            Stat::Atk => actor.atk,
            Stat::Def => actor.def,
            _ => 0,
        };

        if self.world.has::<PlayerController>(e) {
            let gear: &[EquipSlot] = match stat {
                Stat::Atk => &[EquipSlot::Weapon],
                Stat::Def => &[EquipSlot::Head, EquipSlot::Body],
                Stat::Lck => &[EquipSlot::Accessory],
                Stat::Mag | Stat::Res => &[],
            };
            for &slot in gear {
                value += self.content.item_stat(self.equipment.get(slot), stat);
            }
        }

        if let Some(effects) = self.world.get::<StatusEffects>(e) {
            for slot in effects.slots.iter().filter(|s| s.remaining != 0) {
                value = self.content.apply_status_stat(slot.effect, stat, value);
            }
        }
        value
    }

    /// Starts a status effect in the first free slot.
    ///
    /// Does nothing if all slots are taken.
    pub fn add_status_effect(&mut self, e: Entity, effect: StatusEffectId) {
        let duration = self.config.tuning.status_effect_duration;
        let Some(effects) = self.world.get_or_attach::<StatusEffects>(e) else {
            return;
        };
        if let Some(slot) = effects.slots.iter_mut().find(|s| s.remaining == 0) {
            slot.effect = Some(effect);
            slot.remaining = duration;
        } else {
            tracing::debug!("no free status effect slot");
        }
    }

    /// Effect active in slot `index`.
    #[must_use]
    pub fn status_effect(&self, e: Entity, index: usize) -> Option<StatusEffectId> {
        let slot = self.world.get::<StatusEffects>(e)?.slots.get(index)?;
        if slot.remaining == 0 {
            return None;
        }
        slot.effect
    }

    /// Restores hp up to the maximum.
    ///
    /// # Returns
    ///
    /// `false` if the entity has no [`Actor`] or is already at full hp.
    pub fn heal(&mut self, e: Entity, amount: i32) -> bool {
        let Some(actor) = self.world.get_mut::<Actor>(e) else {
            return false;
        };
        if actor.hp == actor.max_hp {
            return false;
        }
        actor.hp = actor.max_hp.min(actor.hp + amount);
        true
    }

    /// Current hp, 0 without an [`Actor`].
    #[must_use]
    pub fn hp(&self, e: Entity) -> i32 {
        self.world.get::<Actor>(e).map_or(0, |a| a.hp)
    }

    /// Maximum hp, 0 without an [`Actor`].
    #[must_use]
    pub fn max_hp(&self, e: Entity) -> i32 {
        self.world.get::<Actor>(e).map_or(0, |a| a.max_hp)
    }

    /// Sets hp directly. Does not destroy the entity at 0.
    pub fn set_hp(&mut self, e: Entity, hp: i32) {
        if let Some(actor) = self.world.get_mut::<Actor>(e) {
            actor.hp = hp;
        }
    }

    /// Switches god mode, attaching [`Cheats`] if needed.
    pub fn set_god_mode(&mut self, e: Entity, toggle: Toggle) {
        if let Some(cheats) = self.world.get_or_attach::<Cheats>(e) {
            toggle.apply(&mut cheats.god);
        }
    }

    /// Switches collision off or on, attaching [`Cheats`] if needed.
    pub fn set_noclip_mode(&mut self, e: Entity, toggle: Toggle) {
        if let Some(cheats) = self.world.get_or_attach::<Cheats>(e) {
            toggle.apply(&mut cheats.noclip);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::content::Content;

    const DOC: &str = r#"
        [[item_types]]
        name = "sword"
        category = "weapon"

        [[item_types]]
        name = "armor"
        category = "armor"

        [[items]]
        name = "sword"
        type = "sword"
        atk = 4

        [[items]]
        name = "helm"
        type = "armor"
        equip = "head"
        def = 2

        [[items]]
        name = "mail"
        type = "armor"
        equip = "body"
        def = 3

        [[items]]
        name = "charm"
        type = "armor"
        equip = "accessory"
        def = 0
        lck = 6

        [[status_effects]]
        name = "might"
        stat = "atk"
        change = 10

        [[status_effects]]
        name = "frail"
        stat = "def"
        change = -1

        [[prefabs]]
        name = "hero"
        actor = true
        controller = "player"
        atk = 1
        def = 1
        hp = 20

        [[prefabs]]
        name = "grunt"
        actor = true
        atk = 1
        def = 1

        [[prefabs]]
        name = "post"
    "#;

    fn sim() -> Simulation {
        let content = Content::from_toml_str(DOC).unwrap();
        Simulation::new(SimConfig::default(), content).unwrap()
    }

    fn equip_all(sim: &mut Simulation) {
        for (slot, name) in [
            (EquipSlot::Weapon, "sword"),
            (EquipSlot::Head, "helm"),
            (EquipSlot::Body, "mail"),
            (EquipSlot::Accessory, "charm"),
        ] {
            let item = sim.content().find_item(name);
            sim.equipment_mut().set(slot, item);
        }
    }

    #[test]
    fn test_equipment_counts_for_player_only() {
        let mut sim = sim();
        equip_all(&mut sim);
        let hero = sim.spawn_named(0, 0, "hero");
        let grunt = sim.spawn_named(0, 0, "grunt");

        assert_eq!(sim.stat(hero, Stat::Atk), 5);
        assert_eq!(sim.stat(hero, Stat::Def), 6);
        assert_eq!(sim.stat(hero, Stat::Lck), 6);
        assert_eq!(sim.stat(hero, Stat::Mag), 0);

        assert_eq!(sim.stat(grunt, Stat::Atk), 1);
        assert_eq!(sim.stat(grunt, Stat::Def), 1);
        assert_eq!(sim.stat(grunt, Stat::Lck), 0);
    }

    #[test]
    fn test_stat_without_actor_is_zero() {
        let mut sim = sim();
        let post = sim.spawn_named(0, 0, "post");
        assert_eq!(sim.stat(post, Stat::Atk), 0);
        assert_eq!(sim.hp(post), 0);
        assert!(!sim.heal(post, 5));
    }

    #[test]
    fn test_status_effects_modify_stats() {
        let mut sim = sim();
        let grunt = sim.spawn_named(0, 0, "grunt");
        let might = sim.content().find_status_effect("might").unwrap();
        let frail = sim.content().find_status_effect("frail").unwrap();

        sim.add_status_effect(grunt, might);
        sim.add_status_effect(grunt, frail);
        assert_eq!(sim.stat(grunt, Stat::Atk), 11);
        assert_eq!(sim.stat(grunt, Stat::Def), 0);
        assert_eq!(sim.status_effect(grunt, 0), Some(might));
        assert_eq!(sim.status_effect(grunt, 1), Some(frail));
        assert_eq!(sim.status_effect(grunt, 2), None);
        assert_eq!(sim.status_effect(grunt, 9), None);
    }

    #[test]
    fn test_status_slots_fill_up() {
        let mut sim = sim();
        let grunt = sim.spawn_named(0, 0, "grunt");
        let might = sim.content().find_status_effect("might").unwrap();
        for _ in 0..6 {
            sim.add_status_effect(grunt, might);
        }
        assert_eq!(sim.stat(grunt, Stat::Atk), 41);
    }

    #[test]
    fn test_heal_clamps() {
        let mut sim = sim();
        let hero = sim.spawn_named(0, 0, "hero");
        assert!(!sim.heal(hero, 5));
        sim.set_hp(hero, 12);
        assert!(sim.heal(hero, 5));
        assert_eq!(sim.hp(hero), 17);
        assert!(sim.heal(hero, 50));
        assert_eq!(sim.hp(hero), sim.max_hp(hero));
    }

    #[test]
    fn test_cheat_toggles() {
        let mut sim = sim();
        let post = sim.spawn_named(0, 0, "post");
        sim.set_god_mode(post, Toggle::On);
        assert!(sim.is_invincible(post));
        sim.set_god_mode(post, Toggle::Flip);
        assert!(!sim.is_invincible(post));

        sim.set_noclip_mode(post, Toggle::Flip);
        assert!(sim.is_noclip(post));
        sim.set_noclip_mode(post, Toggle::Off);
        assert!(!sim.is_noclip(post));
    }
}
