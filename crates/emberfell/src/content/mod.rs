//! # Content Tables
//!
//! Read-only definition tables: prefabs, attacks, items, item types,
//! status effects, loot tables and animation durations.
//!
//! ```text
//! ┌────────────┐   next    ┌────────────┐
//! │  AttackDef │ ────────> │  AttackDef │
//! └────────────┘           └────────────┘
//!       ^ skills                 ^ default_attack
//! ┌────────────┐  items   ┌──────────────┐  loot_table  ┌────────────┐
//! │  ItemDef   │ <─────── │ LootTableDef │ <─────────── │ PrefabDef  │
//! └────────────┘          └──────────────┘              └────────────┘
//! ```
//!
//! Every cross-reference is a typed id resolved at load time. Sprite, sound
//! and particle names are interned, never validated: the presentation layer
//! owns those assets.

pub mod defs;
pub mod ids;
mod loader;

pub use defs::*;
pub use ids::*;
pub use loader::MAX_LOOT_ENTRIES;

use crate::error::{SimError, SimResult};
use std::path::Path;

/// Sound played on a critical hit.
pub const SOUND_CRIT: &str = "crit";
/// Sound played on a regular hit.
pub const SOUND_HIT: &str = "hit1";
/// Particles spawned on a critical hit.
pub const PARTICLES_CRIT: &str = "pt_crit";
/// Particles spawned when a roll starts.
pub const PARTICLES_ROLL: &str = "pt_dirtRoll";
/// Boss idle animation while stunned.
pub const ANIM_BOSS_IDLE: &str = "boss_idle";
/// Boss idle animation while invulnerable.
pub const ANIM_BOSS_IDLE_ACTIVE: &str = "boss_idle2";
/// Prefab spawned during the tentacle phase.
pub const PREFAB_TENTACLE: &str = "boss_spawn";
/// Prefab spawned during the minion phase.
pub const PREFAB_MINION: &str = "slime";
/// Prefab of a dropped item.
pub const PREFAB_ITEM_DROP: &str = "item_drop";
/// Prefab of a dropped gold coin.
pub const PREFAB_GOLD_DROP: &str = "crown_drop";

/// All definition tables of a game.
#[derive(Clone, Debug, Default)]
pub struct Content {
    pub(crate) prefabs: Vec<PrefabDef>,
    pub(crate) attacks: Vec<AttackDef>,
    pub(crate) items: Vec<ItemDef>,
    pub(crate) item_types: Vec<ItemTypeDef>,
    pub(crate) status_effects: Vec<StatusEffectDef>,
    pub(crate) loot_tables: Vec<LootTableDef>,
    pub(crate) animations: Vec<AnimationDef>,
    pub(crate) sprites: AssetTable<SpriteId>,
    pub(crate) sounds: AssetTable<SoundId>,
    pub(crate) particles: AssetTable<ParticlesId>,
}

fn find_by_name<T, I: From<usize>>(
    kind: &str,
    records: &[T],
    name: &str,
    record_name: impl Fn(&T) -> &str,
) -> Option<I> {
    let found = records.iter().position(|r| record_name(r) == name);
    if found.is_none() {
        tracing::warn!("couldn't find {kind} {name}");
    }
    found.map(I::from)
}

impl Content {
    /// Reads and resolves a TOML content file.
    ///
    /// # Errors
    ///
    /// [`SimError::Io`] if the file cannot be read, otherwise as
    /// [`Content::from_toml_str`].
    pub fn from_path(path: impl AsRef<Path>) -> SimResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| SimError::Io(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Interns the asset names the simulation itself emits.
    pub(crate) fn intern_builtin_assets(&mut self) {
        self.sounds.intern(SOUND_CRIT);
        self.sounds.intern(SOUND_HIT);
        self.particles.intern(PARTICLES_CRIT);
        self.particles.intern(PARTICLES_ROLL);
    }

    // =========================================================================
    // Prefabs
    // =========================================================================

    /// Looks up a prefab by name, warning if absent.
    #[must_use]
    pub fn find_prefab(&self, name: &str) -> Option<PrefabId> {
        find_by_name("prefab", &self.prefabs, name, |p| p.name.as_str())
    }

    /// Prefab record.
    #[inline]
    #[must_use]
    pub fn prefab(&self, id: PrefabId) -> Option<&PrefabDef> {
        self.prefabs.get(id.index())
    }

    /// Number of prefabs.
    #[must_use]
    pub fn prefab_count(&self) -> usize {
        self.prefabs.len()
    }

    // =========================================================================
    // Attacks
    // =========================================================================

    /// Looks up an attack by name, warning if absent.
    #[must_use]
    pub fn find_attack(&self, name: &str) -> Option<AttackId> {
        find_by_name("attack", &self.attacks, name, |a| a.name.as_str())
    }

    /// Attack record.
    #[inline]
    #[must_use]
    pub fn attack(&self, id: AttackId) -> Option<&AttackDef> {
        self.attacks.get(id.index())
    }

    // =========================================================================
    // Items
    // =========================================================================

    /// Looks up an item by name, warning if absent.
    #[must_use]
    pub fn find_item(&self, name: &str) -> Option<ItemId> {
        find_by_name("item", &self.items, name, |i| i.name.as_str())
    }

    /// Item record.
    #[inline]
    #[must_use]
    pub fn item(&self, id: ItemId) -> Option<&ItemDef> {
        self.items.get(id.index())
    }

    /// Stat bonus an item grants when equipped.
    ///
    /// Weapons grant atk, armor grants def and lck. Everything else is 0.
    #[must_use]
    pub fn item_stat(&self, item: Option<ItemId>, stat: Stat) -> i32 {
        let Some(def) = item.and_then(|id| self.item(id)) else {
            return 0;
        };
        match (def.category, stat) {
            (ItemCategory::Weapon, Stat::Atk) | (ItemCategory::Armor, Stat::Def) => def.power,
            (ItemCategory::Armor, Stat::Lck) => def.lck,
            _ => 0,
        }
    }

    /// Skill in slot `index` of a weapon.
    #[must_use]
    pub fn item_skill(&self, item: Option<ItemId>, index: usize) -> Option<AttackId> {
        let def = self.item(item?)?;
        if def.category != ItemCategory::Weapon {
            return None;
        }
        def.skills.get(index).copied().flatten()
    }

    /// Inventory icon of an item.
    #[must_use]
    pub fn item_icon(&self, item: Option<ItemId>) -> Option<SpriteId> {
        self.item(item?)?.icon
    }

    /// Item type record.
    #[must_use]
    pub fn item_type(&self, id: ItemTypeId) -> Option<&ItemTypeDef> {
        self.item_types.get(id.index())
    }

    // =========================================================================
    // Status effects
    // =========================================================================

    /// Looks up a status effect by name, warning if absent.
    #[must_use]
    pub fn find_status_effect(&self, name: &str) -> Option<StatusEffectId> {
        find_by_name("status effect", &self.status_effects, name, |s| s.name.as_str())
    }

    /// Status effect record.
    #[inline]
    #[must_use]
    pub fn status_effect(&self, id: StatusEffectId) -> Option<&StatusEffectDef> {
        self.status_effects.get(id.index())
    }

    /// Applies an active effect to a stat value.
    #[must_use]
    pub fn apply_status_stat(&self, effect: Option<StatusEffectId>, stat: Stat, value: i32) -> i32 {
        match effect.and_then(|id| self.status_effect(id)) {
            Some(def) if def.stat == stat => value + def.change,
            _ => value,
        }
    }

    // =========================================================================
    // Loot and animations
    // =========================================================================

    /// Looks up a loot table by name, warning if absent.
    #[must_use]
    pub fn find_loot_table(&self, name: &str) -> Option<LootTableId> {
        find_by_name("loot table", &self.loot_tables, name, |l| l.name.as_str())
    }

    /// Loot table record.
    #[inline]
    #[must_use]
    pub fn loot_table(&self, id: LootTableId) -> Option<&LootTableDef> {
        self.loot_tables.get(id.index())
    }

    /// Looks up an animation by name, warning if absent.
    #[must_use]
    pub fn find_animation(&self, name: &str) -> Option<AnimationId> {
        find_by_name("animation", &self.animations, name, |a| a.name.as_str())
    }

    /// Total ticks of an animation. 0 for none.
    #[must_use]
    pub fn animation_duration(&self, anim: Option<AnimationId>) -> i32 {
        anim.and_then(|id| self.animations.get(id.index()))
            .map_or(0, |a| a.duration)
    }

    // =========================================================================
    // Assets
    // =========================================================================

    /// Sprite names.
    #[must_use]
    pub fn sprites(&self) -> &AssetTable<SpriteId> {
        &self.sprites
    }

    /// Sound names.
    #[must_use]
    pub fn sounds(&self) -> &AssetTable<SoundId> {
        &self.sounds
    }

    /// Particle effect names.
    #[must_use]
    pub fn particles(&self) -> &AssetTable<ParticlesId> {
        &self.particles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_content_has_builtin_assets() {
        let content = Content::from_toml_str("").unwrap();
        assert!(content.sounds().find(SOUND_CRIT).is_some());
        assert!(content.sounds().find(SOUND_HIT).is_some());
        assert!(content.particles().find(PARTICLES_ROLL).is_some());
        assert_eq!(content.prefab_count(), 0);
    }

    #[test]
    fn test_missing_names_are_none() {
        let content = Content::default();
        assert_eq!(content.find_prefab("nothing"), None);
        assert_eq!(content.find_animation("nothing"), None);
        assert_eq!(content.animation_duration(None), 0);
        assert_eq!(content.item_stat(None, Stat::Atk), 0);
        assert_eq!(content.item_skill(None, 0), None);
    }

    #[test]
    fn test_apply_status_stat() {
        let content = Content::from_toml_str(
            "[[status_effects]]\nname = \"strength\"\nstat = \"atk\"\nchange = 3\n",
        )
        .unwrap();
        let strength = content.find_status_effect("strength");
        assert_eq!(content.apply_status_stat(strength, Stat::Atk, 5), 8);
        assert_eq!(content.apply_status_stat(strength, Stat::Def, 5), 5);
        assert_eq!(content.apply_status_stat(None, Stat::Atk, 5), 5);
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            Content::from_path("/nonexistent/content.toml"),
            Err(SimError::Io(_))
        ));
    }
}
