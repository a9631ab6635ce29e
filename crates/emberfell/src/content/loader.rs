//! TOML content documents and their two-phase resolution.
//!
//! ```text
//!   TOML text ──parse──> Raw* tables (names) ──resolve──> Content (typed ids)
//! ```
//!
//! Tables may reference each other in any order, so every table's names are
//! indexed before any reference is resolved. Distances are authored in
//! pixels and scaled to world units here.

use super::defs::{
    AnimationDef, AnimationSet, AttackDef, Controller, DirectionalAnims, EquipSlot, HintDef,
    InteractionKind, ItemCategory, ItemDef, ItemTypeDef, LootEntry, LootTableDef,
    MiniInventoryDef, PrefabDef, SpriteDef, Stat, StatusEffectDef, MINI_INVENTORY_SLOTS,
    SKILL_SLOTS,
};
use super::ids::{AnimationId, AttackId, ItemId, ItemTypeId, LootTableId, StatusEffectId};
use super::Content;
use crate::error::{SimError, SimResult};
use emberfell_shared::constants::pixels;
use emberfell_shared::Point;
use serde::Deserialize;
use std::collections::HashMap;

/// Maximum rolls per loot table.
pub const MAX_LOOT_ENTRIES: usize = 16;

/// A field that accepts one name or a list of names.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    fn into_vec(self) -> Vec<String> {
        match self {
            Self::One(name) => vec![name],
            Self::Many(names) => names,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawContent {
    animations: Vec<RawAnimation>,
    attacks: Vec<RawAttack>,
    item_types: Vec<RawItemType>,
    items: Vec<RawItem>,
    status_effects: Vec<RawStatusEffect>,
    loot_tables: Vec<RawLootTable>,
    prefabs: Vec<RawPrefab>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawAnimation {
    name: String,
    duration: Option<i32>,
    frames: Vec<i32>,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawAttack {
    name: String,
    duration: i32,
    hit_delay: i32,
    weapon_class: i32,
    friendly_fire: bool,
    aoe: bool,
    range: i32,
    damage: i32,
    move_factor: f32,
    surround: bool,
    knockback: i32,
    launch: i32,
    sound: Option<String>,
    next: Option<String>,
    hitstop: i32,
}

impl Default for RawAttack {
    fn default() -> Self {
        Self {
            name: String::new(),
            duration: 24,
            hit_delay: 9,
            weapon_class: 0,
            friendly_fire: false,
            aoe: false,
            range: 16,
            damage: 0,
            move_factor: 0.0,
            surround: false,
            knockback: 0,
            launch: 0,
            sound: None,
            next: None,
            hitstop: 0,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawItemType {
    name: String,
    category: ItemCategory,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawItem {
    name: String,
    display_name: Option<String>,
    desc: Option<String>,
    #[serde(rename = "type")]
    item_type: Option<String>,
    icon: Option<String>,
    price: i32,
    atk: i32,
    def: i32,
    equip: Option<EquipSlot>,
    lck: i32,
    hp: i32,
    effect: Option<String>,
    skills: Vec<String>,
}

impl Default for RawItem {
    fn default() -> Self {
        Self {
            name: String::new(),
            display_name: None,
            desc: None,
            item_type: None,
            icon: None,
            price: -1,
            atk: 5,
            def: 5,
            equip: None,
            lck: 0,
            hp: 5,
            effect: None,
            skills: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawStatusEffect {
    name: String,
    stat: Stat,
    change: i32,
    icon: Option<String>,
}

impl Default for RawStatusEffect {
    fn default() -> Self {
        Self {
            name: String::new(),
            stat: Stat::Atk,
            change: 0,
            icon: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawLootTable {
    name: String,
    items: Vec<String>,
    chance: Vec<i32>,
    quantity: Vec<i32>,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawPrefab {
    name: String,
    controller: Controller,
    solid: bool,
    actor: bool,
    pushable: Option<bool>,
    weight: i32,
    move_speed: i32,
    spawn_x_offs: i32,
    spawn_y_offs: i32,
    radius: i32,
    interaction: InteractionKind,
    lvl: i32,
    xp: i32,
    faction: i32,
    hp: i32,
    atk: i32,
    def: i32,
    default_attack: Option<String>,
    hurt_duration: i32,
    alert_radius: i32,
    pathfinding: bool,
    breakable: bool,
    break_hits: i32,
    roll_speed: i32,
    roll_duration: i32,
    collectible: bool,
    collect_gold: bool,
    item: Option<String>,
    loot_table: Option<String>,
    sound_die: Option<String>,
    particles_die: Option<String>,
    harvested_sprite: Option<String>,
    tentacle: bool,
    sprite: Option<String>,
    sprite_x: i32,
    sprite_y: i32,
    sprite_z: i32,
    sprite_bob: i32,
    bob_duration: i32,
    anim_idle: Option<String>,
    anim_walk: Option<OneOrMany>,
    anim_attack: Option<OneOrMany>,
    anim_hurt: Option<OneOrMany>,
    anim_roll: Option<OneOrMany>,
    anim_alert: Option<OneOrMany>,
    hint_text: Option<String>,
    hint_radius: i32,
    inv_items: Vec<String>,
    inv_qty: Vec<i32>,
    drop_inv_on_destroy: bool,
}

impl Default for RawPrefab {
    fn default() -> Self {
        Self {
            name: String::new(),
            controller: Controller::None,
            solid: true,
            actor: false,
            pushable: None,
            weight: 10,
            move_speed: 20,
            spawn_x_offs: 0,
            spawn_y_offs: 0,
            radius: 8,
            interaction: InteractionKind::None,
            lvl: 0,
            xp: 0,
            faction: 0,
            hp: 10,
            atk: 0,
            def: 0,
            default_attack: None,
            hurt_duration: -1,
            alert_radius: 0,
            pathfinding: false,
            breakable: false,
            break_hits: 1,
            roll_speed: 1,
            roll_duration: 1,
            collectible: false,
            collect_gold: false,
            item: None,
            loot_table: None,
            sound_die: None,
            particles_die: None,
            harvested_sprite: None,
            tentacle: false,
            sprite: None,
            sprite_x: 0,
            sprite_y: 0,
            sprite_z: 0,
            sprite_bob: 0,
            bob_duration: 120,
            anim_idle: None,
            anim_walk: None,
            anim_attack: None,
            anim_hurt: None,
            anim_roll: None,
            anim_alert: None,
            hint_text: None,
            hint_radius: 0,
            inv_items: Vec::new(),
            inv_qty: Vec::new(),
            drop_inv_on_destroy: false,
        }
    }
}

/// Name to index lookup for one table.
struct NameIndex {
    kind: &'static str,
    map: HashMap<String, usize>,
}

impl NameIndex {
    fn build<'a>(kind: &'static str, names: impl Iterator<Item = &'a str>) -> SimResult<Self> {
        let mut map = HashMap::new();
        for (i, name) in names.enumerate() {
            if name.is_empty() {
                return Err(SimError::InvalidContent(format!("{kind} #{i} has no name")));
            }
            if map.insert(name.to_owned(), i).is_some() {
                return Err(SimError::InvalidContent(format!("duplicate {kind} '{name}'")));
            }
        }
        Ok(Self { kind, map })
    }

    fn resolve<I: From<usize>>(&self, name: &str) -> SimResult<I> {
        self.map
            .get(name)
            .map(|&i| I::from(i))
            .ok_or_else(|| SimError::UnknownReference {
                kind: self.kind,
                name: name.to_owned(),
            })
    }

    fn resolve_opt<I: From<usize>>(&self, name: Option<&String>) -> SimResult<Option<I>> {
        name.map(|n| self.resolve(n)).transpose()
    }
}

/// Indices of every table, built before any reference is resolved.
struct Indices {
    animations: NameIndex,
    attacks: NameIndex,
    item_types: NameIndex,
    items: NameIndex,
    status_effects: NameIndex,
    loot_tables: NameIndex,
}

impl Content {
    /// Parses and resolves a TOML content document.
    ///
    /// # Errors
    ///
    /// - [`SimError::InvalidContent`] on malformed TOML, unnamed or
    ///   duplicate records
    /// - [`SimError::UnknownReference`] when a record names a missing record
    pub fn from_toml_str(text: &str) -> SimResult<Self> {
        let raw: RawContent =
            toml::from_str(text).map_err(|e| SimError::InvalidContent(e.to_string()))?;
        resolve(raw)
    }
}

fn resolve(raw: RawContent) -> SimResult<Content> {
    let indices = Indices {
        animations: NameIndex::build("animation", raw.animations.iter().map(|r| r.name.as_str()))?,
        attacks: NameIndex::build("attack", raw.attacks.iter().map(|r| r.name.as_str()))?,
        item_types: NameIndex::build("item type", raw.item_types.iter().map(|r| r.name.as_str()))?,
        items: NameIndex::build("item", raw.items.iter().map(|r| r.name.as_str()))?,
        status_effects: NameIndex::build("status effect", raw.status_effects.iter().map(|r| r.name.as_str()))?,
        loot_tables: NameIndex::build("loot table", raw.loot_tables.iter().map(|r| r.name.as_str()))?,
    };
    NameIndex::build("prefab", raw.prefabs.iter().map(|r| r.name.as_str()))?;

    let mut content = Content::default();

    for animation in raw.animations {
        let duration = animation
            .duration
            .unwrap_or_else(|| animation.frames.iter().sum());
        content.animations.push(AnimationDef {
            name: animation.name,
            duration,
        });
    }

    for attack in raw.attacks {
        let def = AttackDef {
            sound: attack.sound.as_deref().map(|s| content.sounds.intern(s)),
            next: indices.attacks.resolve_opt(attack.next.as_ref())?,
            name: attack.name,
            duration: attack.duration,
            hit_delay: attack.hit_delay,
            weapon_class: attack.weapon_class,
            friendly_fire: attack.friendly_fire,
            aoe: attack.aoe,
            range: pixels(attack.range),
            damage: attack.damage,
            move_factor: attack.move_factor,
            surround: attack.surround,
            knockback: pixels(attack.knockback),
            launch: pixels(attack.launch),
            hitstop: attack.hitstop,
        };
        content.attacks.push(def);
    }

    for item_type in raw.item_types {
        content.item_types.push(ItemTypeDef {
            name: item_type.name,
            category: item_type.category,
        });
    }

    for effect in raw.status_effects {
        content.status_effects.push(StatusEffectDef {
            icon: effect.icon.as_deref().map(|s| content.sprites.intern(s)),
            name: effect.name,
            stat: effect.stat,
            change: effect.change,
        });
    }

    for item in raw.items {
        let def = resolve_item(item, &indices, &mut content)?;
        content.items.push(def);
    }

    for table in raw.loot_tables {
        let def = resolve_loot_table(table, &indices)?;
        content.loot_tables.push(def);
    }

    for prefab in raw.prefabs {
        let def = resolve_prefab(prefab, &indices, &mut content)?;
        content.prefabs.push(def);
    }

    content.intern_builtin_assets();
    Ok(content)
}

fn resolve_item(item: RawItem, indices: &Indices, content: &mut Content) -> SimResult<ItemDef> {
    let item_type: Option<ItemTypeId> = indices.item_types.resolve_opt(item.item_type.as_ref())?;
    let category = item_type
        .and_then(|t| content.item_types.get(t.index()))
        .map_or(ItemCategory::Misc, |t| t.category);

    let mut def = ItemDef {
        display_name: item.display_name.unwrap_or_else(|| item.name.clone()),
        description: item.desc.unwrap_or_else(|| "No description.".to_owned()),
        item_type,
        category,
        icon: item.icon.as_deref().map(|s| content.sprites.intern(s)),
        price: item.price,
        power: 0,
        equip: None,
        lck: 0,
        heal: 0,
        effect: None,
        skills: [None; SKILL_SLOTS],
        name: item.name,
    };

    match category {
        ItemCategory::Weapon => {
            def.power = item.atk;
            if item.skills.len() > SKILL_SLOTS {
                tracing::warn!("item {} lists more than {SKILL_SLOTS} skills", def.name);
            }
            for (slot, name) in def.skills.iter_mut().zip(&item.skills) {
                *slot = Some(indices.attacks.resolve::<AttackId>(name)?);
            }
        }
        ItemCategory::Armor => {
            def.power = item.def;
            def.equip = item.equip;
            def.lck = item.lck;
        }
        ItemCategory::Food => def.heal = item.hp,
        ItemCategory::Potion => {
            def.effect = indices
                .status_effects
                .resolve_opt::<StatusEffectId>(item.effect.as_ref())?;
        }
        ItemCategory::Ingredient | ItemCategory::Misc => {}
    }
    Ok(def)
}

fn resolve_loot_table(table: RawLootTable, indices: &Indices) -> SimResult<LootTableDef> {
    if table.items.len() > MAX_LOOT_ENTRIES {
        tracing::warn!("loot table {} has more than {MAX_LOOT_ENTRIES} items", table.name);
    }
    if !table.chance.is_empty() && table.chance.len() != table.items.len() {
        tracing::warn!("chance count doesn't match item count in {}", table.name);
    }
    if !table.quantity.is_empty() && table.quantity.len() != table.items.len() {
        tracing::warn!("quantity count doesn't match item count in {}", table.name);
    }

    let mut entries = Vec::with_capacity(table.items.len().min(MAX_LOOT_ENTRIES));
    for (i, name) in table.items.iter().take(MAX_LOOT_ENTRIES).enumerate() {
        entries.push(LootEntry {
            item: indices.items.resolve::<ItemId>(name)?,
            chance: table.chance.get(i).copied().unwrap_or(100),
            quantity: table.quantity.get(i).copied().unwrap_or(1),
        });
    }
    Ok(LootTableDef {
        name: table.name,
        entries,
    })
}

/// Expands 1, 2 or 4 names to one per facing: left, right, up, down.
///
/// Two names are horizontal then vertical.
fn resolve_directions(
    prefab: &str,
    names: Option<OneOrMany>,
    index: &NameIndex,
) -> SimResult<DirectionalAnims> {
    let Some(names) = names else {
        return Ok([None; 4]);
    };
    let ids = names
        .into_vec()
        .iter()
        .map(|n| index.resolve::<AnimationId>(n))
        .collect::<SimResult<Vec<_>>>()?;
    Ok(match ids.as_slice() {
        [all] => [Some(*all); 4],
        [horizontal, vertical] => [
            Some(*horizontal),
            Some(*horizontal),
            Some(*vertical),
            Some(*vertical),
        ],
        [left, right, up, down] => [Some(*left), Some(*right), Some(*up), Some(*down)],
        _ => {
            tracing::warn!("expected 1, 2 or 4 animations in prefab {prefab}");
            [None; 4]
        }
    })
}

fn resolve_prefab(
    prefab: RawPrefab,
    indices: &Indices,
    content: &mut Content,
) -> SimResult<PrefabDef> {
    let name = prefab.name;

    let anims = AnimationSet {
        idle: indices.animations.resolve_opt(prefab.anim_idle.as_ref())?,
        walk: resolve_directions(&name, prefab.anim_walk, &indices.animations)?,
        attack: resolve_directions(&name, prefab.anim_attack, &indices.animations)?,
        hurt: resolve_directions(&name, prefab.anim_hurt, &indices.animations)?,
        roll: resolve_directions(&name, prefab.anim_roll, &indices.animations)?,
        alert: resolve_directions(&name, prefab.anim_alert, &indices.animations)?,
    };

    let mini_inventory = if prefab.inv_items.is_empty() && !prefab.drop_inv_on_destroy {
        None
    } else {
        if prefab.inv_items.len() > MINI_INVENTORY_SLOTS {
            tracing::warn!("prefab {name} lists more than {MINI_INVENTORY_SLOTS} items");
        }
        let mut inv = MiniInventoryDef {
            items: [None; MINI_INVENTORY_SLOTS],
            quantity: [1; MINI_INVENTORY_SLOTS],
            drop_on_destroy: prefab.drop_inv_on_destroy,
        };
        for (slot, item) in inv.items.iter_mut().zip(&prefab.inv_items) {
            *slot = Some(indices.items.resolve::<ItemId>(item)?);
        }
        for (slot, &qty) in inv.quantity.iter_mut().zip(&prefab.inv_qty) {
            *slot = qty;
        }
        Some(inv)
    };

    let hint = (prefab.hint_radius > 0).then(|| HintDef {
        text: prefab.hint_text.clone().unwrap_or_default(),
        radius: pixels(prefab.hint_radius),
    });

    let sprite = prefab.sprite.as_deref().map(|s| SpriteDef {
        sprite: content.sprites.intern(s),
        x: prefab.sprite_x,
        y: prefab.sprite_y,
        z: prefab.sprite_z,
        bob: prefab.sprite_bob,
        bob_duration: prefab.bob_duration,
    });

    Ok(PrefabDef {
        actor: prefab.actor,
        solid: prefab.solid,
        pushable: prefab.pushable.unwrap_or(prefab.actor),
        weight: prefab.weight,
        move_speed: prefab.move_speed,
        spawn_offset: Point::new(pixels(prefab.spawn_x_offs), pixels(prefab.spawn_y_offs)),
        controller: prefab.controller,
        radius: pixels(prefab.radius),
        lvl: prefab.lvl,
        xp: prefab.xp,
        faction: prefab.faction,
        max_hp: prefab.hp,
        atk: prefab.atk,
        def: prefab.def,
        default_attack: indices.attacks.resolve_opt(prefab.default_attack.as_ref())?,
        hurt_duration: prefab.hurt_duration,
        alert_radius: pixels(prefab.alert_radius),
        pathfinding: prefab.pathfinding,
        interaction: prefab.interaction,
        breakable: prefab.breakable,
        break_hits: prefab.break_hits,
        roll_speed: prefab.roll_speed,
        roll_duration: prefab.roll_duration,
        collectible: prefab.collectible,
        item: indices.items.resolve_opt(prefab.item.as_ref())?,
        collect_gold: prefab.collect_gold,
        loot_table: indices
            .loot_tables
            .resolve_opt::<LootTableId>(prefab.loot_table.as_ref())?,
        sound_die: prefab.sound_die.as_deref().map(|s| content.sounds.intern(s)),
        particles_die: prefab
            .particles_die
            .as_deref()
            .map(|s| content.particles.intern(s)),
        harvested_sprite: prefab
            .harvested_sprite
            .as_deref()
            .map(|s| content.sprites.intern(s)),
        tentacle: prefab.tentacle,
        mini_inventory,
        hint,
        sprite,
        anims,
        name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"
        [[animations]]
        name = "slime_idle"
        frames = [10, 10, 10]

        [[animations]]
        name = "slime_hop_side"
        duration = 20

        [[animations]]
        name = "slime_hop_vert"
        duration = 24

        [[attacks]]
        name = "combo2"
        damage = 3
        knockback = 4

        [[attacks]]
        name = "combo1"
        next = "combo2"
        sound = "swing"

        [[item_types]]
        name = "sword"
        category = "weapon"

        [[item_types]]
        name = "hat"
        category = "armor"

        [[items]]
        name = "bronze_sword"
        type = "sword"
        atk = 4
        skills = ["combo1"]

        [[items]]
        name = "cap"
        type = "hat"
        equip = "head"
        lck = 2

        [[loot_tables]]
        name = "slime_loot"
        items = ["cap", "bronze_sword"]
        chance = [50]

        [[prefabs]]
        name = "slime"
        actor = true
        controller = "enemy"
        radius = 6
        anim_idle = "slime_idle"
        anim_walk = ["slime_hop_side", "slime_hop_vert"]
        loot_table = "slime_loot"
        inv_items = ["cap"]
    "#;

    #[test]
    fn test_resolves_forward_references() {
        let content = Content::from_toml_str(DOC).unwrap();
        let combo1 = content.find_attack("combo1").unwrap();
        let combo2 = content.find_attack("combo2").unwrap();
        let attack = content.attack(combo1).unwrap();
        assert_eq!(attack.next, Some(combo2));
        assert_eq!(attack.duration, 24);
        assert_eq!(attack.hit_delay, 9);
        assert_eq!(attack.range, 256);
        assert_eq!(content.attack(combo2).unwrap().knockback, 64);
    }

    #[test]
    fn test_prefab_defaults_and_scaling() {
        let content = Content::from_toml_str(DOC).unwrap();
        let slime = content.prefab(content.find_prefab("slime").unwrap()).unwrap();
        assert_eq!(slime.radius, 96);
        assert!(slime.solid);
        assert!(slime.pushable);
        assert_eq!(slime.weight, 10);
        assert_eq!(slime.move_speed, 20);
        assert_eq!(slime.max_hp, 10);
        assert_eq!(slime.hurt_duration, -1);
        assert_eq!(slime.break_hits, 1);

        let side = content.find_animation("slime_hop_side");
        let vert = content.find_animation("slime_hop_vert");
        assert_eq!(slime.anims.walk, [side, side, vert, vert]);
        assert_eq!(content.animation_duration(slime.anims.idle), 30);

        let inv = slime.mini_inventory.unwrap();
        assert_eq!(inv.items[0], content.find_item("cap"));
        assert_eq!(inv.items[1], None);
        assert_eq!(inv.quantity[0], 1);
    }

    #[test]
    fn test_loot_table_defaults() {
        let content = Content::from_toml_str(DOC).unwrap();
        let table = content
            .loot_table(content.find_loot_table("slime_loot").unwrap())
            .unwrap();
        assert_eq!(table.entries.len(), 2);
        assert_eq!(table.entries[0].chance, 50);
        assert_eq!(table.entries[1].chance, 100);
        assert_eq!(table.entries[1].quantity, 1);
    }

    #[test]
    fn test_item_properties_follow_category() {
        let content = Content::from_toml_str(DOC).unwrap();
        let sword = content.find_item("bronze_sword").unwrap();
        let cap = content.find_item("cap").unwrap();
        assert_eq!(content.item_stat(Some(sword), Stat::Atk), 4);
        assert_eq!(content.item_stat(Some(sword), Stat::Def), 0);
        assert_eq!(content.item_stat(Some(cap), Stat::Def), 5);
        assert_eq!(content.item_stat(Some(cap), Stat::Lck), 2);
        assert_eq!(content.item_skill(Some(sword), 0), content.find_attack("combo1"));
        assert_eq!(content.item_skill(Some(sword), 1), None);
    }

    #[test]
    fn test_unknown_reference() {
        let err = Content::from_toml_str(
            r#"
            [[prefabs]]
            name = "ghost"
            default_attack = "boo"
            "#,
        )
        .unwrap_err();
        assert_eq!(
            err,
            SimError::UnknownReference {
                kind: "attack",
                name: "boo".into()
            }
        );
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let err = Content::from_toml_str(
            "[[attacks]]\nname = \"a\"\n[[attacks]]\nname = \"a\"\n",
        )
        .unwrap_err();
        assert!(matches!(err, SimError::InvalidContent(_)));
    }

    #[test]
    fn test_malformed_document() {
        assert!(matches!(
            Content::from_toml_str("[[prefabs]]\nradius = \"big\"\n"),
            Err(SimError::InvalidContent(_))
        ));
    }
}
