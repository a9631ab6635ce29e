//! Resolved definition records. Every cross-reference is a typed id.

use super::ids::{
    AnimationId, AttackId, ItemId, ItemTypeId, LootTableId, ParticlesId, SoundId, SpriteId,
    StatusEffectId,
};
use emberfell_shared::Point;
use serde::{Deserialize, Serialize};

/// Maximum item slots in a mini inventory.
pub const MINI_INVENTORY_SLOTS: usize = 16;

/// Skill slots on a weapon.
pub const SKILL_SLOTS: usize = 3;

/// Direction an entity faces. Indexes directional animation sets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facing {
    /// Facing -x
    Left,
    /// Facing +x
    #[default]
    Right,
    /// Facing -y on screen
    Up,
    /// Facing +y on screen
    Down,
}

impl Facing {
    /// Slot in a directional animation set.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Left => 0,
            Self::Right => 1,
            Self::Up => 2,
            Self::Down => 3,
        }
    }

    /// Angle of this facing in degrees.
    #[inline]
    #[must_use]
    pub const fn angle(self) -> i32 {
        match self {
            Self::Left => 180,
            Self::Right => 0,
            Self::Up => 90,
            Self::Down => 270,
        }
    }
}

/// Character statistic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stat {
    /// Attack
    Atk,
    /// Defense
    Def,
    /// Magic
    Mag,
    /// Resistance
    Res,
    /// Luck
    Lck,
}

/// Equipment slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipSlot {
    /// Held weapon
    Weapon,
    /// Head armor
    Head,
    /// Body armor
    Body,
    /// Trinket
    Accessory,
}

impl EquipSlot {
    /// Every slot, in storage order.
    pub const ALL: [Self; 4] = [Self::Weapon, Self::Head, Self::Body, Self::Accessory];

    /// Storage index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Weapon => 0,
            Self::Head => 1,
            Self::Body => 2,
            Self::Accessory => 3,
        }
    }
}

/// What happens when the player interacts with an entity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    /// Not interactable
    #[default]
    None,
    /// Logs the entity
    Debug,
    /// Can be picked up
    Lift,
    /// Opens dialog
    Talk,
    /// Opens the crafting screen
    Craft,
    /// Opens a chest
    Chest,
    /// Drops loot once and changes sprite
    Harvest,
    /// Opens a shop
    Shop,
}

/// Which controller a prefab spawns with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Controller {
    /// Inert
    #[default]
    None,
    /// Driven by player input
    Player,
    /// Driven by enemy AI
    Enemy,
    /// Driven by the boss script
    Boss,
}

/// Broad item grouping that decides which properties an item has.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemCategory {
    /// Adds atk, grants skills
    Weapon,
    /// Adds def and lck
    Armor,
    /// Restores hp
    Food,
    /// Crafting input
    Ingredient,
    /// Applies a status effect
    Potion,
    /// Anything else
    #[default]
    Misc,
}

/// A named animation and its total length in ticks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnimationDef {
    /// Table name
    pub name: String,
    /// Sum of frame durations
    pub duration: i32,
}

/// An attack move.
#[derive(Clone, Debug, PartialEq)]
pub struct AttackDef {
    /// Table name
    pub name: String,
    /// Ticks until the attack state ends
    pub duration: i32,
    /// Tick on which targets are hit
    pub hit_delay: i32,
    /// Weapon family, for presentation
    pub weapon_class: i32,
    /// Hits same-faction actors too
    pub friendly_fire: bool,
    /// Hits every target in range instead of the first
    pub aoe: bool,
    /// Reach in world units
    pub range: i32,
    /// Added to the attacker's atk
    pub damage: i32,
    /// Fraction of move speed kept after the hit
    pub move_factor: f32,
    /// Hits targets behind the attacker too
    pub surround: bool,
    /// Launch applied to hit targets
    pub knockback: i32,
    /// Launch applied to the attacker
    pub launch: i32,
    /// Played on the first tick
    pub sound: Option<SoundId>,
    /// Chained when attack is pressed again mid-swing
    pub next: Option<AttackId>,
    /// Freeze frames on a connecting hit
    pub hitstop: i32,
}

/// An item category record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItemTypeDef {
    /// Table name
    pub name: String,
    /// Property grouping
    pub category: ItemCategory,
}

/// An item.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItemDef {
    /// Table name
    pub name: String,
    /// Shown to players
    pub display_name: String,
    /// Shown to players
    pub description: String,
    /// Item type record
    pub item_type: Option<ItemTypeId>,
    /// Category of the item type
    pub category: ItemCategory,
    /// Inventory and drop sprite
    pub icon: Option<SpriteId>,
    /// Shop price, -1 if unsellable
    pub price: i32,
    /// atk for weapons, def for armor
    pub power: i32,
    /// Slot for armor
    pub equip: Option<EquipSlot>,
    /// Luck for armor
    pub lck: i32,
    /// HP restored by food
    pub heal: i32,
    /// Effect applied by potions
    pub effect: Option<StatusEffectId>,
    /// Skills granted by weapons
    pub skills: [Option<AttackId>; SKILL_SLOTS],
}

/// A timed stat modifier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusEffectDef {
    /// Table name
    pub name: String,
    /// Modified stat
    pub stat: Stat,
    /// Added to the stat while active
    pub change: i32,
    /// HUD icon
    pub icon: Option<SpriteId>,
}

/// One roll of a loot table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LootEntry {
    /// Dropped item
    pub item: ItemId,
    /// Percent chance, 0 to 100
    pub chance: i32,
    /// Copies dropped on success
    pub quantity: i32,
}

/// A list of independent drop rolls.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LootTableDef {
    /// Table name
    pub name: String,
    /// Rolled in order
    pub entries: Vec<LootEntry>,
}

/// One animation per facing, indexed by [`Facing::index`].
pub type DirectionalAnims = [Option<AnimationId>; 4];

/// Animations of a prefab.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AnimationSet {
    /// Fallback for every state
    pub idle: Option<AnimationId>,
    /// Walking
    pub walk: DirectionalAnims,
    /// Attacking
    pub attack: DirectionalAnims,
    /// Hurt
    pub hurt: DirectionalAnims,
    /// Rolling
    pub roll: DirectionalAnims,
    /// Alerted
    pub alert: DirectionalAnims,
}

/// Sprite placement of a prefab.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpriteDef {
    /// Sprite asset
    pub sprite: SpriteId,
    /// Draw offset x
    pub x: i32,
    /// Draw offset y
    pub y: i32,
    /// Draw offset z
    pub z: i32,
    /// Bob amplitude
    pub bob: i32,
    /// Bob period in ticks
    pub bob_duration: i32,
}

/// Starting contents of a mini inventory.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MiniInventoryDef {
    /// Items per slot
    pub items: [Option<ItemId>; MINI_INVENTORY_SLOTS],
    /// Quantity per slot
    pub quantity: [i32; MINI_INVENTORY_SLOTS],
    /// Drop contents when the owner is destroyed
    pub drop_on_destroy: bool,
}

/// Proximity hint text.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HintDef {
    /// Shown while the player is near
    pub text: String,
    /// Reach in world units
    pub radius: i32,
}

/// An entity template.
#[derive(Clone, Debug, PartialEq)]
pub struct PrefabDef {
    /// Table name
    pub name: String,
    /// Has combat stats
    pub actor: bool,
    /// Collides with other solids and the field
    pub solid: bool,
    /// Moved by solid pushback
    pub pushable: bool,
    /// Share of pushback taken
    pub weight: i32,
    /// Walk speed in units per tick
    pub move_speed: i32,
    /// Added to the spawn position
    pub spawn_offset: Point,
    /// Controlling system
    pub controller: Controller,
    /// Collision radius in world units
    pub radius: i32,
    /// Starting level
    pub lvl: i32,
    /// Starting experience
    pub xp: i32,
    /// Actors of the same faction don't hurt each other
    pub faction: i32,
    /// Starting and maximum hp
    pub max_hp: i32,
    /// Base attack
    pub atk: i32,
    /// Base defense
    pub def: i32,
    /// Attack used with no weapon skill
    pub default_attack: Option<AttackId>,
    /// Hurt state length, -1 to use the hurt animation length
    pub hurt_duration: i32,
    /// Enemy wake-up distance in world units
    pub alert_radius: i32,
    /// Enemy uses the navgrid
    pub pathfinding: bool,
    /// Interaction offered to the player
    pub interaction: InteractionKind,
    /// Destroyed after a number of hits instead of taking damage
    pub breakable: bool,
    /// Hits a breakable takes
    pub break_hits: i32,
    /// Roll speed in units per tick
    pub roll_speed: i32,
    /// Roll length in ticks
    pub roll_duration: i32,
    /// Can be picked up
    pub collectible: bool,
    /// Item granted on pickup
    pub item: Option<ItemId>,
    /// Grants gold on pickup
    pub collect_gold: bool,
    /// Dropped on destruction
    pub loot_table: Option<LootTableId>,
    /// Played on destruction
    pub sound_die: Option<SoundId>,
    /// Spawned on destruction
    pub particles_die: Option<ParticlesId>,
    /// Sprite after harvesting
    pub harvested_sprite: Option<SpriteId>,
    /// Counts toward the boss stun waves
    pub tentacle: bool,
    /// Starting mini inventory
    pub mini_inventory: Option<MiniInventoryDef>,
    /// Proximity hint
    pub hint: Option<HintDef>,
    /// Sprite placement
    pub sprite: Option<SpriteDef>,
    /// Animations
    pub anims: AnimationSet,
}
