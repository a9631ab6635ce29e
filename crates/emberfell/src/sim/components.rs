//! # Simulation Components
//!
//! Every component the simulation attaches. All of them are plain data with
//! a zero-ish `Default`, which is the row state right after an attach.
//!
//! ```text
//! spatial     Location  Motion  Solid  Launch
//! combat      Actor  Intent  StateParams  Breakable  Cheats
//! states      AttackState | HurtState | RollingState | AlertState
//! control     PlayerController  EnemyController  Pathfinding  Boss
//! items       ItemCollectible  BeingCollected  MiniInventory
//! cosmetic    Sprite  Animation  Shake
//! misc        Interaction  DebugLabel  Misc  Hint  Villager  StatusEffects
//! ```

use crate::content::{
    AnimationId, AnimationSet, AttackId, Facing, InteractionKind, ItemId, LootTableId,
    ParticlesId, PrefabId, SoundId, SpriteId, StatusEffectId, VillagerId, MINI_INVENTORY_SLOTS,
};
use emberfell_core::{Component, Entity, StoreResult, World};
use emberfell_shared::{Point, Vec2};

/// Number of concurrent status effects per entity.
pub const STATUS_EFFECT_SLOTS: usize = 4;

// =============================================================================
// Spatial
// =============================================================================

/// World position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Location {
    /// X in world units
    pub x: i32,
    /// Y in world units
    pub y: i32,
    /// Height above ground, for pickups and throws
    pub zoff: i32,
    /// X before this tick's motion
    pub prevx: i32,
    /// Y before this tick's motion
    pub prevy: i32,
}

impl Location {
    /// Location at a point, with no prior motion.
    #[must_use]
    pub const fn at(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            zoff: 0,
            prevx: x,
            prevy: y,
        }
    }

    /// Current position.
    #[inline]
    #[must_use]
    pub const fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Motion accumulated this tick, applied and removed at integration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Motion {
    /// Pending x delta
    pub dx: i32,
    /// Pending y delta
    pub dy: i32,
}

/// Circle collider.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Solid {
    /// Radius in world units
    pub radius: i32,
    /// Pushback share against other pushables
    pub weight: i32,
    /// Moved by pushback
    pub pushable: bool,
}

/// Decaying impulse along an angle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Launch {
    /// Remaining distance
    pub launch: i32,
    /// Direction in degrees
    pub angle: i32,
}

// =============================================================================
// Combat
// =============================================================================

/// Combat statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Actor {
    /// Level
    pub lvl: i32,
    /// Experience toward the next level
    pub xp: i32,
    /// Same-faction actors don't hurt each other
    pub faction: i32,
    /// Maximum hp
    pub max_hp: i32,
    /// Current hp
    pub hp: i32,
    /// Base attack
    pub atk: i32,
    /// Base defense
    pub def: i32,
    /// Attack used for a plain attack intent
    pub default_attack: Option<AttackId>,
    /// Walk speed in units per tick
    pub move_speed: i32,
}

/// What a controller wants to do this tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IntentKind {
    /// Stand still
    #[default]
    None,
    /// Move along the intent direction
    Walk,
    /// Start or chain an attack
    Attack,
    /// Interact with the intent partner
    Interact,
    /// Dodge roll along the intent direction
    Roll,
}

/// Controller output, consumed by intent resolution.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Intent {
    /// Requested action
    pub kind: IntentKind,
    /// Move or roll direction
    pub direction: Vec2,
    /// Interaction target
    pub partner: Option<Entity>,
    /// 0 for the default attack, 1 to 3 for weapon skills
    pub attack_kind: u8,
}

/// Per-entity tuning copied into state components on entry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StateParams {
    /// Roll speed
    pub roll_speed: i32,
    /// Roll length in ticks
    pub roll_duration: i32,
    /// Hurt length in ticks, -1 to use the hurt animation
    pub hurt_duration: i32,
}

/// Destroyed after a number of hits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Breakable {
    /// Hits left
    pub hits: i32,
}

/// Debug switches.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Cheats {
    /// Ignore all hits
    pub god: bool,
    /// Skip collision
    pub noclip: bool,
}

// =============================================================================
// States
// =============================================================================

/// Swinging an attack.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AttackState {
    /// Ticks since the attack started
    pub time: i32,
    /// Current attack
    pub attack: Option<AttackId>,
    /// Chained attack to start when this one ends
    pub queued: Option<AttackId>,
}

/// Reeling from a hit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HurtState {
    /// Ticks since the hit
    pub time: i32,
    /// Length, -1 to use the hurt animation
    pub duration: i32,
}

/// Dodge rolling.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RollingState {
    /// Ticks since the roll started
    pub time: i32,
    /// Length in ticks
    pub duration: i32,
    /// Speed in units per tick
    pub speed: i32,
    /// Motion applied every tick
    pub velocity: Point,
}

/// Noticed the player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AlertState {
    /// Ticks since alerted
    pub time: i32,
}

/// One status effect slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StatusSlot {
    /// Effect in this slot
    pub effect: Option<StatusEffectId>,
    /// Ticks left, 0 when the slot is free
    pub remaining: i32,
}

/// Timed stat modifiers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StatusEffects {
    /// Slots, free when `remaining` is 0
    pub slots: [StatusSlot; STATUS_EFFECT_SLOTS],
}

// =============================================================================
// Control
// =============================================================================

/// Marks the entity driven by player input.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlayerController;

/// Chase-and-attack AI.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EnemyController {
    /// Player distance that triggers the alert state, 0 to never alert
    pub alert_radius: i32,
    /// Uses the navgrid when far from its target
    pub pathfinding: bool,
    /// Current target
    pub target: Option<Entity>,
}

/// How a path-following entity moves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PathSpeed {
    /// Steer the intent and let intent resolution move
    #[default]
    AiDriven,
    /// Apply motion directly at this speed
    Fixed(i32),
}

/// A route being followed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Pathfinding {
    /// Destination in world units
    pub target: Point,
    /// Tiles to visit in order
    pub waypoints: Vec<Point>,
    /// Index of the next waypoint
    pub progress: usize,
    /// Movement mode
    pub speed: PathSpeed,
    /// The route was truncated
    pub incomplete: bool,
}

impl Pathfinding {
    /// Waypoints stored.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Whether there is nothing to follow.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Whether every waypoint has been reached.
    #[inline]
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.progress >= self.waypoints.len()
    }
}

/// Which half of the boss cycle is running.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BossPhase {
    /// Summoning slimes
    #[default]
    Minions,
    /// Summoning tentacles
    Tentacles,
}

/// Boss script state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Boss {
    /// Ticks in the current phase
    pub timer: i32,
    /// Current phase
    pub phase: BossPhase,
    /// Awake and scripting
    pub active: bool,
    /// Ticks of vulnerability left
    pub stun: i32,
    /// Tentacles killed this wave
    pub stunned_tentacles: i32,
}

// =============================================================================
// Items
// =============================================================================

/// Can be picked up by the player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ItemCollectible {
    /// Item granted
    pub item: Option<ItemId>,
    /// Grants gold instead of an item
    pub is_gold: bool,
}

/// Flying toward its collector.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BeingCollected {
    /// Entity picking this up
    pub collector: Option<Entity>,
    /// Ticks since pickup began
    pub time: i32,
}

/// Small fixed inventory, used by chests and loot carriers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MiniInventory {
    /// Item per slot
    pub items: [Option<ItemId>; MINI_INVENTORY_SLOTS],
    /// Quantity per slot
    pub quantity: [i32; MINI_INVENTORY_SLOTS],
    /// Drop contents when the owner is destroyed
    pub drop_on_destroy: bool,
}

impl MiniInventory {
    /// Occupied slots as (item, quantity).
    pub fn contents(&self) -> impl Iterator<Item = (ItemId, i32)> + '_ {
        self.items
            .iter()
            .zip(self.quantity.iter())
            .filter_map(|(item, &qty)| item.map(|item| (item, qty)))
    }
}

// =============================================================================
// Cosmetic
// =============================================================================

/// Static sprite.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Sprite {
    /// Sprite asset
    pub sprite: Option<SpriteId>,
    /// Draw offset x in pixels
    pub x: i32,
    /// Draw offset y in pixels
    pub y: i32,
    /// Draw offset z in pixels
    pub z: i32,
    /// Bob amplitude
    pub bob: i32,
    /// Bob period in ticks
    pub bob_duration: i32,
    /// Bob phase
    pub bob_timer: i32,
}

/// Animation state used to pick a clip.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AnimState {
    /// Standing
    #[default]
    Idle,
    /// Moving
    Walking,
    /// Swinging
    Attack,
    /// Reeling
    Hurt,
    /// Rolling
    Roll,
    /// Alerted
    Alert,
}

/// Directional animation clips.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Animation {
    /// Clip set
    pub set: AnimationSet,
    /// Current facing
    pub facing: Facing,
    /// Current state
    pub state: AnimState,
}

impl Animation {
    /// Clip for the current state and facing, falling back to idle.
    #[must_use]
    pub fn current(&self) -> Option<AnimationId> {
        let slot = self.facing.index();
        let directional = match self.state {
            AnimState::Idle => None,
            AnimState::Walking => self.set.walk[slot],
            AnimState::Attack => self.set.attack[slot],
            AnimState::Hurt => self.set.hurt[slot],
            AnimState::Roll => self.set.roll[slot],
            AnimState::Alert => self.set.alert[slot],
        };
        directional.or(self.set.idle)
    }
}

/// Horizontal sprite jitter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Shake {
    /// Ticks left
    pub timer: i32,
}

// =============================================================================
// Misc
// =============================================================================

/// Offers an interaction to the player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Interaction {
    /// What happens on interact
    pub kind: InteractionKind,
}

/// Spawn bookkeeping for logs and quest signals.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DebugLabel {
    /// `prefab.N`
    pub name: String,
    /// Template the entity came from
    pub prefab: Option<PrefabId>,
}

/// Destruction payload.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Misc {
    /// Dropped on destruction
    pub loot_table: Option<LootTableId>,
    /// Played on destruction
    pub sound_die: Option<SoundId>,
    /// Spawned on destruction
    pub particles_die: Option<ParticlesId>,
    /// Sprite after harvesting
    pub harvested_sprite: Option<SpriteId>,
    /// Counts toward boss stun waves
    pub tentacle: bool,
}

/// Proximity text shown while the player is near.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Hint {
    /// Text
    pub text: String,
    /// Reach in world units
    pub radius: i32,
}

/// Link to a villager record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Villager {
    /// Villager record
    pub villager: Option<VillagerId>,
}

impl Component for Location {}
impl Component for Motion {}
impl Component for Solid {}
impl Component for Launch {}
impl Component for Actor {}
impl Component for Intent {}
impl Component for StateParams {}
impl Component for Breakable {}
impl Component for Cheats {}
impl Component for AttackState {}
impl Component for HurtState {}
impl Component for RollingState {}
impl Component for AlertState {}
impl Component for StatusEffects {}
impl Component for PlayerController {}
impl Component for EnemyController {}
impl Component for Pathfinding {}
impl Component for Boss {}
impl Component for ItemCollectible {}
impl Component for BeingCollected {}
impl Component for MiniInventory {}
impl Component for Sprite {}
impl Component for Animation {}
impl Component for Shake {}
impl Component for Interaction {}
impl Component for DebugLabel {}
impl Component for Misc {}
impl Component for Hint {}
impl Component for Villager {}

/// Registers every simulation component.
///
/// # Errors
///
/// Fails if the store is already sealed or out of component slots.
pub fn register_components(world: &mut World) -> StoreResult<()> {
    world.register::<Location>()?;
    world.register::<Motion>()?;
    world.register::<Solid>()?;
    world.register::<Launch>()?;
    world.register::<Actor>()?;
    world.register::<Intent>()?;
    world.register::<StateParams>()?;
    world.register::<Breakable>()?;
    world.register::<Cheats>()?;
    world.register::<AttackState>()?;
    world.register::<HurtState>()?;
    world.register::<RollingState>()?;
    world.register::<AlertState>()?;
    world.register::<StatusEffects>()?;
    world.register::<PlayerController>()?;
    world.register::<EnemyController>()?;
    world.register::<Pathfinding>()?;
    world.register::<Boss>()?;
    world.register::<ItemCollectible>()?;
    world.register::<BeingCollected>()?;
    world.register::<MiniInventory>()?;
    world.register::<Sprite>()?;
    world.register::<Animation>()?;
    world.register::<Shake>()?;
    world.register::<Interaction>()?;
    world.register::<DebugLabel>()?;
    world.register::<Misc>()?;
    world.register::<Hint>()?;
    world.register::<Villager>()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_all() {
        let mut world = World::new(8);
        register_components(&mut world).unwrap();
        assert_eq!(world.component_count(), 29);

        let e = world.create();
        assert!(world.attach::<Location>(e).is_some());
        assert!(world.attach::<Villager>(e).is_some());
    }

    #[test]
    fn test_animation_falls_back_to_idle() {
        let mut anim = Animation::default();
        anim.set.idle = Some(AnimationId(0));
        anim.set.walk[Facing::Left.index()] = Some(AnimationId(1));

        assert_eq!(anim.current(), Some(AnimationId(0)));

        anim.state = AnimState::Walking;
        assert_eq!(anim.current(), Some(AnimationId(0)));

        anim.facing = Facing::Left;
        assert_eq!(anim.current(), Some(AnimationId(1)));

        anim.state = AnimState::Hurt;
        assert_eq!(anim.current(), Some(AnimationId(0)));
    }

    #[test]
    fn test_mini_inventory_contents() {
        let mut inv = MiniInventory::default();
        inv.items[2] = Some(ItemId(5));
        inv.quantity[2] = 3;
        let contents: Vec<_> = inv.contents().collect();
        assert_eq!(contents, vec![(ItemId(5), 3)]);
    }
}
