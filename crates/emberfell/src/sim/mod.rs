//! # Entity Simulation
//!
//! One [`Simulation`] owns everything a running game region needs: the
//! entity store, collision field, navigation grid, content tables, RNG and
//! the outgoing event channel. There are no globals, so independent
//! simulations can run side by side.
//!
//! ## Tick
//!
//! ```text
//! tick(input)
//!   ├─ check query balance, clear interaction partner
//!   ├─  1 player control        8 status decay
//!   ├─  2 enemy AI              9 item collection
//!   ├─  3 path follow          10 shake + launch
//!   ├─  4 boss script          11 hint
//!   ├─  5 intent resolution    12 motion integration
//!   ├─  6 attack resolution    13 solid vs solid
//!   └─  7 state timers         14 solid vs field
//! ```
//!
//! Every pass iterates an owned query snapshot and touches component data
//! through short-lived `get`/`get_mut` borrows, so a pass may spawn,
//! destroy and change state freely while it runs.

pub mod components;
mod spawn;
mod state;
mod stats;
mod systems;

pub use components::*;
pub use state::EntityState;
pub use stats::{Equipment, Toggle};
pub use systems::intent_from_input;

use crate::config::SimConfig;
use crate::content::{
    AnimationId, Content, Facing, ItemId, ParticlesId, PrefabId, SoundId, VillagerId,
    ANIM_BOSS_IDLE, ANIM_BOSS_IDLE_ACTIVE, MINI_INVENTORY_SLOTS, PARTICLES_CRIT, PARTICLES_ROLL,
    PREFAB_GOLD_DROP, PREFAB_ITEM_DROP, PREFAB_MINION, PREFAB_TENTACLE, SOUND_CRIT, SOUND_HIT,
};
use crate::error::SimResult;
use crate::events::{EventBus, EventReceiver, EventSender, GameEvent};
use crate::field::Field;
use crate::input::InputState;
use crate::navgrid::{NavGrid, PathOutcome};
use crate::tiles::TileGrid;
use emberfell_core::{Entity, World};
use emberfell_shared::{Point, TILE_UNITS};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;

/// Squares a distance for comparison against `distance_squared`.
#[inline]
pub(crate) fn squared(distance: i32) -> i64 {
    let d = i64::from(distance);
    d * d
}

/// Content ids the simulation uses by name, resolved once.
#[derive(Clone, Copy, Debug)]
struct Builtins {
    sound_crit: Option<SoundId>,
    sound_hit: Option<SoundId>,
    particles_crit: Option<ParticlesId>,
    particles_roll: Option<ParticlesId>,
    anim_boss_idle: Option<AnimationId>,
    anim_boss_active: Option<AnimationId>,
    prefab_tentacle: Option<PrefabId>,
    prefab_minion: Option<PrefabId>,
    prefab_item_drop: Option<PrefabId>,
    prefab_gold_drop: Option<PrefabId>,
}

impl Builtins {
    fn resolve(content: &Content) -> Self {
        Self {
            sound_crit: content.sounds().find(SOUND_CRIT),
            sound_hit: content.sounds().find(SOUND_HIT),
            particles_crit: content.particles().find(PARTICLES_CRIT),
            particles_roll: content.particles().find(PARTICLES_ROLL),
            anim_boss_idle: content.find_animation(ANIM_BOSS_IDLE),
            anim_boss_active: content.find_animation(ANIM_BOSS_IDLE_ACTIVE),
            prefab_tentacle: content.find_prefab(PREFAB_TENTACLE),
            prefab_minion: content.find_prefab(PREFAB_MINION),
            prefab_item_drop: content.find_prefab(PREFAB_ITEM_DROP),
            prefab_gold_drop: content.find_prefab(PREFAB_GOLD_DROP),
        }
    }
}

/// The simulation context.
///
/// # Example
///
/// ```rust,ignore
/// let content = Content::from_path("data/arena.toml")?;
/// let mut sim = Simulation::new(SimConfig::default(), content)?;
/// sim.load_region(&TileGrid::from_rows(&["....", "...."]))?;
///
/// let player = sim.spawn_named(384, 256, "player");
/// sim.tick(&InputState::new());
/// for event in sim.events().drain() { /* ... */ }
/// ```
pub struct Simulation {
    world: World,
    field: Field,
    navgrid: NavGrid,
    content: Arc<Content>,
    config: SimConfig,
    builtins: Builtins,
    rng: ChaCha8Rng,
    events: EventSender,
    receiver: EventReceiver,
    equipment: Equipment,
    spawn_counts: Vec<u32>,
    interaction_partner: Option<Entity>,
    hint_text: Option<String>,
    ticks: u64,
}

impl Simulation {
    /// Creates a simulation with an empty region.
    ///
    /// # Arguments
    ///
    /// * `config` - Capacities, seed and tuning
    /// * `content` - Definition tables, shareable between simulations
    ///
    /// # Errors
    ///
    /// [`SimError::InvalidConfig`](crate::SimError::InvalidConfig) if the
    /// configuration fails validation, or a store error if the component
    /// set doesn't fit `max_component_types`.
    pub fn new(config: SimConfig, content: impl Into<Arc<Content>>) -> SimResult<Self> {
        config.validate()?;
        let content = content.into();

        let mut world = World::with_limits(config.world_limits());
        register_components(&mut world)?;

        let (events, receiver) = EventBus::create_pair(config.event_capacity);

        Ok(Self {
            world,
            field: Field::new(config.field),
            navgrid: NavGrid::new(config.navgrid),
            builtins: Builtins::resolve(&content),
            spawn_counts: vec![0; content.prefab_count()],
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            content,
            config,
            events,
            receiver,
            equipment: Equipment::default(),
            interaction_partner: None,
            hint_text: None,
            ticks: 0,
        })
    }

    /// Advances the simulation by one fixed tick.
    pub fn tick(&mut self, input: &InputState) {
        self.world.check_query_balance();
        self.interaction_partner = None;
        systems::run_tick(self, input);
        self.ticks += 1;
    }

    /// Replaces the collision field and navigation grid with a region's.
    ///
    /// The field is always rebuilt. The navgrid keeps its previous contents
    /// if the region is too large for it.
    ///
    /// # Returns
    ///
    /// Number of boundary loops in the new field.
    ///
    /// # Errors
    ///
    /// As [`NavGrid::set`].
    pub fn load_region(&mut self, grid: &TileGrid) -> SimResult<usize> {
        let loops = self.field.load_tiles(grid);
        tracing::info!(
            "loaded {}x{} region: {loops} loops, {} lines",
            grid.width(),
            grid.height(),
            self.field.line_count()
        );
        self.navgrid.set_tiles(grid)?;
        Ok(loops)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The entity store.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// The entity store, for hosts attaching their own data.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Definition tables.
    #[must_use]
    pub fn content(&self) -> &Content {
        &self.content
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Collision field.
    #[must_use]
    pub fn field(&self) -> &Field {
        &self.field
    }

    /// Collision field, for hand-built geometry.
    pub fn field_mut(&mut self) -> &mut Field {
        &mut self.field
    }

    /// Navigation grid.
    #[must_use]
    pub fn navgrid(&self) -> &NavGrid {
        &self.navgrid
    }

    /// Navigation grid, for hand-built grids.
    pub fn navgrid_mut(&mut self) -> &mut NavGrid {
        &mut self.navgrid
    }

    /// Outgoing events.
    #[must_use]
    pub fn events(&self) -> &EventReceiver {
        &self.receiver
    }

    /// Player equipment.
    #[must_use]
    pub fn equipment(&self) -> &Equipment {
        &self.equipment
    }

    /// Player equipment, set by the inventory.
    pub fn equipment_mut(&mut self) -> &mut Equipment {
        &mut self.equipment
    }

    /// Ticks run so far.
    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.ticks
    }

    /// Entity the player would interact with this tick.
    #[must_use]
    pub fn interaction_partner(&self) -> Option<Entity> {
        self.interaction_partner
    }

    /// Hint text currently shown near the player.
    #[must_use]
    pub fn hint_text(&self) -> Option<&str> {
        self.hint_text.as_deref()
    }

    /// The first player-controlled entity.
    #[must_use]
    pub fn player(&self) -> Option<Entity> {
        self.world.first::<(PlayerController,)>()
    }

    /// Position of an entity.
    #[must_use]
    pub fn position(&self, e: Entity) -> Option<Point> {
        self.world.get::<Location>(e).map(Location::point)
    }

    /// Destroys an entity.
    pub fn destroy(&mut self, e: Entity) -> bool {
        self.world.destroy(e)
    }

    /// Destroys every entity. Handles from before stay invalid.
    pub fn destroy_all(&mut self) {
        self.world.clear();
        self.interaction_partner = None;
    }

    // =========================================================================
    // Presentation
    // =========================================================================

    /// Facing of an entity. Entities without animation face right.
    #[must_use]
    pub fn facing(&self, e: Entity) -> Facing {
        self.world
            .get::<Animation>(e)
            .map_or(Facing::Right, |anim| anim.facing)
    }

    /// Turns an animated entity.
    pub fn set_facing(&mut self, e: Entity, facing: Facing) {
        if let Some(anim) = self.world.get_mut::<Animation>(e) {
            anim.facing = facing;
        }
    }

    /// Sets the animation state of an animated entity.
    pub fn set_anim_state(&mut self, e: Entity, state: AnimState) {
        if let Some(anim) = self.world.get_mut::<Animation>(e) {
            anim.state = state;
        }
    }

    /// Clip for an entity's current state and facing.
    #[must_use]
    pub fn current_animation(&self, e: Entity) -> Option<AnimationId> {
        self.world.get::<Animation>(e).and_then(Animation::current)
    }

    /// Starts a sprite shake of `times` cycles.
    pub fn shake(&mut self, e: Entity, times: i32) {
        if let Some(shake) = self.world.attach::<Shake>(e) {
            shake.timer = times * 8;
        }
    }

    /// Sets or replaces an entity's proximity hint.
    pub fn set_hint(&mut self, e: Entity, text: &str, radius: i32) {
        if let Some(hint) = self.world.get_or_attach::<Hint>(e) {
            text.clone_into(&mut hint.text);
            hint.radius = radius;
        }
    }

    /// Villager record of an entity.
    #[must_use]
    pub fn villager(&self, e: Entity) -> Option<VillagerId> {
        self.world.get::<Villager>(e).and_then(|v| v.villager)
    }

    /// Links an entity to a villager record.
    pub fn set_villager(&mut self, e: Entity, villager: Option<VillagerId>) {
        if let Some(v) = self.world.get_or_attach::<Villager>(e) {
            v.villager = villager;
        }
    }

    // =========================================================================
    // Movement
    // =========================================================================

    /// Adds to an entity's motion for this tick.
    pub fn apply_motion(&mut self, e: Entity, dx: i32, dy: i32) {
        if let Some(motion) = self.world.get_or_attach::<Motion>(e) {
            motion.dx += dx;
            motion.dy += dy;
        }
    }

    /// Computes a route to a world position and starts following it.
    ///
    /// The first waypoint is the tile the entity stands on and is skipped.
    ///
    /// # Arguments
    ///
    /// * `e` - Entity with a [`Location`]
    /// * `x`, `y` - Destination in world units
    /// * `speed` - Whether to steer the intent or move directly
    pub fn set_path(&mut self, e: Entity, x: i32, y: i32, speed: PathSpeed) {
        let Some(from) = self.position(e) else {
            return;
        };
        let outcome = self.navgrid.find_path(
            Point::new(from.x / TILE_UNITS, from.y / TILE_UNITS),
            Point::new(x / TILE_UNITS, y / TILE_UNITS),
            self.config.navgrid.max_path_length,
        );
        let Some(path) = self.world.get_or_attach::<Pathfinding>(e) else {
            return;
        };
        path.target = Point::new(x, y);
        path.progress = 1;
        path.speed = speed;
        path.waypoints.clear();
        path.incomplete = false;
        if let PathOutcome::Found(route) = outcome {
            path.incomplete = route.is_incomplete();
            path.waypoints = route.waypoints;
        }
    }

    // =========================================================================
    // Mini inventory
    // =========================================================================

    /// Mini inventory of an entity.
    #[must_use]
    pub fn mini_inventory(&self, e: Entity) -> Option<&MiniInventory> {
        self.world.get::<MiniInventory>(e)
    }

    /// Replaces the items of an entity's mini inventory, attaching one if needed.
    pub fn set_mini_inventory_items(
        &mut self,
        e: Entity,
        items: [Option<ItemId>; MINI_INVENTORY_SLOTS],
    ) {
        if let Some(inv) = self.world.get_or_attach::<MiniInventory>(e) {
            inv.items = items;
        }
    }

    /// Replaces the quantities of an entity's mini inventory, attaching one if needed.
    pub fn set_mini_inventory_quantity(&mut self, e: Entity, quantity: [i32; MINI_INVENTORY_SLOTS]) {
        if let Some(inv) = self.world.get_or_attach::<MiniInventory>(e) {
            inv.quantity = quantity;
        }
    }

    // =========================================================================
    // Internal helpers
    // =========================================================================

    fn emit(&self, event: GameEvent) {
        self.events.send(event);
    }

    fn play_sound(&self, sound: Option<SoundId>) {
        if let Some(sound) = sound {
            self.emit(GameEvent::PlaySound { sound });
        }
    }

    fn spawn_particles(&self, particles: Option<ParticlesId>, at: Point) {
        if let Some(particles) = particles {
            self.emit(GameEvent::SpawnParticles {
                particles,
                x: at.x,
                y: at.y,
            });
        }
    }

    /// Uniform roll in `0..n`.
    fn roll(&mut self, n: i32) -> i32 {
        if n <= 0 {
            return 0;
        }
        self.rng.gen_range(0..n)
    }

    fn is_invincible(&self, e: Entity) -> bool {
        self.world.has::<RollingState>(e)
            || self.world.get::<Cheats>(e).is_some_and(|c| c.god)
    }

    fn is_noclip(&self, e: Entity) -> bool {
        self.world.get::<Cheats>(e).is_some_and(|c| c.noclip)
    }

    fn debug_name(&self, e: Entity) -> &str {
        self.world
            .get::<DebugLabel>(e)
            .map_or("<unnamed>", |label| label.name.as_str())
    }
}
