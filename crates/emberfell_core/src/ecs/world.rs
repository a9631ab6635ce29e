//! # ECS World
//!
//! The central container for all entities and components.
//! Pre-allocates the slot table and one pool per registered component type.

use super::component::{Component, ComponentId};
use super::entity::{Entity, SlotEntry};
use super::query::{Query, QuerySet, MAX_QUERY_COLUMNS};
use super::storage::{ComponentPool, ErasedPool};
use crate::error::{StoreError, StoreResult};
use std::any::TypeId;
use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

/// Hard upper bound on slots, fixed by the 16-bit slot field of [`Entity`].
pub const MAX_SLOTS: usize = 1 << 16;

/// Capacity limits of a [`World`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorldLimits {
    /// Maximum number of live entities.
    pub max_entities: usize,
    /// Maximum number of registered component types.
    pub max_component_types: usize,
    /// Maximum number of simultaneously open queries.
    pub max_query_depth: usize,
}

impl Default for WorldLimits {
    fn default() -> Self {
        Self {
            max_entities: 256,
            max_component_types: 64,
            max_query_depth: 8,
        }
    }
}

/// The ECS World - the entity store.
///
/// All slot memory is allocated at creation and all pool memory at
/// registration. Creating, destroying and attaching never allocate.
///
/// # Registration
///
/// Component types are registered before the first entity is created.
/// After that the set of pools is frozen.
///
/// # Example
///
/// ```rust,ignore
/// let mut world = World::new(256);
/// world.register::<Location>()?;
///
/// let e = world.create();
/// world.attach::<Location>(e).unwrap().x = 128;
///
/// for e in world.query::<(Location,)>() {
///     let loc = world.get::<Location>(e);
/// }
/// ```
pub struct World {
    /// Slot table.
    slots: Box<[SlotEntry]>,
    /// Free slot stack, lowest slot on top.
    free_slots: Vec<u16>,
    /// Number of currently live entities.
    alive_count: usize,
    /// One pool per registered type, indexed by [`ComponentId`].
    pools: Vec<Box<dyn ErasedPool>>,
    /// Type to id lookup.
    type_ids: HashMap<TypeId, ComponentId>,
    /// Set once the first entity is created.
    sealed: bool,
    /// Nesting counter shared with open queries.
    query_depth: Rc<Cell<usize>>,
    /// Capacity limits.
    limits: WorldLimits,
}

impl World {
    /// Creates a world with default limits and the given entity capacity.
    ///
    /// # Panics
    ///
    /// Panics if capacity is zero or exceeds [`MAX_SLOTS`].
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self::with_limits(WorldLimits {
            max_entities: capacity,
            ..WorldLimits::default()
        })
    }

    /// Creates a world with explicit limits.
    ///
    /// # Panics
    ///
    /// Panics if the entity capacity is zero or exceeds [`MAX_SLOTS`].
    #[must_use]
    pub fn with_limits(limits: WorldLimits) -> Self {
        let capacity = limits.max_entities;
        assert!(capacity > 0, "Capacity must be greater than zero");
        assert!(capacity <= MAX_SLOTS, "Capacity cannot exceed 65536 slots");

        #[allow(clippy::cast_possible_truncation)]
        let free_slots: Vec<u16> = (0..capacity).rev().map(|s| s as u16).collect();

        Self {
            slots: vec![SlotEntry::default(); capacity].into_boxed_slice(),
            free_slots,
            alive_count: 0,
            pools: Vec::new(),
            type_ids: HashMap::new(),
            sealed: false,
            query_depth: Rc::new(Cell::new(0)),
            limits: WorldLimits {
                max_component_types: limits.max_component_types.min(usize::from(u8::MAX) + 1),
                ..limits
            },
        }
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Registers a component type and allocates its pool.
    ///
    /// Registering an already registered type returns its existing id.
    ///
    /// # Errors
    ///
    /// - [`StoreError::RegistrationClosed`] once an entity has been created
    /// - [`StoreError::TooManyComponentTypes`] past the type limit
    pub fn register<C: Component>(&mut self) -> StoreResult<ComponentId> {
        if let Some(&id) = self.type_ids.get(&TypeId::of::<C>()) {
            return Ok(id);
        }
        if self.sealed {
            return Err(StoreError::RegistrationClosed);
        }
        if self.pools.len() >= self.limits.max_component_types {
            return Err(StoreError::TooManyComponentTypes {
                max: self.limits.max_component_types,
            });
        }

        #[allow(clippy::cast_possible_truncation)]
        let id = ComponentId(self.pools.len() as u8);
        self.pools
            .push(Box::new(ComponentPool::<C>::new(self.slots.len())));
        self.type_ids.insert(TypeId::of::<C>(), id);
        Ok(id)
    }

    /// Looks up the id of a registered component type.
    ///
    /// # Errors
    ///
    /// [`StoreError::UnregisteredComponent`] if the type was never registered.
    pub fn component_id<C: Component>(&self) -> StoreResult<ComponentId> {
        self.type_ids
            .get(&TypeId::of::<C>())
            .copied()
            .ok_or(StoreError::UnregisteredComponent {
                name: std::any::type_name::<C>(),
            })
    }

    /// Number of registered component types.
    #[inline]
    #[must_use]
    pub fn component_count(&self) -> usize {
        self.pools.len()
    }

    // =========================================================================
    // Entity lifecycle
    // =========================================================================

    /// Returns the maximum number of live entities.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of currently live entities.
    #[inline]
    #[must_use]
    pub const fn alive_count(&self) -> usize {
        self.alive_count
    }

    /// Creates an entity with no components.
    ///
    /// # Errors
    ///
    /// [`StoreError::StoreFull`] when every slot is occupied.
    pub fn try_create(&mut self) -> StoreResult<Entity> {
        self.sealed = true;
        let Some(slot) = self.free_slots.pop() else {
            return Err(StoreError::StoreFull {
                capacity: self.slots.len(),
            });
        };

        let entry = &mut self.slots[usize::from(slot)];
        let generation = entry.bump_generation();
        entry.alive = true;
        self.alive_count += 1;

        Ok(Entity::new(slot, generation))
    }

    /// Creates an entity with no components.
    ///
    /// # Returns
    ///
    /// The new handle, or [`Entity::NULL`] if the store is full.
    pub fn create(&mut self) -> Entity {
        match self.try_create() {
            Ok(e) => e,
            Err(err) => {
                tracing::error!("{err}");
                Entity::NULL
            }
        }
    }

    /// Destroys an entity, detaching every component.
    ///
    /// # Returns
    ///
    /// `true` if the entity was destroyed, `false` if the handle was stale.
    pub fn destroy(&mut self, e: Entity) -> bool {
        let Some(slot) = self.live_slot(e) else {
            return false;
        };

        for pool in &mut self.pools {
            pool.detach_slot(slot);
        }
        self.slots[slot].alive = false;
        self.alive_count -= 1;
        self.free_slots.push(e.slot());
        true
    }

    /// Destroys every entity.
    ///
    /// Generations are kept, so handles from before the wipe stay invalid.
    pub fn clear(&mut self) {
        for pool in &mut self.pools {
            pool.clear();
        }
        for entry in self.slots.iter_mut() {
            entry.alive = false;
        }
        self.free_slots.clear();
        #[allow(clippy::cast_possible_truncation)]
        self.free_slots
            .extend((0..self.slots.len()).rev().map(|s| s as u16));
        self.alive_count = 0;
    }

    /// Checks if a handle names a live entity.
    #[inline]
    #[must_use]
    pub fn is_valid(&self, e: Entity) -> bool {
        self.live_slot(e).is_some()
    }

    /// Iterates over every live entity in slot order.
    pub fn iter_alive(&self) -> impl Iterator<Item = Entity> + '_ {
        self.slots.iter().enumerate().filter_map(|(slot, entry)| {
            #[allow(clippy::cast_possible_truncation)]
            entry
                .alive
                .then(|| Entity::new(slot as u16, entry.generation))
        })
    }

    #[inline]
    fn live_slot(&self, e: Entity) -> Option<usize> {
        if e.is_null() {
            return None;
        }
        let slot = usize::from(e.slot());
        let entry = self.slots.get(slot)?;
        (entry.alive && entry.generation == e.generation()).then_some(slot)
    }

    // =========================================================================
    // Component access
    // =========================================================================

    fn pool<C: Component>(&self) -> Option<&ComponentPool<C>> {
        let id = self.type_ids.get(&TypeId::of::<C>())?;
        self.pools[id.index()].as_any().downcast_ref()
    }

    fn pool_mut<C: Component>(&mut self) -> Option<&mut ComponentPool<C>> {
        let id = self.type_ids.get(&TypeId::of::<C>())?;
        self.pools[id.index()].as_any_mut().downcast_mut()
    }

    fn registered_pool_mut<C: Component>(&mut self) -> Option<&mut ComponentPool<C>> {
        if self.pool::<C>().is_none() {
            tracing::error!(
                "component {} was never registered",
                std::any::type_name::<C>()
            );
        }
        self.pool_mut::<C>()
    }

    /// Attaches a component, resetting its row to the default value.
    ///
    /// # Returns
    ///
    /// The fresh row, or None if the handle is stale or the type unregistered.
    pub fn attach<C: Component>(&mut self, e: Entity) -> Option<&mut C> {
        let slot = self.live_slot(e)?;
        self.registered_pool_mut::<C>()?.attach(slot)
    }

    /// Attaches a component with an explicit value.
    ///
    /// # Returns
    ///
    /// `true` if the value was stored.
    pub fn insert<C: Component>(&mut self, e: Entity, value: C) -> bool {
        match self.attach::<C>(e) {
            Some(row) => {
                *row = value;
                true
            }
            None => false,
        }
    }

    /// Returns the existing component, attaching a fresh one if absent.
    pub fn get_or_attach<C: Component>(&mut self, e: Entity) -> Option<&mut C> {
        let slot = self.live_slot(e)?;
        self.registered_pool_mut::<C>()?.get_or_attach(slot)
    }

    /// Detaches a component. A no-op if absent or the handle is stale.
    pub fn detach<C: Component>(&mut self, e: Entity) {
        let Some(slot) = self.live_slot(e) else {
            return;
        };
        if let Some(pool) = self.pool_mut::<C>() {
            pool.detach(slot);
        }
    }

    /// Gets a component of a live entity.
    #[inline]
    #[must_use]
    pub fn get<C: Component>(&self, e: Entity) -> Option<&C> {
        let slot = self.live_slot(e)?;
        self.pool::<C>()?.get(slot)
    }

    /// Gets a component of a live entity mutably.
    #[inline]
    pub fn get_mut<C: Component>(&mut self, e: Entity) -> Option<&mut C> {
        let slot = self.live_slot(e)?;
        self.pool_mut::<C>()?.get_mut(slot)
    }

    /// Checks if a live entity has a component.
    #[inline]
    #[must_use]
    pub fn has<C: Component>(&self, e: Entity) -> bool {
        self.get::<C>(e).is_some()
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Opens a snapshot query over the entities holding every column of `Q`.
    ///
    /// A query over an unregistered type logs an error and is empty.
    #[must_use]
    pub fn query<Q: QuerySet>(&self) -> Query {
        let mut ids = Vec::with_capacity(MAX_QUERY_COLUMNS);
        if let Err(name) = Q::resolve(self, &mut ids) {
            tracing::error!("query over unregistered component {name}");
            return Query::empty();
        }
        self.query_ids(&ids)
    }

    /// Opens a snapshot query over runtime component ids.
    ///
    /// # Panics
    ///
    /// Panics if more than [`MAX_QUERY_COLUMNS`] ids are given.
    #[must_use]
    pub fn query_ids(&self, ids: &[ComponentId]) -> Query {
        if ids.len() > MAX_QUERY_COLUMNS {
            tracing::error!(
                "query over {} components exceeds the limit of {MAX_QUERY_COLUMNS}",
                ids.len()
            );
            panic!("too many query columns");
        }
        let Some((&first, rest)) = ids.split_first() else {
            tracing::warn!("query over zero components");
            return Query::empty();
        };
        if self.query_depth.get() >= self.limits.max_query_depth {
            tracing::error!("max queries exceeded");
            return Query::empty();
        }
        let (Some(seed), true) = (
            self.pools.get(first.index()),
            rest.iter().all(|id| id.index() < self.pools.len()),
        ) else {
            tracing::error!("query over unknown component id");
            return Query::empty();
        };

        let mut slots = Vec::new();
        seed.collect_slots(&mut slots);
        slots.retain(|&slot| rest.iter().all(|id| self.pools[id.index()].has_slot(slot)));

        #[allow(clippy::cast_possible_truncation)]
        let entities = slots
            .into_iter()
            .map(|slot| Entity::new(slot as u16, self.slots[slot].generation))
            .collect();

        Query::open(entities, &self.query_depth)
    }

    /// Returns the first entity matching `Q`, in slot order.
    #[must_use]
    pub fn first<Q: QuerySet>(&self) -> Option<Entity> {
        self.query::<Q>().next()
    }

    /// Number of currently open queries.
    #[inline]
    #[must_use]
    pub fn query_depth(&self) -> usize {
        self.query_depth.get()
    }

    /// Verifies that no query was left open, resetting the counter if one was.
    ///
    /// Call at frame start.
    ///
    /// # Returns
    ///
    /// `true` if the nesting counter was balanced.
    pub fn check_query_balance(&self) -> bool {
        let depth = self.query_depth.get();
        if depth == 0 {
            return true;
        }
        tracing::error!("mismatched query begin/end: {depth} queries left open");
        self.query_depth.set(0);
        false
    }
}
