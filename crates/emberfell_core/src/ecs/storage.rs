//! # Component Pools
//!
//! Pre-allocated, dense component storage indexed by entity slot.
//!
//! Each pool holds:
//! - A row per slot, allocated once at registration
//! - A parallel validity flag per slot
//!
//! A row is only meaningful while its flag is set. Attaching resets the row
//! to `C::default()`; detaching just clears the flag.

use super::component::Component;
use std::any::Any;

/// Dense storage for a single component type.
///
/// # Type Parameters
///
/// * `C` - The component type to store
pub struct ComponentPool<C: Component> {
    /// One row per entity slot.
    rows: Box<[C]>,
    /// Validity flag per entity slot.
    valid: Box<[bool]>,
}

impl<C: Component> ComponentPool<C> {
    /// Creates a pool with one row per slot.
    ///
    /// # Panics
    ///
    /// Panics if capacity is zero.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Capacity must be greater than zero");

        let rows = (0..capacity)
            .map(|_| C::default())
            .collect::<Vec<_>>()
            .into_boxed_slice();

        Self {
            rows,
            valid: vec![false; capacity].into_boxed_slice(),
        }
    }

    /// Returns the number of rows.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.rows.len()
    }

    /// Returns whether the row at `slot` is valid.
    #[inline]
    #[must_use]
    pub fn contains(&self, slot: usize) -> bool {
        self.valid.get(slot).copied().unwrap_or(false)
    }

    /// Resets the row to its default value and marks it valid.
    ///
    /// # Returns
    ///
    /// The fresh row, or None if `slot` is out of range.
    #[inline]
    pub fn attach(&mut self, slot: usize) -> Option<&mut C> {
        let row = self.rows.get_mut(slot)?;
        *row = C::default();
        self.valid[slot] = true;
        Some(row)
    }

    /// Returns the existing row, attaching a fresh one if absent.
    #[inline]
    pub fn get_or_attach(&mut self, slot: usize) -> Option<&mut C> {
        if self.contains(slot) {
            self.rows.get_mut(slot)
        } else {
            self.attach(slot)
        }
    }

    /// Marks the row invalid. The row contents are left as-is.
    #[inline]
    pub fn detach(&mut self, slot: usize) {
        if let Some(flag) = self.valid.get_mut(slot) {
            *flag = false;
        }
    }

    /// Gets a valid row.
    #[inline]
    #[must_use]
    pub fn get(&self, slot: usize) -> Option<&C> {
        if self.contains(slot) {
            self.rows.get(slot)
        } else {
            None
        }
    }

    /// Gets a valid row mutably.
    #[inline]
    pub fn get_mut(&mut self, slot: usize) -> Option<&mut C> {
        if self.contains(slot) {
            self.rows.get_mut(slot)
        } else {
            None
        }
    }

    /// Iterates over the slots with a valid row, in slot order.
    pub fn valid_slots(&self) -> impl Iterator<Item = usize> + '_ {
        self.valid
            .iter()
            .enumerate()
            .filter_map(|(slot, &valid)| valid.then_some(slot))
    }

    /// Invalidates every row.
    pub fn clear(&mut self) {
        self.valid.fill(false);
    }
}

/// Type-erased view of a [`ComponentPool`], used by the world for
/// operations that span every registered type.
pub trait ErasedPool {
    /// Returns whether the row at `slot` is valid.
    fn has_slot(&self, slot: usize) -> bool;
    /// Invalidates the row at `slot`.
    fn detach_slot(&mut self, slot: usize);
    /// Appends every valid slot, in slot order.
    fn collect_slots(&self, out: &mut Vec<usize>);
    /// Invalidates every row.
    fn clear(&mut self);
    /// Name of the stored type, for diagnostics.
    fn type_name(&self) -> &'static str;
    /// Upcast for typed access.
    fn as_any(&self) -> &dyn Any;
    /// Mutable upcast for typed access.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<C: Component> ErasedPool for ComponentPool<C> {
    fn has_slot(&self, slot: usize) -> bool {
        self.contains(slot)
    }

    fn detach_slot(&mut self, slot: usize) {
        self.detach(slot);
    }

    fn collect_slots(&self, out: &mut Vec<usize>) {
        out.extend(self.valid_slots());
    }

    fn clear(&mut self) {
        ComponentPool::clear(self);
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<C>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
