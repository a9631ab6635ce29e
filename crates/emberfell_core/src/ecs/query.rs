//! # Snapshot Queries
//!
//! A query is the set of live entities holding every one of 1 to 4 component
//! types. It is materialized when opened:
//!
//! ```text
//!   pool A valid:  . X . X X . X      seed, slot order
//!   pool B valid:  . X X . X . .      retain
//!   ------------------------------
//!   snapshot:      . 1 . . 4 . .      -> [e1, e4]
//! ```
//!
//! Entities created or destroyed while a query is open do not change its
//! snapshot. A query opened later sees the current state.
//!
//! Queries nest up to the world's depth limit and must close in LIFO order.
//! Dropping a [`Query`] closes it; closing out of order is a fatal usage error.

use super::component::{Component, ComponentId};
use super::entity::Entity;
use super::world::World;
use std::cell::Cell;
use std::rc::Rc;

/// Maximum number of component columns a single query can intersect.
pub const MAX_QUERY_COLUMNS: usize = 4;

/// A tuple of component types usable with [`World::query`].
///
/// Implemented for `(A,)`, `(A, B)`, `(A, B, C)` and `(A, B, C, D)`.
pub trait QuerySet {
    /// Resolves each column to its registered id, in declaration order.
    ///
    /// # Errors
    ///
    /// Returns the type name of the first unregistered column.
    fn resolve(world: &World, out: &mut Vec<ComponentId>) -> Result<(), &'static str>;
}

macro_rules! impl_query_set {
    ($($column:ident),+) => {
        impl<$($column: Component),+> QuerySet for ($($column,)+) {
            fn resolve(world: &World, out: &mut Vec<ComponentId>) -> Result<(), &'static str> {
                $(
                    let id = world
                        .component_id::<$column>()
                        .map_err(|_| std::any::type_name::<$column>())?;
                    out.push(id);
                )+
                Ok(())
            }
        }
    };
}

impl_query_set!(A);
impl_query_set!(A, B);
impl_query_set!(A, B, C);
impl_query_set!(A, B, C, D);

/// Nesting bookkeeping for an open query.
struct QueryGuard {
    /// Depth at which this query was opened.
    level: usize,
    /// Shared nesting counter of the owning world.
    depth: Rc<Cell<usize>>,
}

impl Drop for QueryGuard {
    fn drop(&mut self) {
        let current = self.depth.get();
        self.depth.set(self.level);
        if current != self.level + 1 {
            tracing::error!(
                "mismatched query begin/end: closing level {} at depth {}",
                self.level,
                current
            );
            if !std::thread::panicking() {
                panic!("mismatched query begin/end");
            }
        }
    }
}

/// An open snapshot query. Iterates over entity handles in slot order.
///
/// The query owns its snapshot and does not borrow the world, so component
/// data is read through short-lived `get`/`get_mut` calls while iterating.
pub struct Query {
    entities: std::vec::IntoIter<Entity>,
    guard: Option<QueryGuard>,
}

impl Query {
    /// An empty query that does not count toward nesting.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            entities: Vec::new().into_iter(),
            guard: None,
        }
    }

    /// Opens a counted query over an already materialized snapshot.
    pub(crate) fn open(entities: Vec<Entity>, depth: &Rc<Cell<usize>>) -> Self {
        let level = depth.get();
        depth.set(level + 1);
        Self {
            entities: entities.into_iter(),
            guard: Some(QueryGuard {
                level,
                depth: Rc::clone(depth),
            }),
        }
    }

    /// Number of entities not yet yielded.
    #[inline]
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.entities.len()
    }

    /// Returns whether this query counts toward the nesting depth.
    #[inline]
    #[must_use]
    pub fn is_counted(&self) -> bool {
        self.guard.is_some()
    }
}

impl Iterator for Query {
    type Item = Entity;

    #[inline]
    fn next(&mut self) -> Option<Entity> {
        self.entities.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entities.size_hint()
    }
}

impl ExactSizeIterator for Query {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifo_close_restores_depth() {
        let depth = Rc::new(Cell::new(0));
        let outer = Query::open(Vec::new(), &depth);
        let inner = Query::open(Vec::new(), &depth);
        assert_eq!(depth.get(), 2);
        drop(inner);
        assert_eq!(depth.get(), 1);
        drop(outer);
        assert_eq!(depth.get(), 0);
    }

    #[test]
    #[should_panic(expected = "mismatched query begin/end")]
    fn test_out_of_order_close_panics() {
        let depth = Rc::new(Cell::new(0));
        let outer = Query::open(Vec::new(), &depth);
        let _inner = Query::open(Vec::new(), &depth);
        drop(outer);
    }

    #[test]
    fn test_empty_query_is_uncounted() {
        let q = Query::empty();
        assert!(!q.is_counted());
        assert_eq!(q.remaining(), 0);
    }

    #[test]
    fn test_snapshot_yields_in_order() {
        let depth = Rc::new(Cell::new(0));
        let a = Entity::new(1, 1);
        let b = Entity::new(4, 2);
        let q = Query::open(vec![a, b], &depth);
        assert_eq!(q.len(), 2);
        assert_eq!(q.collect::<Vec<_>>(), vec![a, b]);
        assert_eq!(depth.get(), 0);
    }
}
