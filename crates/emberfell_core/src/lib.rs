//! # Emberfell Core
//!
//! The entity store behind the Emberfell simulation:
//! - Up to 65536 live entities behind generational handles
//! - Up to 256 component types, each in a dense per-slot pool
//! - Snapshot queries over 1 to 4 component types
//!
//! ## Architecture Rules
//!
//! 1. **Capacities are fixed** - slots at creation, pools at registration
//! 2. **Stale handles are harmless** - every accessor returns `Option`
//! 3. **Queries close in LIFO order** - enforced by `Drop`
//!
//! ## Example
//!
//! ```rust,ignore
//! use emberfell_core::{Component, World};
//!
//! #[derive(Default)]
//! struct Location { x: i32, y: i32 }
//! impl Component for Location {}
//!
//! let mut world = World::new(256);
//! world.register::<Location>()?;
//! let e = world.create();
//! world.attach::<Location>(e);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod ecs;
pub mod error;

pub use ecs::{
    Component, ComponentId, ComponentPool, Entity, ErasedPool, Query, QuerySet, World,
    WorldLimits, MAX_QUERY_COLUMNS, MAX_SLOTS,
};
pub use error::{StoreError, StoreResult};
