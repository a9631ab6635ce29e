//! # Entity Component System
//!
//! A fixed-capacity ECS with dense per-slot pools.
//!
//! ## Design Philosophy
//!
//! - Slot memory is allocated at world creation, pool memory at registration
//! - Components live in dense arrays indexed by entity slot
//! - Entity handles carry a generation so stale handles never alias
//! - Queries are owned snapshots, so systems may mutate while iterating

mod component;
mod entity;
mod query;
mod storage;
mod world;

pub use component::{Component, ComponentId};
pub use entity::Entity;
pub use query::{Query, QuerySet, MAX_QUERY_COLUMNS};
pub use storage::{ComponentPool, ErasedPool};
pub use world::{World, WorldLimits, MAX_SLOTS};
