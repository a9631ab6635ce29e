//! # Emberfell
//!
//! The simulation core of a top-down action RPG: entities, combat, AI,
//! collision and pathfinding, stepped one fixed tick at a time.
//!
//! ## Layout
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                           Simulation                             │
//! │                                                                  │
//! │   InputState ──> tick() ──> systems ──> EventReceiver ──> host   │
//! │                               │                                  │
//! │         ┌─────────────────────┼─────────────────────┐            │
//! │         v                     v                     v            │
//! │   emberfell_core::World    Field (walls)      NavGrid (A*)       │
//! │         ^                                                        │
//! │         │                                                        │
//! │   Content (prefabs, attacks, items, loot) from TOML              │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The host owns presentation. It feeds one [`InputState`] per tick and
//! drains [`GameEvent`]s for sounds, particles, dialog and inventory
//! changes.
//!
//! ## Modules
//!
//! - `config`: capacities, seed and gameplay tuning
//! - `content`: definition tables and their TOML loader
//! - `field`: polygon collision boundaries
//! - `navgrid`: tile pathfinding
//! - `sim`: the entity simulation
//! - `tiles`: region tile grids

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod content;
pub mod error;
pub mod events;
pub mod field;
pub mod input;
pub mod navgrid;
pub mod sim;
pub mod tiles;

pub use config::{BossConfig, FieldConfig, NavGridConfig, SimConfig, TuningConfig};
pub use content::Content;
pub use error::{SimError, SimResult};
pub use events::{EventBus, EventReceiver, EventSender, GameEvent, QuestSignal};
pub use field::{Field, FieldNearest, Winding};
pub use input::{InputButton, InputState};
pub use navgrid::{NavGrid, PathOutcome, Route};
pub use sim::{intent_from_input, EntityState, Equipment, Simulation, Toggle};
pub use tiles::{TileGrid, TileSide};

// Re-export the entity store handle, it appears in most signatures
pub use emberfell_core::Entity;
