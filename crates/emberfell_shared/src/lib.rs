//! # Emberfell Shared
//!
//! Common types used by the simulation, the collision field and the
//! content loader.
//!
//! ## Coordinate System
//!
//! World positions are integers in fixed-point units, 16 units per pixel
//! and 256 units per tile. Screen y grows downward; angles are integer
//! degrees measured counter-clockwise from +x as seen on screen.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod constants;
pub mod math;

pub use constants::{TICK_RATE, TILE_UNITS, UNITS_PER_PIXEL};
pub use math::{
    angle_length_x, angle_length_y, angle_to, length_squared, lerp, sanitize_angle, Point, Vec2,
};
