//! # Simulation Constants
//!
//! Unit scales baked into content data. Changing these invalidates every
//! content file.

/// Fixed-point units per pixel.
pub const UNITS_PER_PIXEL: i32 = 16;

/// Pixels per tile edge.
pub const TILE_PIXELS: i32 = 16;

/// Fixed-point units per tile edge.
pub const TILE_UNITS: i32 = UNITS_PER_PIXEL * TILE_PIXELS;

/// Simulation ticks per second.
pub const TICK_RATE: u32 = 60;

/// Converts a pixel distance from content data to fixed-point units.
#[inline]
#[must_use]
pub const fn pixels(px: i32) -> i32 {
    px * UNITS_PER_PIXEL
}
