//! Integer-degree angle math and the value types built on it.
//!
//! All angle helpers truncate toward zero, matching how content tuning was
//! authored. Keep it that way: rounding here shifts every knockback and
//! pushback by a unit.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Wraps an angle into `[0, 360)`.
#[inline]
#[must_use]
pub const fn sanitize_angle(a: i32) -> i32 {
    a.rem_euclid(360)
}

/// Interpolates between two integers, truncating the step toward zero.
#[inline]
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub fn lerp(a: i32, b: i32, f: f32) -> i32 {
    a + ((b - a) as f32 * f) as i32
}

/// Angle in whole degrees from one point to another, in `[0, 360)`.
///
/// Screen y grows downward, so "up" is 90.
#[inline]
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn angle_to(from_x: i32, from_y: i32, to_x: i32, to_y: i32) -> i32 {
    let dy = -f64::from(to_y - from_y);
    let dx = f64::from(to_x - from_x);
    let a = dy.atan2(dx).to_degrees() as i32;
    if a < 0 {
        a + 360
    } else {
        a
    }
}

/// X component of a vector of `length` at `angle` degrees, truncated.
#[inline]
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn angle_length_x(angle: i32, length: i32) -> i32 {
    (f64::from(angle).to_radians().cos() * f64::from(length)) as i32
}

/// Y component of a vector of `length` at `angle` degrees, truncated.
#[inline]
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn angle_length_y(angle: i32, length: i32) -> i32 {
    (-f64::from(angle).to_radians().sin() * f64::from(length)) as i32
}

/// Squared length of an integer vector, widened to avoid overflow.
#[inline]
#[must_use]
pub const fn length_squared(x: i32, y: i32) -> i64 {
    let x = x as i64;
    let y = y as i64;
    x * x + y * y
}

/// A point in fixed-point world units.
#[repr(C)]
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable, Serialize, Deserialize,
)]
pub struct Point {
    /// X coordinate
    pub x: i32,
    /// Y coordinate
    pub y: i32,
}

impl Point {
    /// Creates a new point
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Origin
    pub const ZERO: Self = Self::new(0, 0);

    /// Squared distance to another point
    #[inline]
    #[must_use]
    pub const fn distance_squared(self, other: Self) -> i64 {
        length_squared(other.x - self.x, other.y - self.y)
    }

    /// Angle from this point to another
    #[inline]
    #[must_use]
    pub fn angle_to(self, other: Self) -> i32 {
        angle_to(self.x, self.y, other.x, other.y)
    }

    /// This point moved `length` units along `angle`
    #[inline]
    #[must_use]
    pub fn offset(self, angle: i32, length: i32) -> Self {
        Self::new(
            self.x + angle_length_x(angle, length),
            self.y + angle_length_y(angle, length),
        )
    }

    /// Multiplies both coordinates
    #[inline]
    #[must_use]
    pub const fn scaled(self, factor: i32) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }

    /// Reinterprets `[x, y]` pairs as points without copying.
    #[must_use]
    pub fn slice_from_pairs(pairs: &[[i32; 2]]) -> &[Self] {
        bytemuck::cast_slice(pairs)
    }
}

impl std::ops::Add for Point {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for Point {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// 2D direction or axis value
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Vec2 {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
}

impl Vec2 {
    /// Creates a new Vec2
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Zero vector
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Length
    #[must_use]
    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Whether both components are exactly zero
    #[must_use]
    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    /// Unit vector in the same direction. A zero vector stays zero.
    #[must_use]
    pub fn normalized(self) -> Self {
        let length = self.length();
        if length == 0.0 {
            return self;
        }
        Self::new(self.x / length, self.y / length)
    }

    /// Direction from one integer point toward another
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn between(from: Point, to: Point) -> Self {
        Self::new((to.x - from.x) as f32, (to.y - from.y) as f32)
    }

    /// Angle of this direction in whole degrees, in `[0, 360)`.
    ///
    /// Computed at a fixed magnitude so sub-unit directions keep precision.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn angle(self) -> i32 {
        angle_to(0, 0, (self.x * 1000.0) as i32, (self.y * 1000.0) as i32)
    }

    /// Scales and truncates to integer units
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn scaled_trunc(self, factor: f32) -> Point {
        Point::new((self.x * factor) as i32, (self.y * factor) as i32)
    }
}

impl std::ops::Mul<f32> for Vec2 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_angle() {
        assert_eq!(sanitize_angle(0), 0);
        assert_eq!(sanitize_angle(370), 10);
        assert_eq!(sanitize_angle(-90), 270);
        assert_eq!(sanitize_angle(-360), 0);
    }

    #[test]
    fn test_angle_to_screen_axes() {
        assert_eq!(angle_to(0, 0, 10, 0), 0);
        assert_eq!(angle_to(0, 0, 0, -10), 90);
        assert_eq!(angle_to(0, 0, -10, 0), 180);
        assert_eq!(angle_to(0, 0, 0, 10), 270);
        assert_eq!(angle_to(0, 0, 10, -10), 45);
    }

    #[test]
    fn test_angle_length_truncates() {
        assert_eq!(angle_length_x(0, 100), 100);
        assert_eq!(angle_length_y(0, 100), 0);
        assert_eq!(angle_length_x(180, 3), -3);
        assert_eq!(angle_length_y(90, 100), -100);
        assert_eq!(angle_length_x(45, 10), 7);
    }

    #[test]
    fn test_lerp() {
        assert_eq!(lerp(0, 10, 0.5), 5);
        assert_eq!(lerp(10, 0, 0.25), 8);
        assert_eq!(lerp(-5, 5, 1.0), 5);
    }

    #[test]
    fn test_normalized_zero_is_unchanged() {
        assert_eq!(Vec2::ZERO.normalized(), Vec2::ZERO);
        let n = Vec2::new(3.0, 4.0).normalized();
        assert!((n.x - 0.6).abs() < 1e-6);
        assert!((n.y - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_point_pairs_cast() {
        let pairs = [[0, 0], [256, 0], [256, 256]];
        let points = Point::slice_from_pairs(&pairs);
        assert_eq!(points.len(), 3);
        assert_eq!(points[1], Point::new(256, 0));
    }

    #[test]
    fn test_point_offset_and_distance() {
        let p = Point::new(100, 100).offset(180, 10);
        assert_eq!(p, Point::new(90, 100));
        assert_eq!(Point::ZERO.distance_squared(Point::new(3, 4)), 25);
    }

    #[test]
    fn test_vec2_angle() {
        assert_eq!(Vec2::new(1.0, 0.0).angle(), 0);
        assert_eq!(Vec2::new(0.0, -1.0).angle(), 90);
        assert_eq!(Vec2::new(-1.0, 0.0).angle(), 180);
    }
}
