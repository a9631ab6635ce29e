//! # Collision Field
//!
//! Closed polygonal boundaries and the nearest-boundary query used to push
//! entities out of level geometry.
//!
//! ```text
//!         normal
//!           ^
//!   p1 ─────┼───── p2       solid side is opposite the normal
//!           │
//!           q               nearest point, distance² and inside flag
//! ```
//!
//! Every line stores its outward normal, every vertex the bisector of its
//! two lines' normals. Both are computed once when the polygon is added.

mod edge_loop;

pub use edge_loop::build_edge_loops;

use crate::config::FieldConfig;
use crate::tiles::TileGrid;
use emberfell_shared::{angle_to, length_squared, lerp, sanitize_angle, Point};

/// Winding of a polygon's points as seen on screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Winding {
    /// Normals point left of travel. Clockwise rectangles are solid inside.
    Clockwise,
    /// Normals point right of travel.
    CounterClockwise,
}

/// A boundary edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldLine {
    /// Start point
    pub p1: Point,
    /// End point
    pub p2: Point,
    /// Midpoint
    pub mid: Point,
    /// Outward normal in degrees
    pub normal: i32,
}

/// A boundary corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldVertex {
    /// Position
    pub point: Point,
    /// Bisector of the adjoining line normals, in degrees
    pub normal: i32,
}

/// Result of [`Field::find_nearest`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldNearest {
    /// Nearest boundary point
    pub point: Point,
    /// Outward normal at that point
    pub normal: i32,
    /// Squared distance from the query point
    pub distance_squared: i64,
    /// Whether the query point lies on the solid side
    pub is_inside: bool,
}

impl FieldNearest {
    const NONE: Self = Self {
        point: Point::ZERO,
        normal: 0,
        distance_squared: i64::MAX,
        is_inside: false,
    };
}

/// Whether `b` points more than 90 degrees away from `a`.
fn is_reflex(a: i32, mut b: i32) -> bool {
    while b < a - 180 {
        b += 360;
    }
    while b > a + 180 {
        b -= 360;
    }
    b < a - 90 || b > a + 90
}

/// Polygon boundary storage with fixed capacity.
#[derive(Clone, Debug)]
pub struct Field {
    lines: Vec<FieldLine>,
    vertices: Vec<FieldVertex>,
    config: FieldConfig,
}

impl Default for Field {
    fn default() -> Self {
        Self::new(FieldConfig::default())
    }
}

impl Field {
    /// Creates an empty field with the given capacity.
    #[must_use]
    pub fn new(config: FieldConfig) -> Self {
        Self {
            lines: Vec::with_capacity(config.max_lines),
            vertices: Vec::with_capacity(config.max_vertices),
            config,
        }
    }

    /// Builds a field from the edge loops of a tile grid.
    #[must_use]
    pub fn from_tiles(grid: &TileGrid, config: FieldConfig) -> Self {
        let mut field = Self::new(config);
        field.load_tiles(grid);
        field
    }

    /// Replaces the contents with the edge loops of a tile grid.
    ///
    /// # Returns
    ///
    /// Number of loops stored.
    pub fn load_tiles(&mut self, grid: &TileGrid) -> usize {
        self.clear();
        build_edge_loops(grid)
            .iter()
            .filter(|points| self.add_polygon(points, Winding::CounterClockwise))
            .count()
    }

    /// Removes every polygon.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.vertices.clear();
    }

    /// Number of stored lines.
    #[inline]
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Number of stored vertices.
    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Stored lines, for debug drawing.
    #[must_use]
    pub fn lines(&self) -> &[FieldLine] {
        &self.lines
    }

    /// Stored vertices, for debug drawing.
    #[must_use]
    pub fn vertices(&self) -> &[FieldVertex] {
        &self.vertices
    }

    /// Adds an axis-aligned box, solid inside.
    pub fn add_rect(&mut self, x: i32, y: i32, w: i32, h: i32) -> bool {
        let points = [
            Point::new(x, y),
            Point::new(x + w, y),
            Point::new(x + w, y + h),
            Point::new(x, y + h),
        ];
        self.add_polygon(&points, Winding::Clockwise)
    }

    /// Adds a closed polygon.
    ///
    /// # Returns
    ///
    /// `false` if the polygon was dropped for having fewer than 3 points or
    /// for not fitting in the remaining capacity.
    pub fn add_polygon(&mut self, points: &[Point], winding: Winding) -> bool {
        let count = points.len();
        if count < 3 {
            tracing::warn!("ignoring field polygon with {count} points");
            return false;
        }
        if self.vertices.len() + count > self.config.max_vertices
            || self.lines.len() + count > self.config.max_lines
        {
            tracing::warn!("ignoring field polygon (exceeded limit)");
            return false;
        }

        let turn = match winding {
            Winding::Clockwise => 90,
            Winding::CounterClockwise => -90,
        };

        let base = self.lines.len();
        for (i, &p1) in points.iter().enumerate() {
            let p2 = points[(i + 1) % count];
            self.lines.push(FieldLine {
                p1,
                p2,
                mid: Point::new(p1.x + (p2.x - p1.x) / 2, p1.y + (p2.y - p1.y) / 2),
                normal: sanitize_angle(p1.angle_to(p2) + turn),
            });
        }

        // vertex i joins line i to line i + 1
        for i in 0..count {
            let next = (i + 1) % count;
            let prev_n = self.lines[base + i].normal;
            let next_n = self.lines[base + next].normal;
            let middle = (sanitize_angle(prev_n + 180 - next_n) - 180) / 2 + next_n;
            self.vertices.push(FieldVertex {
                point: points[next],
                normal: sanitize_angle(middle),
            });
        }
        true
    }

    /// Finds the nearest boundary point to `(x, y)`.
    ///
    /// An empty field reports an infinite distance and never inside.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn find_nearest(&self, x: i32, y: i32) -> FieldNearest {
        let mut nearest = FieldNearest::NONE;

        for line in &self.lines {
            let vx = line.p2.x - line.p1.x;
            let vy = line.p2.y - line.p1.y;
            let len_sq = length_squared(vx, vy);
            if len_sq == 0 {
                continue;
            }
            let dot = i64::from(vx) * i64::from(x - line.p1.x)
                + i64::from(vy) * i64::from(y - line.p1.y);
            let t = dot as f32 / len_sq as f32;
            if !(0.0..=1.0).contains(&t) {
                continue;
            }
            let px = lerp(line.p1.x, line.p2.x, t);
            let py = lerp(line.p1.y, line.p2.y, t);
            let distance_squared = length_squared(x - px, y - py);
            if distance_squared < nearest.distance_squared {
                nearest.point = Point::new(px, py);
                nearest.normal = line.normal;
                nearest.distance_squared = distance_squared;
            }
        }

        for vertex in &self.vertices {
            let distance_squared = length_squared(x - vertex.point.x, y - vertex.point.y);
            if distance_squared < nearest.distance_squared {
                nearest.point = vertex.point;
                nearest.normal = vertex.normal;
                nearest.distance_squared = distance_squared;
            }
        }

        if nearest.distance_squared == i64::MAX {
            return nearest;
        }
        let from_nearest = angle_to(nearest.point.x, nearest.point.y, x, y);
        nearest.is_inside = is_reflex(from_nearest, nearest.normal);
        nearest
    }
}
