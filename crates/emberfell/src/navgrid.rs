//! # Navigation Grid
//!
//! Greedy best-first search over a solid/open tile grid.
//!
//! The search runs backward from the destination, always expanding the open
//! cell nearest (Manhattan) to the start, so back-pointers lead from the
//! start toward the destination. Routes are short-range and not guaranteed
//! optimal.

use crate::config::NavGridConfig;
use crate::error::{SimError, SimResult};
use crate::tiles::TileGrid;
use emberfell_shared::Point;

/// A route found by [`NavGrid::find_path`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Route {
    /// Tile coordinates from the start toward the destination. The start is
    /// included, the destination is not.
    pub waypoints: Vec<Point>,
    /// Full route length, which may exceed `waypoints.len()`.
    pub length: usize,
}

impl Route {
    /// Whether the route was truncated to the requested maximum.
    #[inline]
    #[must_use]
    pub fn is_incomplete(&self) -> bool {
        self.length > self.waypoints.len()
    }
}

/// Result of a path search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PathOutcome {
    /// A route exists.
    Found(Route),
    /// Every reachable cell was searched without meeting the start.
    Unreachable,
    /// The start or destination lies outside the grid.
    OutOfBounds,
}

/// Pathfinding grid.
#[derive(Clone, Debug, Default)]
pub struct NavGrid {
    width: usize,
    height: usize,
    solid: Vec<bool>,
    config: NavGridConfig,
}

impl NavGrid {
    /// Creates an empty grid with the given bounds.
    #[must_use]
    pub fn new(config: NavGridConfig) -> Self {
        Self {
            width: 0,
            height: 0,
            solid: Vec::new(),
            config,
        }
    }

    /// Width in tiles.
    #[inline]
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in tiles.
    #[inline]
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Replaces the grid.
    ///
    /// The previous grid is kept if the new one is rejected.
    ///
    /// # Errors
    ///
    /// - [`SimError::NavGridTooLarge`] past the configured bounds
    /// - [`SimError::NavGridSizeMismatch`] if `solid` is not `width * height` long
    pub fn set(&mut self, width: usize, height: usize, solid: &[bool]) -> SimResult<()> {
        if width > self.config.max_width || height > self.config.max_height {
            tracing::warn!("data too large for navgrid: {width}x{height}");
            return Err(SimError::NavGridTooLarge {
                width,
                height,
                max_width: self.config.max_width,
                max_height: self.config.max_height,
            });
        }
        if solid.len() != width * height {
            tracing::warn!("navgrid data size mismatch");
            return Err(SimError::NavGridSizeMismatch {
                expected: width * height,
                actual: solid.len(),
            });
        }

        self.width = width;
        self.height = height;
        self.solid.clear();
        self.solid.extend_from_slice(solid);
        Ok(())
    }

    /// Replaces the grid with a tile grid's solid flags.
    ///
    /// # Errors
    ///
    /// As [`NavGrid::set`].
    pub fn set_tiles(&mut self, grid: &TileGrid) -> SimResult<()> {
        self.set(grid.width(), grid.height(), grid.cells())
    }

    fn index(&self, p: Point) -> Option<usize> {
        let x = usize::try_from(p.x).ok()?;
        let y = usize::try_from(p.y).ok()?;
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }

    /// Whether a cell is solid. Cells outside the grid are solid.
    #[must_use]
    pub fn is_solid(&self, x: i32, y: i32) -> bool {
        self.index(Point::new(x, y)).map_or(true, |i| self.solid[i])
    }

    /// Searches for a route between two tiles.
    ///
    /// # Arguments
    ///
    /// * `from` - Start tile
    /// * `to` - Destination tile
    /// * `max_length` - Waypoints to keep; the full length is still reported
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub fn find_path(&self, from: Point, to: Point, max_length: usize) -> PathOutcome {
        let (Some(start), Some(dest)) = (self.index(from), self.index(to)) else {
            return PathOutcome::OutOfBounds;
        };

        let cells = self.width * self.height;
        let mut visited = vec![false; cells];
        let mut nexts = vec![Point::ZERO; cells];
        let mut open = Vec::with_capacity(cells);

        visited[dest] = true;
        open.push(to);

        let manhattan = |p: Point| (p.x - from.x).abs() + (p.y - from.y).abs();

        let mut found = false;
        while !open.is_empty() {
            let mut closest = 0;
            let mut closest_dist = manhattan(open[0]);
            for (i, &p) in open.iter().enumerate().skip(1) {
                let dist = manhattan(p);
                if dist < closest_dist {
                    closest = i;
                    closest_dist = dist;
                }
            }
            let current = open.swap_remove(closest);

            if current == from {
                found = true;
                break;
            }

            for nx in current.x - 1..=current.x + 1 {
                for ny in current.y - 1..=current.y + 1 {
                    let n = Point::new(nx, ny);
                    if n == current {
                        continue;
                    }
                    let Some(index) = self.index(n) else {
                        continue;
                    };
                    if visited[index] || self.solid[index] {
                        continue;
                    }
                    visited[index] = true;
                    nexts[index] = current;
                    open.push(n);
                }
            }
        }

        if !found {
            return PathOutcome::Unreachable;
        }

        let mut waypoints = Vec::with_capacity(max_length.min(cells));
        let mut length = 0;
        let mut current = from;
        let mut index = start;
        while index != dest {
            if length < max_length {
                waypoints.push(current);
            }
            length += 1;
            current = nexts[index];
            index = current.y as usize * self.width + current.x as usize;
        }

        PathOutcome::Found(Route { waypoints, length })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&str]) -> NavGrid {
        let mut nav = NavGrid::new(NavGridConfig::default());
        nav.set_tiles(&TileGrid::from_rows(rows)).unwrap();
        nav
    }

    fn route(outcome: PathOutcome) -> Route {
        match outcome {
            PathOutcome::Found(route) => route,
            other => panic!("expected a route, got {other:?}"),
        }
    }

    #[test]
    fn test_open_grid_length_at_least_chebyshev() {
        let nav = grid(&["........"; 8]);
        for (from, to) in [
            (Point::new(0, 0), Point::new(7, 7)),
            (Point::new(1, 5), Point::new(6, 2)),
            (Point::new(3, 0), Point::new(3, 7)),
        ] {
            let r = route(nav.find_path(from, to, 16));
            let chebyshev = (to.x - from.x).abs().max((to.y - from.y).abs());
            assert!(r.length >= chebyshev as usize);
            assert_eq!(r.waypoints[0], from);
            assert!(!r.waypoints.contains(&to));
        }
    }

    #[test]
    fn test_diagonal_route_is_direct() {
        let nav = grid(&["....", "....", "....", "...."]);
        let r = route(nav.find_path(Point::new(0, 0), Point::new(3, 3), 16));
        assert_eq!(r.length, 3);
        assert_eq!(
            r.waypoints,
            vec![Point::new(0, 0), Point::new(1, 1), Point::new(2, 2)]
        );
    }

    #[test]
    fn test_walled_destination_is_unreachable() {
        let nav = grid(&[".....", "..###", "..#.#", "..###", "....."]);
        assert_eq!(
            nav.find_path(Point::new(0, 0), Point::new(3, 2), 16),
            PathOutcome::Unreachable
        );
    }

    #[test]
    fn test_routes_around_wall() {
        let nav = grid(&["..#..", "..#..", "..#..", "....."]);
        let r = route(nav.find_path(Point::new(0, 0), Point::new(4, 0), 16));
        assert!(r.length >= 4);
        for p in &r.waypoints {
            assert!(!nav.is_solid(p.x, p.y));
        }
    }

    #[test]
    fn test_truncation_reports_full_length() {
        let nav = grid(&["...................."]);
        let r = route(nav.find_path(Point::new(0, 0), Point::new(19, 0), 4));
        assert_eq!(r.length, 19);
        assert_eq!(r.waypoints.len(), 4);
        assert!(r.is_incomplete());
        assert_eq!(r.waypoints[3], Point::new(3, 0));
    }

    #[test]
    fn test_same_tile_is_empty_route() {
        let nav = grid(&["..", ".."]);
        let r = route(nav.find_path(Point::new(1, 1), Point::new(1, 1), 16));
        assert_eq!(r.length, 0);
        assert!(r.waypoints.is_empty());
        assert!(!r.is_incomplete());
    }

    #[test]
    fn test_out_of_bounds() {
        let nav = grid(&["..", ".."]);
        assert_eq!(
            nav.find_path(Point::new(2, 0), Point::new(0, 0), 16),
            PathOutcome::OutOfBounds
        );
        assert_eq!(
            nav.find_path(Point::new(0, 0), Point::new(0, -1), 16),
            PathOutcome::OutOfBounds
        );
    }

    #[test]
    fn test_oversized_grid_keeps_previous() {
        let mut nav = grid(&["..", ".#"]);
        let err = nav.set(200, 10, &vec![false; 2000]).unwrap_err();
        assert!(matches!(err, SimError::NavGridTooLarge { width: 200, .. }));
        assert_eq!(nav.width(), 2);
        assert!(nav.is_solid(1, 1));

        let err = nav.set(3, 3, &[false; 4]).unwrap_err();
        assert_eq!(
            err,
            SimError::NavGridSizeMismatch {
                expected: 9,
                actual: 4
            }
        );
        assert_eq!(nav.height(), 2);
    }
}
