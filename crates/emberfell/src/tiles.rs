//! Solid/open tile grid of a region.
//!
//! The only region data the simulation consumes. Both the collision field
//! and the navigation grid are derived from it on region load.

use crate::error::{SimError, SimResult};

/// A side of a tile, in clockwise order starting at left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileSide {
    /// -x
    Left,
    /// -y
    Up,
    /// +x
    Right,
    /// +y
    Down,
}

impl TileSide {
    /// Every side, clockwise from left.
    pub const ALL: [Self; 4] = [Self::Left, Self::Up, Self::Right, Self::Down];

    /// Tile offset of the neighbour across this side.
    #[must_use]
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Self::Left => (-1, 0),
            Self::Up => (0, -1),
            Self::Right => (1, 0),
            Self::Down => (0, 1),
        }
    }
}

/// Row-major grid of solid flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileGrid {
    width: usize,
    height: usize,
    solid: Vec<bool>,
}

impl TileGrid {
    /// Creates an all-open grid.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            solid: vec![false; width * height],
        }
    }

    /// Creates a grid from row-major solid flags.
    ///
    /// # Errors
    ///
    /// [`SimError::NavGridSizeMismatch`] if `solid` is not `width * height` long.
    pub fn from_cells(width: usize, height: usize, solid: Vec<bool>) -> SimResult<Self> {
        if solid.len() != width * height {
            return Err(SimError::NavGridSizeMismatch {
                expected: width * height,
                actual: solid.len(),
            });
        }
        Ok(Self {
            width,
            height,
            solid,
        })
    }

    /// Parses rows of text where `#` is solid and anything else is open.
    ///
    /// The width is that of the longest row. Short rows are padded open.
    #[must_use]
    pub fn from_rows(rows: &[&str]) -> Self {
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
        let mut grid = Self::new(width, rows.len());
        for (y, row) in rows.iter().enumerate() {
            for (x, c) in row.chars().enumerate() {
                grid.solid[y * width + x] = c == '#';
            }
        }
        grid
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

    /// Row-major solid flags.
    #[must_use]
    pub fn cells(&self) -> &[bool] {
        &self.solid
    }

    /// Whether a tile is solid. Tiles outside the grid are solid.
    #[must_use]
    pub fn is_solid(&self, x: i32, y: i32) -> bool {
        match (usize::try_from(x), usize::try_from(y)) {
            (Ok(x), Ok(y)) if x < self.width && y < self.height => self.solid[y * self.width + x],
            _ => true,
        }
    }

    /// Marks a tile solid or open. Out-of-grid writes are ignored.
    pub fn set_solid(&mut self, x: usize, y: usize, solid: bool) {
        if x < self.width && y < self.height {
            self.solid[y * self.width + x] = solid;
        }
    }

    /// Whether the neighbour across `side` is solid.
    #[must_use]
    pub fn is_side_blocked(&self, x: i32, y: i32, side: TileSide) -> bool {
        let (dx, dy) = side.offset();
        self.is_solid(x + dx, y + dy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows() {
        let grid = TileGrid::from_rows(&["#..", ".#"]);
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 2);
        assert!(grid.is_solid(0, 0));
        assert!(!grid.is_solid(1, 0));
        assert!(grid.is_solid(1, 1));
        assert!(!grid.is_solid(2, 1));
    }

    #[test]
    fn test_outside_is_solid() {
        let grid = TileGrid::new(2, 2);
        assert!(!grid.is_solid(0, 0));
        assert!(grid.is_solid(-1, 0));
        assert!(grid.is_solid(2, 0));
        assert!(grid.is_solid(0, 2));
        assert!(grid.is_side_blocked(0, 0, TileSide::Left));
        assert!(!grid.is_side_blocked(0, 0, TileSide::Right));
    }

    #[test]
    fn test_from_cells_checks_length() {
        assert!(TileGrid::from_cells(2, 2, vec![false; 4]).is_ok());
        assert_eq!(
            TileGrid::from_cells(2, 2, vec![false; 3]),
            Err(SimError::NavGridSizeMismatch {
                expected: 4,
                actual: 3
            })
        );
    }
}
