//! Boundary loops around the open space of a tile grid.
//!
//! Every side of an open tile that faces a solid tile (or the grid border)
//! becomes a unit edge. Edges run with solid space on their left as seen on
//! screen, so loops come out counter-clockwise and their normals point into
//! open space.
//!
//! ```text
//!   (x,y) ──up──> (x+1,y)
//!     ^              │
//!    left          right
//!     │              v
//!   (x,y+1) <─down─ (x+1,y+1)
//! ```

use crate::tiles::{TileGrid, TileSide};
use emberfell_shared::{Point, TILE_UNITS};
use std::collections::HashMap;

type Corner = (i32, i32);

#[derive(Clone, Copy, Debug)]
struct UnitEdge {
    start: Corner,
    end: Corner,
    tile: Corner,
}

impl UnitEdge {
    fn new(x: i32, y: i32, side: TileSide) -> Self {
        let (start, end) = match side {
            TileSide::Left => ((x, y + 1), (x, y)),
            TileSide::Up => ((x, y), (x + 1, y)),
            TileSide::Right => ((x + 1, y), (x + 1, y + 1)),
            TileSide::Down => ((x + 1, y + 1), (x, y + 1)),
        };
        Self {
            start,
            end,
            tile: (x, y),
        }
    }

    fn direction(self) -> Corner {
        (self.end.0 - self.start.0, self.end.1 - self.start.1)
    }
}

fn collect_edges(grid: &TileGrid) -> Vec<UnitEdge> {
    let mut edges = Vec::new();
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    let (width, height) = (grid.width() as i32, grid.height() as i32);
    for y in 0..height {
        for x in 0..width {
            if grid.is_solid(x, y) {
                continue;
            }
            for side in TileSide::ALL {
                if grid.is_side_blocked(x, y, side) {
                    edges.push(UnitEdge::new(x, y, side));
                }
            }
        }
    }
    edges
}

/// Extracts the closed boundary loops of a grid's open space.
///
/// Points are corners only, scaled to world units. At a corner shared by
/// two diagonal open tiles, a loop keeps following the tile it arrived on.
#[must_use]
pub fn build_edge_loops(grid: &TileGrid) -> Vec<Vec<Point>> {
    let edges = collect_edges(grid);

    let mut outgoing: HashMap<Corner, Vec<usize>> = HashMap::new();
    for (i, edge) in edges.iter().enumerate() {
        outgoing.entry(edge.start).or_default().push(i);
    }

    let mut used = vec![false; edges.len()];
    let mut loops = Vec::new();

    for first in 0..edges.len() {
        if used[first] {
            continue;
        }
        used[first] = true;
        let mut chain = vec![first];
        let mut current = first;

        let closed = loop {
            let candidates = outgoing
                .get(&edges[current].end)
                .map(Vec::as_slice)
                .unwrap_or_default();
            let open = |&&i: &&usize| !used[i] || i == first;
            let next = candidates
                .iter()
                .filter(open)
                .find(|&&i| edges[i].tile == edges[current].tile)
                .or_else(|| candidates.iter().find(open))
                .copied();
            match next {
                Some(i) if i == first => break true,
                Some(i) => {
                    used[i] = true;
                    chain.push(i);
                    current = i;
                }
                None => break false,
            }
        };

        if !closed {
            tracing::warn!("failed to close edge loop at tile {:?}", edges[first].tile);
            continue;
        }

        let count = chain.len();
        let corners: Vec<Point> = (0..count)
            .filter(|&k| {
                let prev = edges[chain[(k + count - 1) % count]];
                edges[chain[k]].direction() != prev.direction()
            })
            .map(|k| {
                let (x, y) = edges[chain[k]].start;
                Point::new(x * TILE_UNITS, y * TILE_UNITS)
            })
            .collect();
        loops.push(corners);
    }

    loops
}
