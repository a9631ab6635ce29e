//! # Field and Tick Benchmark
//!
//! Measures the spatial work behind a tick:
//! - building the collision field from a tile region
//! - nearest-boundary queries, as wall resolution issues them
//! - grid pathfinding across a walled region
//! - a full simulation tick with a crowd of solids
//!
//! Run with: `cargo bench --package emberfell`

// Benchmarks don't need docs
#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use emberfell::{
    Content, FieldConfig, InputState, NavGrid, NavGridConfig, SimConfig, Simulation, TileGrid,
    Field,
};
use emberfell_shared::Point;

const CROWD_CONTENT: &str = r#"
    [[prefabs]]
    name = "player"
    controller = "player"
    actor = true

    [[prefabs]]
    name = "slime"
    controller = "enemy"
    actor = true
    faction = 1
    alert_radius = 200
"#;

/// A 64x64 region with a border and a scatter of pillars.
fn region() -> TileGrid {
    let mut grid = TileGrid::new(64, 64);
    for i in 0..64 {
        grid.set_solid(i, 0, true);
        grid.set_solid(i, 63, true);
        grid.set_solid(0, i, true);
        grid.set_solid(63, i, true);
    }
    for y in (4..60).step_by(6) {
        for x in (4..60).step_by(5) {
            if (x + y) % 3 != 0 {
                grid.set_solid(x, y, true);
            }
        }
    }
    grid
}

/// Benchmark: rebuild the field from tiles.
fn bench_field_build(c: &mut Criterion) {
    let grid = region();
    c.bench_function("field_from_tiles_64x64", |b| {
        b.iter(|| black_box(Field::from_tiles(&grid, FieldConfig::default()).line_count()));
    });
}

/// Benchmark: nearest-boundary queries over the region.
fn bench_find_nearest(c: &mut Criterion) {
    let field = Field::from_tiles(&region(), FieldConfig::default());
    c.bench_function("find_nearest_x1000", |b| {
        b.iter(|| {
            let mut inside = 0u32;
            for i in 0..1000 {
                let x = (i * 97) % (64 * 256);
                let y = (i * 61) % (64 * 256);
                if field.find_nearest(black_box(x), black_box(y)).is_inside {
                    inside += 1;
                }
            }
            black_box(inside)
        });
    });
}

/// Benchmark: corner to corner routes of growing reach.
fn bench_find_path(c: &mut Criterion) {
    let mut navgrid = NavGrid::new(NavGridConfig::default());
    navgrid.set_tiles(&region()).unwrap();
    let mut group = c.benchmark_group("find_path");

    for reach in [8, 24, 60] {
        group.bench_with_input(BenchmarkId::from_parameter(reach), &reach, |b, &reach| {
            b.iter(|| {
                black_box(navgrid.find_path(Point::new(1, 1), Point::new(reach, reach), 1024))
            });
        });
    }

    group.finish();
}

/// Benchmark: whole ticks with a crowd chasing the player.
fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick");

    for crowd in [16, 64, 200] {
        let content = Content::from_toml_str(CROWD_CONTENT).unwrap();
        let mut sim = Simulation::new(SimConfig::default(), content).unwrap();
        sim.load_region(&region()).unwrap();
        sim.spawn_named(32 * 256, 32 * 256, "player");
        for i in 0..crowd {
            let x = 2 + (i * 7) % 60;
            let y = 2 + (i * 13) % 60;
            sim.spawn_named(x * 256 + 128, y * 256 + 128, "slime");
        }

        let input = InputState::new();
        group.bench_with_input(BenchmarkId::from_parameter(crowd), &crowd, |b, _| {
            b.iter(|| sim.tick(black_box(&input)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_field_build,
    bench_find_nearest,
    bench_find_path,
    bench_tick,
);
criterion_main!(benches);
