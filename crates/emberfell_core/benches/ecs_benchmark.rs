//! # Entity Store Benchmark
//!
//! Measures the operations a simulation tick leans on:
//! - create/destroy churn at full capacity
//! - snapshot queries over 1, 2 and 4 columns
//! - a query nested inside another, as the pairwise passes do
//!
//! Run with: `cargo bench --package emberfell_core`

// Benchmarks don't need docs
#![allow(missing_docs)]
#![allow(dead_code)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use emberfell_core::{Component, World};

/// Entity capacity used by the benches.
const ENTITY_COUNT: usize = 4096;

#[derive(Clone, Copy, Default)]
struct Location {
    x: i32,
    y: i32,
}
impl Component for Location {}

#[derive(Clone, Copy, Default)]
struct Motion {
    dx: i32,
    dy: i32,
}
impl Component for Motion {}

#[derive(Clone, Copy, Default)]
struct Solid {
    radius: i32,
}
impl Component for Solid {}

#[derive(Clone, Copy, Default)]
struct Actor {
    hp: i32,
}
impl Component for Actor {}

fn populated_world(count: usize) -> World {
    let mut world = World::new(ENTITY_COUNT);
    world.register::<Location>().unwrap();
    world.register::<Motion>().unwrap();
    world.register::<Solid>().unwrap();
    world.register::<Actor>().unwrap();

    for i in 0..count {
        let e = world.create();
        let v = i32::try_from(i).unwrap();
        world.insert(e, Location { x: v * 16, y: v * 8 });
        if i % 2 == 0 {
            world.insert(e, Motion { dx: 1, dy: -1 });
        }
        if i % 3 == 0 {
            world.insert(e, Solid { radius: 128 });
            world.insert(e, Actor { hp: 10 });
        }
    }
    world
}

/// Benchmark: fill the store, then empty it.
fn bench_create_destroy(c: &mut Criterion) {
    let mut group = c.benchmark_group("create_destroy");

    for count in [256, 1024, ENTITY_COUNT] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            let mut world = populated_world(0);
            let mut handles = Vec::with_capacity(count);
            b.iter(|| {
                for _ in 0..count {
                    handles.push(world.create());
                }
                for e in handles.drain(..) {
                    black_box(world.destroy(e));
                }
            });
        });
    }

    group.finish();
}

/// Benchmark: snapshot queries of increasing width.
fn bench_query_snapshot(c: &mut Criterion) {
    let world = populated_world(ENTITY_COUNT);
    let mut group = c.benchmark_group("query_snapshot");

    group.bench_function("one_column", |b| {
        b.iter(|| black_box(world.query::<(Location,)>().count()));
    });
    group.bench_function("two_columns", |b| {
        b.iter(|| black_box(world.query::<(Location, Motion)>().count()));
    });
    group.bench_function("four_columns", |b| {
        b.iter(|| black_box(world.query::<(Location, Motion, Solid, Actor)>().count()));
    });

    group.finish();
}

/// Benchmark: motion integration through typed accessors.
fn bench_motion_integration(c: &mut Criterion) {
    let mut world = populated_world(ENTITY_COUNT);

    c.bench_function("motion_integration", |b| {
        b.iter(|| {
            for e in world.query::<(Location, Motion)>() {
                let Some(&Motion { dx, dy }) = world.get::<Motion>(e) else {
                    continue;
                };
                if let Some(loc) = world.get_mut::<Location>(e) {
                    loc.x += dx;
                    loc.y += dy;
                }
            }
        });
    });
}

/// Benchmark: pairwise pass over solids, as entity pushback does.
fn bench_nested_query(c: &mut Criterion) {
    let world = populated_world(1024);

    c.bench_function("nested_solid_pairs", |b| {
        b.iter(|| {
            let mut overlaps = 0u32;
            for a in world.query::<(Location, Solid)>() {
                let Some(la) = world.get::<Location>(a).copied() else {
                    continue;
                };
                for other in world.query::<(Location, Solid)>() {
                    if other == a {
                        continue;
                    }
                    if let Some(lb) = world.get::<Location>(other) {
                        let dx = i64::from(lb.x - la.x);
                        let dy = i64::from(lb.y - la.y);
                        if dx * dx + dy * dy < 256 * 256 {
                            overlaps += 1;
                        }
                    }
                }
            }
            black_box(overlaps)
        });
    });
}

criterion_group!(
    benches,
    bench_create_destroy,
    bench_query_snapshot,
    bench_motion_integration,
    bench_nested_query,
);
criterion_main!(benches);
