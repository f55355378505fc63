/*
 * Nexus Simulation Benchmark
 *
 * Measures the per-frame cost of the simulation: the full advance step
 * (with and without parallel wobble) and level-of-detail forwarding.
 */

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use nannou::prelude::vec3;
use std::time::Duration;

use nexuses::headless::CountingSink;
use nexuses::{forward_visible, LodSelector, SimulationParams, Simulation};

fn params(points: usize, parallel: bool) -> SimulationParams {
    SimulationParams {
        points_per_nexus: points,
        enable_parallel: parallel,
        rng_seed: Some(0xBEEF),
        ..SimulationParams::default()
    }
}

// Benchmark one advance call for different point counts
fn bench_advance(c: &mut Criterion) {
    let mut group = c.benchmark_group("advance");

    for points in [500, 2000, 8000].iter() {
        for parallel in [false, true] {
            let label = if parallel { "parallel" } else { "sequential" };
            group.bench_with_input(BenchmarkId::new(label, points), points, |b, &n| {
                let mut simulation = Simulation::new(params(n, parallel)).expect("simulation");
                let camera = vec3(0.0, 1.6, 0.0);

                b.iter(|| {
                    simulation.advance(black_box(1.0 / 60.0), camera);
                });
            });
        }
    }

    group.finish();
}

// Benchmark LOD selection and forwarding from near and far cameras
fn bench_lod_forwarding(c: &mut Criterion) {
    let mut group = c.benchmark_group("lod_forwarding");
    let simulation = Simulation::new(params(2000, false)).expect("simulation");
    let selector = LodSelector::new(simulation.params().lod_levels.clone());

    for distance in [0.0f32, 25.0, 100.0].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(distance), distance, |b, &d| {
            let camera = vec3(d, 1.6, 0.0);

            b.iter(|| {
                let mut sink = CountingSink::default();
                black_box(forward_visible(&simulation, camera, Some(&selector), &mut sink))
            });
        });
    }

    group.finish();
}

// Configure the benchmarks
criterion_group! {
    name = benches;
    config = Criterion::default()
        .sample_size(10)
        .measurement_time(Duration::from_secs(5))
        .warm_up_time(Duration::from_secs(1));
    targets = bench_advance, bench_lod_forwarding
}

criterion_main!(benches);
