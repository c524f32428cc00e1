//! Benchmarks for the force grid sweep.
//!
//! Run with: cargo bench -p legreach-force

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use legreach_core::presets;
use legreach_force::{GridAxes, LegForceCalculator};

fn bench_single_point(c: &mut Criterion) {
    let calc = LegForceCalculator::new(presets::phantomx_mk2());
    c.bench_function("max_force_multiplier", |b| {
        b.iter(|| calc.max_force_multiplier(black_box(200.0), black_box(-60.0), 0.0, 1.0));
    });
}

fn bench_grid(c: &mut Criterion) {
    let calc = LegForceCalculator::new(presets::phantomx_mk2());
    let mut group = c.benchmark_group("grid_sweep");

    for step in [10.0, 5.0, 2.0] {
        let axes = GridAxes::from_bounds(-50.0, 300.0, -250.0, 150.0, step).unwrap();
        group.throughput(Throughput::Elements(axes.cell_count() as u64));

        group.bench_with_input(BenchmarkId::new("parallel", step), &axes, |b, axes| {
            b.iter(|| calc.grid_sweep(axes).run());
        });
        group.bench_with_input(BenchmarkId::new("sequential", step), &axes, |b, axes| {
            b.iter(|| calc.grid_sweep(axes).sequential().run());
        });
    }

    group.finish();
}

fn bench_solver_construction(c: &mut Criterion) {
    c.bench_function("solver_new", |b| {
        b.iter(|| LegForceCalculator::new(black_box(presets::phantomx_mk2())));
    });
}

criterion_group!(benches, bench_single_point, bench_grid, bench_solver_construction);
criterion_main!(benches);
