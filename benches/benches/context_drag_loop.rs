// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};

use canopy_core::{DndContext, MeasuringConfig, MeasuringFrequency, MeasuringStrategy};
use canopy_geometry::from_ltwh;
use kurbo::{Point, Rect};

type Ctx = DndContext<u32, Rect>;

fn always_optimized() -> MeasuringConfig {
    MeasuringConfig::new(MeasuringStrategy::Always, MeasuringFrequency::Optimized)
}

/// Context with `count` droppables laid out in a row, committed and measured.
fn populated_ctx(count: usize) -> Ctx {
    let mut ctx = Ctx::new(always_optimized());
    let _ = ctx.register_draggable(0, from_ltwh(0.0, 0.0, 10.0, 10.0), None, ());
    for i in 0..count {
        let _ = ctx.register_droppable(
            (i + 1) as u32,
            from_ltwh(i as f64 * 12.0, 0.0, 10.0, 10.0),
            (),
        );
    }
    let _ = ctx.commit();
    ctx.run_scheduled();
    ctx
}

fn bench_register_commit(c: &mut Criterion) {
    let mut group = c.benchmark_group("register_commit");
    for &n in &[64usize, 256, 1024] {
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("batch_n{n}"), |b| {
            b.iter_batched(
                || Ctx::new(always_optimized()),
                |mut ctx| {
                    for i in 0..n {
                        let _ = ctx.register_droppable(
                            i as u32,
                            from_ltwh(i as f64 * 12.0, 0.0, 10.0, 10.0),
                            (),
                        );
                    }
                    let summary = ctx.commit();
                    black_box(summary.droppables_registered.len());
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_measure_cycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("measure_cycle");
    for &n in &[64usize, 256, 1024] {
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("full_cycle_n{n}"), |b| {
            b.iter_batched(
                || populated_ctx(n),
                |mut ctx| {
                    ctx.request_measure_all();
                    black_box(ctx.run_scheduled());
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_drag_moves(c: &mut Criterion) {
    let mut group = c.benchmark_group("drag_moves");
    for &n in &[64usize, 256] {
        group.throughput(Throughput::Elements(256));
        group.bench_function(format!("moves256_droppables{n}"), |b| {
            b.iter_batched(
                || {
                    let mut ctx = populated_ctx(n);
                    ctx.drag_start(0, Point::new(0.0, 0.0));
                    ctx
                },
                |mut ctx| {
                    // Sweep across the row; every move re-ranks collisions.
                    for step in 0..256u32 {
                        ctx.drag_move(Point::new(f64::from(step) * 2.0, 0.0));
                        black_box(ctx.drop_target().map(|t| t.id));
                    }
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_register_commit,
    bench_measure_cycle,
    bench_drag_moves,
);
criterion_main!(benches);
