// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};

use canopy_collision::{
    ClosestCenter, CollisionDetector, CollisionInput, PointerWithin, RectIntersection,
};
use canopy_geometry::from_ltwh;
use kurbo::{Point, Rect};

fn gen_grid_droppables(n: usize, cell: f64) -> Vec<(u32, Rect)> {
    let mut out = Vec::with_capacity(n * n);
    for y in 0..n {
        for x in 0..n {
            let id = (y * n + x) as u32;
            out.push((id, from_ltwh(x as f64 * cell, y as f64 * cell, cell, cell)));
        }
    }
    out
}

fn bench_detector<D: CollisionDetector<u32>>(c: &mut Criterion, name: &str, detector: D) {
    let mut group = c.benchmark_group(name);
    for &n in &[8usize, 16, 32] {
        let droppables = gen_grid_droppables(n, 10.0);
        // A draggable straddling four cells near the middle of the grid.
        let mid = n as f64 * 5.0;
        let input = CollisionInput {
            draggable_rect: from_ltwh(mid - 7.0, mid - 7.0, 14.0, 14.0),
            pointer: Some(Point::new(mid, mid)),
            droppables: &droppables,
        };
        group.throughput(Throughput::Elements((n * n) as u64));
        group.bench_function(format!("detect_n{}", n * n), |b| {
            b.iter(|| {
                let hits = detector.detect(black_box(&input));
                black_box(hits.len());
            })
        });
    }
    group.finish();
}

fn bench_rect_intersection(c: &mut Criterion) {
    bench_detector(c, "rect_intersection", RectIntersection);
}

fn bench_closest_center(c: &mut Criterion) {
    bench_detector(c, "closest_center", ClosestCenter);
}

fn bench_pointer_within(c: &mut Criterion) {
    bench_detector(c, "pointer_within", PointerWithin);
}

criterion_group!(
    benches,
    bench_rect_intersection,
    bench_closest_center,
    bench_pointer_within,
);
criterion_main!(benches);
