// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A full drag lifecycle driven by hand.
//!
//! Registers one draggable card and two drop zones, starts a drag, moves the
//! pointer, and prints the ranked collisions at each step.
//!
//! Run:
//! - `cargo run -p canopy_demos --example drag_basics`

use canopy_core::{DndContext, MeasuringConfig, MeasuringFrequency, MeasuringStrategy};
use canopy_geometry::from_ltwh;
use kurbo::{Point, Rect};

fn main() {
    let config =
        MeasuringConfig::new(MeasuringStrategy::DuringDrag, MeasuringFrequency::Optimized);
    let mut ctx: DndContext<&str, Rect> = DndContext::new(config);

    let _card = ctx.register_draggable("card", from_ltwh(0.0, 0.0, 10.0, 10.0), None, ());
    let _left = ctx.register_droppable("left", from_ltwh(0.0, 0.0, 20.0, 20.0), ());
    let _right = ctx.register_droppable("right", from_ltwh(30.0, 0.0, 20.0, 20.0), ());
    let summary = ctx.commit();
    println!(
        "== Registered ==\n  {} droppables in one batch",
        summary.droppables_registered.len()
    );

    ctx.drag_start("card", Point::new(5.0, 5.0));
    // With a ManualHost we play the environment: frame, then idle.
    ctx.on_frame();
    ctx.run_scheduled();
    println!("== Drag start ==\n  active: {:?}", ctx.active_id());

    for target in [Point::new(10.0, 5.0), Point::new(28.0, 5.0), Point::new(45.0, 5.0)] {
        ctx.drag_move(target);
        let hits: Vec<_> = ctx.collisions().iter().map(|c| c.id).collect();
        println!(
            "  move to {:?} -> translation {:?}, candidates {:?}",
            target,
            ctx.translation(),
            hits
        );
    }

    let dropped_on = ctx.drop_target().map(|c| c.id);
    ctx.drag_end();
    println!("== Drag end ==\n  dropped on {:?}", dropped_on);

    assert_eq!(dropped_on, Some("right"));
    assert!(!ctx.is_dragging());
}
