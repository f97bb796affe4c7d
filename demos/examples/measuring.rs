// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Measurement coalescing and self-healing, with a host that logs slots.
//!
//! Shows that repeated measure requests collapse into one idle slot, that an
//! unmeasurable container is omitted and then healed, and that geometry
//! changes surface on the next full cycle.
//!
//! Run:
//! - `cargo run -p canopy_demos --example measuring`

use std::cell::Cell;
use std::rc::Rc;

use canopy_collision::RectIntersection;
use canopy_core::{
    DndContext, MeasuringConfig, MeasuringFrequency, MeasuringStrategy, ScheduleHost,
};
use canopy_geometry::from_ltwh;
use kurbo::Rect;

/// Prints every slot the context asks for.
#[derive(Debug, Default)]
struct LoggingHost {
    idle_requests: u32,
}

impl ScheduleHost for LoggingHost {
    fn request_idle(&mut self) {
        self.idle_requests += 1;
        println!("  host: idle slot requested (#{})", self.idle_requests);
    }
    fn cancel_idle(&mut self) {
        println!("  host: idle slot canceled");
    }
    fn request_frame(&mut self) {
        println!("  host: frame slot requested");
    }
    fn request_timeout(&mut self, delay_ms: u32) {
        println!("  host: timeout slot requested ({delay_ms}ms)");
    }
}

type Node = Rc<Cell<Option<Rect>>>;

fn main() {
    let config = MeasuringConfig::new(MeasuringStrategy::Always, MeasuringFrequency::Optimized);
    let mut ctx: DndContext<&str, Node, (), RectIntersection, LoggingHost> =
        DndContext::with_parts(config, RectIntersection, LoggingHost::default());

    let list: Node = Rc::new(Cell::new(Some(from_ltwh(0.0, 0.0, 100.0, 40.0))));
    let detached: Node = Rc::new(Cell::new(None));
    let _list_key = ctx.register_droppable("list", Rc::clone(&list), ());
    let _detached_key = ctx.register_droppable("detached", Rc::clone(&detached), ());

    println!("== Commit ==");
    let _ = ctx.commit();

    println!("== Burst of requests, one cycle ==");
    ctx.request_measure(["list"]);
    ctx.request_measure(["detached"]);
    ctx.request_measure_all();
    ctx.run_scheduled();
    println!(
        "  measured {} of {} containers (detached node omitted)",
        ctx.droppable_rects().len(),
        2
    );
    assert_eq!(ctx.droppable_rects().len(), 1);

    println!("== Node attaches; next cycle heals it ==");
    detached.set(Some(from_ltwh(0.0, 50.0, 100.0, 40.0)));
    ctx.request_measure_all();
    ctx.run_scheduled();
    assert_eq!(ctx.droppable_rects().len(), 2);
    println!("  measured {} containers", ctx.droppable_rects().len());

    println!("== Unchanged geometry keeps the snapshot ==");
    ctx.request_measure_all();
    let changed = ctx.run_scheduled();
    println!("  snapshot changed: {changed}");
    assert!(!changed);
}
