// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=canopy_core --heading-base-level=0

//! Canopy Core: registries, measurement scheduling, and drag-session
//! coordination.
//!
//! ## Overview
//!
//! This crate is the stateful heart of the Canopy drag-and-drop stack. It
//! tracks which elements can be dragged and which can receive drops, holds
//! the active drag session, schedules batched re-measurement of droppable
//! rectangles, and publishes derived state (active id, translation, ranked
//! collisions) for input sensors and renderers to consume. Sensors and
//! rendering live outside this crate; they call in through
//! [`DndContext`](crate::context::DndContext) and re-render from what it
//! publishes.
//!
//! ## Workflow
//!
//! 1) Register: each draggable and droppable registers a node handle
//!    implementing [`canopy_geometry::Measurable`] and gets back a
//!    [`RegistrationKey`](crate::types::RegistrationKey). Registration calls
//!    queue; [`DndContext::commit`](crate::context::DndContext::commit)
//!    applies the turn's batch atomically and reports it as one
//!    [`CommitSummary`](crate::registry::CommitSummary).
//! 2) Drive: a sensor calls `drag_start` / `drag_move` / `drag_end`.
//!    Translation is always `coords - initial`, recomputed per move.
//! 3) Measure: droppable rectangles refresh in coalesced cycles, gated by
//!    [`MeasuringStrategy`](crate::measure::MeasuringStrategy) and paced by
//!    [`MeasuringFrequency`](crate::measure::MeasuringFrequency).
//! 4) Read: `collisions()` ranks enabled droppables against the dragged
//!    rectangle; `drop_target()` is the head of that list.
//!
//! ## Cooperative scheduling contract
//!
//! Everything runs on one thread; nothing blocks. Deferred work goes through
//! the [`ScheduleHost`](crate::sched::ScheduleHost) seam: the context
//! requests idle, frame, and timeout slots, and the host calls back into
//! [`run_scheduled`](crate::context::DndContext::run_scheduled),
//! [`on_frame`](crate::context::DndContext::on_frame), and
//! [`on_timeout`](crate::context::DndContext::on_timeout) when they fire.
//! Three ordering guarantees hold:
//!
//! - registry operations issued in one turn apply as one atomic batch before
//!   the next observable read (`commit`, also flushed by `drag_start` and
//!   `run_scheduled`);
//! - a measurement cycle observes registry state as of its execution, so
//!   registrations that arrive before the idle slot fires are included;
//! - drag moves apply in arrival order, last value wins.
//!
//! Callers must not assume mutation is synchronous: some effects land at the
//! end of the turn or when a requested slot fires.
//!
//! ## Example
//!
//! ```rust
//! use canopy_core::{DndContext, MeasuringConfig, MeasuringFrequency, MeasuringStrategy};
//! use canopy_geometry::from_ltwh;
//! use kurbo::{Point, Rect, Vec2};
//!
//! let config = MeasuringConfig::new(MeasuringStrategy::DuringDrag, MeasuringFrequency::Optimized);
//! let mut ctx: DndContext<&str, Rect> = DndContext::new(config);
//!
//! // Registration queues; commit applies the batch.
//! let _card = ctx.register_draggable("card", from_ltwh(0.0, 0.0, 10.0, 10.0), None, ());
//! let _a = ctx.register_droppable("a", from_ltwh(0.0, 0.0, 8.0, 8.0), ());
//! let _b = ctx.register_droppable("b", from_ltwh(20.0, 20.0, 8.0, 8.0), ());
//! let summary = ctx.commit();
//! assert_eq!(summary.droppables_registered.len(), 2);
//!
//! // A sensor starts a drag; the embedder's frame and idle slots fire.
//! ctx.drag_start("card", Point::new(0.0, 0.0));
//! ctx.on_frame();
//! ctx.run_scheduled();
//!
//! ctx.drag_move(Point::new(5.0, 5.0));
//! assert_eq!(ctx.translation(), Vec2::new(5.0, 5.0));
//! assert_eq!(ctx.drop_target().map(|c| c.id), Some("a"));
//!
//! ctx.drag_end();
//! assert!(!ctx.is_dragging());
//! assert_eq!(ctx.translation(), Vec2::ZERO);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod context;
pub mod measure;
pub mod registry;
pub mod sched;
pub mod session;
pub mod types;

pub use context::DndContext;
pub use measure::{
    MeasuringConfig, MeasuringFrequency, MeasuringScheduler, MeasuringStrategy, PendingScope,
    RectMap,
};
pub use registry::{CommitSummary, Keyed, Registry};
pub use sched::{ManualHost, ScheduleHost};
pub use session::DragSession;
pub use types::{DraggableEntry, DroppableContainer, EntryFlags, RegistrationKey};
