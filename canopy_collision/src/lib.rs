// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=canopy_collision --heading-base-level=0

//! Canopy Collision: rank droppable containers against an active draggable.
//!
//! ## Overview
//!
//! Given the draggable's translated rectangle (and optionally the pointer
//! position) plus the measured rectangles of the enabled droppable
//! containers, a [`CollisionDetector`](crate::types::CollisionDetector)
//! produces an ordered candidate list. The first entry is the designated drop
//! target; an empty list means "no target".
//!
//! Detectors are pure functions of their input: no side effects, no hidden
//! state, so a caller can re-run them every frame without drift. Candidate
//! order for equal metrics is stable with respect to input order, which the
//! coordination layer uses to break ties by registration order.
//!
//! ## Built-in detectors
//!
//! - [`RectIntersection`](crate::detectors::RectIntersection): overlap area,
//!   largest first. The default.
//! - [`ClosestCenter`](crate::detectors::ClosestCenter): center-to-center
//!   distance, nearest first; containers need not overlap.
//! - [`PointerWithin`](crate::detectors::PointerWithin): containers under the
//!   pointer, nearest center first.
//!
//! ## Example
//!
//! ```rust
//! use canopy_collision::{CollisionDetector, CollisionInput, RectIntersection};
//! use canopy_geometry::from_ltwh;
//!
//! let droppables = [
//!     ("a", from_ltwh(0.0, 0.0, 8.0, 8.0)),
//!     ("b", from_ltwh(20.0, 20.0, 8.0, 8.0)),
//! ];
//! let input = CollisionInput {
//!     draggable_rect: from_ltwh(5.0, 5.0, 10.0, 10.0),
//!     pointer: None,
//!     droppables: &droppables,
//! };
//! let hits = RectIntersection.detect(&input);
//! assert_eq!(hits.len(), 1);
//! assert_eq!(hits[0].id, "a");
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod detectors;
pub mod types;

pub use detectors::{ClosestCenter, PointerWithin, RectIntersection};
pub use types::{Collision, CollisionDetector, CollisionInput};
