// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=canopy_geometry --heading-base-level=0

//! Canopy Geometry: rectangle helpers and node measurement.
//!
//! This crate is the leaf of the Canopy stack. It provides:
//!
//! - Pure helpers over [`kurbo::Rect`] for the handful of operations the
//!   drag-and-drop core needs: construction from a left/top origin,
//!   translation, scaling, intersection area, and squared center distance.
//! - The [`Measurable`] trait, the seam between the core and whatever owns
//!   live node geometry. A measurement can fail (detached or hidden node),
//!   so it returns `Option<Rect>`.
//!
//! Higher layers (`canopy_core`, `canopy_collision`) consume these without
//! knowing where rectangles come from.
//!
//! # Example
//!
//! ```rust
//! use canopy_geometry::{from_ltwh, intersection_area, translated, Measurable};
//! use kurbo::Vec2;
//!
//! let a = from_ltwh(0.0, 0.0, 10.0, 10.0);
//! let b = from_ltwh(5.0, 5.0, 10.0, 10.0);
//! assert_eq!(intersection_area(a, b), 25.0);
//!
//! // A bare Rect is its own measurement; useful for tests and fixed layouts.
//! let moved = translated(a, Vec2::new(5.0, 5.0));
//! assert_eq!(moved.measure(), Some(b));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod measure;
pub mod rect;

pub use measure::Measurable;
pub use rect::{center_distance_squared, from_ltwh, intersection_area, scaled, translated};
