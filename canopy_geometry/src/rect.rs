// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pure rectangle helpers over [`kurbo::Rect`].
//!
//! Inputs are assumed finite (no NaNs). All functions are value-in/value-out;
//! none of them touch shared state, so they can be re-evaluated every frame.

use kurbo::{Rect, Vec2};

/// Build a [`Rect`] from a left/top origin plus extents.
///
/// This matches the `{left, top, width, height}` shape produced by client
/// rectangle measurements; `right`/`bottom` are derived.
#[inline]
pub fn from_ltwh(left: f64, top: f64, width: f64, height: f64) -> Rect {
    Rect::new(left, top, left + width, top + height)
}

/// Translate a rectangle by `delta`, preserving its extents.
#[inline]
pub fn translated(rect: Rect, delta: Vec2) -> Rect {
    Rect::new(
        rect.x0 + delta.x,
        rect.y0 + delta.y,
        rect.x1 + delta.x,
        rect.y1 + delta.y,
    )
}

/// Scale a rectangle's extents about its own left/top corner.
///
/// Used to undo or apply a node's layout scale without moving its origin.
#[inline]
pub fn scaled(rect: Rect, sx: f64, sy: f64) -> Rect {
    Rect::new(
        rect.x0,
        rect.y0,
        rect.x0 + rect.width() * sx,
        rect.y0 + rect.height() * sy,
    )
}

/// Area of the overlap of two rectangles; `0.0` when they are disjoint.
#[inline]
pub fn intersection_area(a: Rect, b: Rect) -> f64 {
    let w = (a.x1.min(b.x1) - a.x0.max(b.x0)).max(0.0);
    let h = (a.y1.min(b.y1) - a.y0.max(b.y0)).max(0.0);
    w * h
}

/// Squared distance between the centers of two rectangles.
///
/// Squared on purpose: ranking only needs a monotonic metric, and skipping the
/// square root keeps this available without `std` or `libm`.
#[inline]
pub fn center_distance_squared(a: Rect, b: Rect) -> f64 {
    a.center().distance_squared(b.center())
}
