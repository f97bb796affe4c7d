// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Built-in collision detectors.
//!
//! Each detector ranks by a single metric and relies on a stable sort so that
//! equal metrics keep input (registration) order. Metrics are finite for
//! finite inputs; a NaN comparison falls back to `Ordering::Equal`, keeping
//! the sort stable rather than panicking.

use alloc::vec::Vec;
use core::cmp::Ordering;

use canopy_geometry::{center_distance_squared, intersection_area};

use crate::types::{Collision, CollisionDetector, CollisionInput};

/// Rank by overlap area, largest first. Containers that do not overlap the
/// draggable are not candidates.
#[derive(Copy, Clone, Debug, Default)]
pub struct RectIntersection;

impl<K: Clone> CollisionDetector<K> for RectIntersection {
    fn detect(&self, input: &CollisionInput<'_, K>) -> Vec<Collision<K>> {
        let mut out = Vec::new();
        for (id, rect) in input.droppables {
            let area = intersection_area(input.draggable_rect, *rect);
            if area > 0.0 {
                out.push(Collision {
                    id: id.clone(),
                    metric: area,
                });
            }
        }
        out.sort_by(|a, b| b.metric.partial_cmp(&a.metric).unwrap_or(Ordering::Equal));
        out
    }
}

/// Rank every container by squared center-to-center distance, nearest first.
///
/// Unlike [`RectIntersection`] this never yields an empty list while any
/// container is measurable, which suits sortable-list style interactions
/// where the nearest slot should win even without overlap.
#[derive(Copy, Clone, Debug, Default)]
pub struct ClosestCenter;

impl<K: Clone> CollisionDetector<K> for ClosestCenter {
    fn detect(&self, input: &CollisionInput<'_, K>) -> Vec<Collision<K>> {
        let mut out = Vec::new();
        for (id, rect) in input.droppables {
            out.push(Collision {
                id: id.clone(),
                metric: center_distance_squared(input.draggable_rect, *rect),
            });
        }
        out.sort_by(|a, b| a.metric.partial_cmp(&b.metric).unwrap_or(Ordering::Equal));
        out
    }
}

/// Rank containers whose rectangle contains the pointer, nearest center
/// first. Yields nothing when the session has no pointer position.
#[derive(Copy, Clone, Debug, Default)]
pub struct PointerWithin;

impl<K: Clone> CollisionDetector<K> for PointerWithin {
    fn detect(&self, input: &CollisionInput<'_, K>) -> Vec<Collision<K>> {
        let Some(pointer) = input.pointer else {
            return Vec::new();
        };
        let mut out = Vec::new();
        for (id, rect) in input.droppables {
            if rect.contains(pointer) {
                out.push(Collision {
                    id: id.clone(),
                    metric: pointer.distance_squared(rect.center()),
                });
            }
        }
        out.sort_by(|a, b| a.metric.partial_cmp(&b.metric).unwrap_or(Ordering::Equal));
        out
    }
}
