// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Detector inputs and outputs.

use alloc::vec::Vec;
use kurbo::{Point, Rect};

/// One ranked candidate drop target.
///
/// `metric` is detector-specific (overlap area for
/// [`RectIntersection`](crate::detectors::RectIntersection), squared distance
/// for the distance-based detectors); it is only meaningful relative to other
/// candidates from the same detector run.
#[derive(Clone, Debug, PartialEq)]
pub struct Collision<K> {
    /// Identifier of the droppable container.
    pub id: K,
    /// Ranking metric this candidate was ordered by.
    pub metric: f64,
}

/// Everything a detector may consult for one evaluation.
///
/// `droppables` carries only enabled containers with a current measurement,
/// in registration order. Disabled containers are filtered out upstream, at
/// consumption time, so a rect measured before a container was disabled never
/// reaches a detector.
#[derive(Debug)]
pub struct CollisionInput<'a, K> {
    /// The active draggable's rectangle, already translated by the session's
    /// accumulated delta.
    pub draggable_rect: Rect,
    /// Current pointer position, when the session has one.
    pub pointer: Option<Point>,
    /// Enabled droppable containers and their last-measured rectangles.
    pub droppables: &'a [(K, Rect)],
}

/// Ranks droppable containers against the active draggable.
///
/// Implementations must be pure functions of the input (no side effects, no
/// interior state) and must return candidates best-first. For equal metrics
/// the input order must be preserved (use a stable sort), so ties fall back
/// to registration order deterministically.
pub trait CollisionDetector<K> {
    /// Produce the ordered candidate list for one evaluation.
    fn detect(&self, input: &CollisionInput<'_, K>) -> Vec<Collision<K>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use canopy_geometry::from_ltwh;

    #[test]
    fn collision_equality_compares_id_and_metric() {
        let a = Collision { id: 1_u32, metric: 4.0 };
        let b = Collision { id: 1_u32, metric: 4.0 };
        let c = Collision { id: 2_u32, metric: 4.0 };
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn input_borrows_droppables() {
        let droppables = [(7_u32, from_ltwh(0.0, 0.0, 1.0, 1.0))];
        let input = CollisionInput {
            draggable_rect: from_ltwh(0.0, 0.0, 2.0, 2.0),
            pointer: None,
            droppables: &droppables,
        };
        assert_eq!(input.droppables.len(), 1);
    }
}
