// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! State for one active drag.

use canopy_geometry::translated;
use kurbo::{Point, Rect, Vec2};

/// The mutable record of an in-flight drag.
///
/// Created on drag start and destroyed on drag end; while it lives, the
/// initial coordinates and the initial rect never change. The accumulated
/// translation is the only field a move touches, and it is always relative
/// to the initial coordinates (`coords - initial`, not a running sum), so a
/// dropped or reordered move can never skew it.
#[derive(Clone, Debug, PartialEq)]
pub struct DragSession<K> {
    active: K,
    initial: Point,
    translation: Vec2,
    initial_rect: Option<Rect>,
}

impl<K> DragSession<K> {
    /// Begin a session for `active` at `initial`, with the draggable's rect
    /// as measured at start (or `None` if it was unmeasurable).
    pub fn new(active: K, initial: Point, initial_rect: Option<Rect>) -> Self {
        Self {
            active,
            initial,
            translation: Vec2::ZERO,
            initial_rect,
        }
    }

    /// Identifier of the active draggable.
    pub fn active(&self) -> &K {
        &self.active
    }

    /// Pointer coordinates at drag start.
    pub fn initial(&self) -> Point {
        self.initial
    }

    /// Accumulated translation since drag start.
    pub fn translation(&self) -> Vec2 {
        self.translation
    }

    /// Current pointer position implied by the translation.
    pub fn pointer(&self) -> Point {
        self.initial + self.translation
    }

    /// The draggable's rect translated to its current position.
    pub fn translated_rect(&self) -> Option<Rect> {
        self.initial_rect.map(|r| translated(r, self.translation))
    }

    /// Record a move to absolute `coords`.
    pub fn move_to(&mut self, coords: Point) {
        self.translation = coords - self.initial;
    }
}
