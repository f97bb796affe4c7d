// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The [`Measurable`] node-handle seam.
//!
//! The drag-and-drop core never reads live geometry itself. Registration
//! hands it a node handle implementing [`Measurable`]; the measurement
//! scheduler calls [`Measurable::measure`] when a cycle runs. A handle whose
//! node is currently detached or hidden returns `None` and is simply omitted
//! from that cycle's snapshot; it is never an error.

use core::cell::Cell;

use alloc::rc::Rc;
use kurbo::Rect;

/// A handle to something with a readable axis-aligned bounding rectangle.
///
/// Implementations must be cheap to call; the scheduler may measure every
/// registered container in one cycle.
pub trait Measurable {
    /// Read the current bounding rectangle, or `None` if the node cannot be
    /// measured right now (detached, hidden, not yet laid out).
    fn measure(&self) -> Option<Rect>;
}

/// A bare rectangle measures as itself. Useful for tests and fixed layouts.
impl Measurable for Rect {
    #[inline]
    fn measure(&self) -> Option<Rect> {
        Some(*self)
    }
}

/// A cell the embedder updates as layout changes; `None` while unmeasurable.
impl Measurable for Cell<Option<Rect>> {
    #[inline]
    fn measure(&self) -> Option<Rect> {
        self.get()
    }
}

/// Shared handles measure through their target, so the embedder can keep one
/// end and mutate geometry while the registry owns the other.
impl<M: Measurable> Measurable for Rc<M> {
    #[inline]
    fn measure(&self) -> Option<Rect> {
        (**self).measure()
    }
}
