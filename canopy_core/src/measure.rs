// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Droppable measurement: policies, the rect snapshot, and cycle scheduling.
//!
//! ## Overview
//!
//! Measuring every container on every change is wasteful, so measurement runs
//! in batched cycles. Requests made while a cycle is already pending merely
//! grow its scope; N requests before the cycle fires produce exactly one
//! cycle. A cycle re-measures the containers in scope (plus any container
//! that has never been measured), reuses cached rectangles for the rest, and
//! publishes a fresh [`RectMap`] snapshot only when the result differs by
//! value from the previous one; otherwise the old snapshot and its version
//! stamp survive and downstream recomputation is skipped.
//!
//! ## Policies
//!
//! [`MeasuringStrategy`] gates whether measurement is active at all for the
//! current drag state. [`MeasuringFrequency`] picks between the optimized
//! cadence (one full measure request per animation frame after a drag-state
//! change, plus ad-hoc idle-batched requests) and a plain debounce interval.

use alloc::vec::Vec;

use canopy_geometry::Measurable;
use kurbo::Rect;

use crate::types::DroppableContainer;

/// When measurement is active, relative to the drag lifecycle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MeasuringStrategy {
    /// Measure regardless of drag state.
    Always,
    /// Measure only while no drag is active.
    BeforeDragStart,
    /// Measure only while a drag is active.
    DuringDrag,
}

impl MeasuringStrategy {
    /// Whether measurement is active given the current drag state.
    pub fn is_active(self, dragging: bool) -> bool {
        match self {
            Self::Always => true,
            Self::BeforeDragStart => !dragging,
            Self::DuringDrag => dragging,
        }
    }
}

/// How often scheduled remeasurement may run while the strategy is active.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MeasuringFrequency {
    /// One full measure request per animation frame after a drag-state
    /// change, plus idle-batched ad-hoc requests.
    Optimized,
    /// At most one scheduled remeasurement per this many milliseconds.
    Debounce(u32),
}

/// Measurement policy, fixed at context construction.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MeasuringConfig {
    /// Drag-state gate.
    pub strategy: MeasuringStrategy,
    /// Remeasurement cadence.
    pub frequency: MeasuringFrequency,
}

impl MeasuringConfig {
    /// Create a validated configuration.
    ///
    /// # Panics
    ///
    /// Panics on `Debounce(0)`: a zero interval would degenerate into a busy
    /// re-arm loop, and a nonsensical configuration is a programmer error
    /// surfaced immediately rather than recovered.
    pub fn new(strategy: MeasuringStrategy, frequency: MeasuringFrequency) -> Self {
        assert!(
            frequency != MeasuringFrequency::Debounce(0),
            "debounce interval must be nonzero"
        );
        Self {
            strategy,
            frequency,
        }
    }
}

impl Default for MeasuringConfig {
    fn default() -> Self {
        Self {
            strategy: MeasuringStrategy::DuringDrag,
            frequency: MeasuringFrequency::Optimized,
        }
    }
}

/// Immutable snapshot mapping droppable ids to their last-measured rects.
///
/// Entries are in registration order. Only measurement cycles (and commit
/// pruning of unregistered ids) replace the snapshot; everything else reads
/// it.
#[derive(Clone, Debug, PartialEq)]
pub struct RectMap<K> {
    entries: Vec<(K, Rect)>,
}

impl<K> Default for RectMap<K> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<K> RectMap<K> {
    /// Number of measured containers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing has been measured.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(id, rect)` pairs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, Rect)> {
        self.entries.iter().map(|(k, r)| (k, *r))
    }
}

impl<K: PartialEq> RectMap<K> {
    /// Rect for `id`, if it was measurable last cycle.
    pub fn get(&self, id: &K) -> Option<Rect> {
        self.entries
            .iter()
            .find(|(k, _)| k == id)
            .map(|(_, r)| *r)
    }

    /// Whether `id` has a current measurement.
    pub fn contains(&self, id: &K) -> bool {
        self.entries.iter().any(|(k, _)| k == id)
    }
}

/// Scope of a pending measurement cycle.
#[derive(Clone, Debug, PartialEq)]
pub enum PendingScope<K> {
    /// Re-measure every container.
    All,
    /// Re-measure the listed containers (plus any with no cached rect).
    Ids(Vec<K>),
}

/// State machine for one droppable-measurement cycle: idle, or scheduled
/// with an accumulating scope.
#[derive(Clone, Debug)]
pub struct MeasuringScheduler<K> {
    config: MeasuringConfig,
    pending: Option<PendingScope<K>>,
    rects: RectMap<K>,
    version: u64,
}

impl<K: Clone + PartialEq> MeasuringScheduler<K> {
    /// Create an idle scheduler with the given policy.
    pub fn new(config: MeasuringConfig) -> Self {
        Self {
            config,
            pending: None,
            rects: RectMap::default(),
            version: 0,
        }
    }

    /// The configured policy.
    pub fn config(&self) -> &MeasuringConfig {
        &self.config
    }

    /// The current snapshot.
    pub fn rects(&self) -> &RectMap<K> {
        &self.rects
    }

    /// Version stamp of the current snapshot. Bumped only when the snapshot
    /// actually changes, so equal stamps mean equal snapshots.
    pub fn rects_version(&self) -> u64 {
        self.version
    }

    /// Whether a cycle is scheduled.
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Merge `scope` into the pending cycle.
    ///
    /// Returns true when this transitioned the scheduler from idle to
    /// scheduled; the caller must then request one idle slot from the host.
    /// Further requests before the cycle fires only grow the scope.
    pub fn request(&mut self, scope: PendingScope<K>) -> bool {
        let first = self.pending.is_none();
        self.pending = Some(match (self.pending.take(), scope) {
            (None, s) => s,
            (Some(PendingScope::All), _) | (Some(_), PendingScope::All) => PendingScope::All,
            (Some(PendingScope::Ids(mut have)), PendingScope::Ids(add)) => {
                for id in add {
                    if !have.contains(&id) {
                        have.push(id);
                    }
                }
                PendingScope::Ids(have)
            }
        });
        first
    }

    /// Drop `id` from a pending id scope (the container unregistered).
    ///
    /// Returns true when the pending set became empty and the caller should
    /// withdraw the idle slot. An `All` scope is unaffected.
    pub fn retract(&mut self, id: &K) -> bool {
        if let Some(PendingScope::Ids(ids)) = &mut self.pending {
            ids.retain(|x| x != id);
            if ids.is_empty() {
                self.pending = None;
                return true;
            }
        }
        false
    }

    /// Discard any pending cycle without running it.
    pub fn clear_pending(&mut self) {
        self.pending = None;
    }

    /// Remove unregistered ids from the snapshot. Returns true if it changed.
    pub fn prune(&mut self, ids: &[K]) -> bool {
        let before = self.rects.entries.len();
        self.rects.entries.retain(|(k, _)| !ids.contains(k));
        let changed = self.rects.entries.len() != before;
        if changed {
            self.version = self.version.wrapping_add(1);
        }
        changed
    }

    /// Execute the pending cycle against the registered containers.
    ///
    /// Containers in scope, or with no cached rect, are re-measured and
    /// their caches updated; the rest keep their caches. A container whose
    /// measurement fails is dropped from this snapshot and retried next
    /// cycle. Returns true when the snapshot changed; otherwise the previous
    /// snapshot and version survive untouched.
    pub fn run_cycle<'a, N, D>(
        &mut self,
        containers: impl Iterator<Item = &'a mut DroppableContainer<K, N, D>>,
    ) -> bool
    where
        K: 'a,
        N: Measurable + 'a,
        D: 'a,
    {
        let Some(scope) = self.pending.take() else {
            return false;
        };
        let mut next = RectMap::default();
        for container in containers {
            let in_scope = match &scope {
                PendingScope::All => true,
                PendingScope::Ids(ids) => ids.contains(&container.id) || container.rect.is_none(),
            };
            if in_scope {
                container.rect = container.node.measure();
            }
            if let Some(rect) = container.rect {
                next.entries.push((container.id.clone(), rect));
            }
        }
        if next == self.rects {
            return false;
        }
        self.rects = next;
        self.version = self.version.wrapping_add(1);
        true
    }
}
