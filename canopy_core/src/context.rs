// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The coordination facade.
//!
//! ## Overview
//!
//! [`DndContext`] owns the two registries, the pending-operation queue, the
//! measurement scheduler, and the active drag session, and exposes the
//! registration, session-control, and query surface that input sensors and
//! renderers call. It is an explicitly constructed value threaded by
//! reference; there is no ambient global store.
//!
//! ## Turn discipline
//!
//! All mutation happens through `&mut` calls on a single thread. Registration
//! operations queue and are applied atomically by [`DndContext::commit`] at
//! the end of the current turn; [`DndContext::drag_start`] and
//! [`DndContext::run_scheduled`] flush the queue themselves before acting, so
//! a same-turn registration is always visible to the session and to a firing
//! measurement cycle. Derived collision state is recomputed only when one of
//! its inputs (the rect snapshot, the registry, the session, the
//! translation) actually changed, tracked by version stamps.

use alloc::vec::Vec;
use core::fmt;

use canopy_collision::{Collision, CollisionDetector, CollisionInput, RectIntersection};
use canopy_geometry::Measurable;
use kurbo::{Point, Rect, Vec2};

use crate::measure::{
    MeasuringConfig, MeasuringFrequency, MeasuringScheduler, PendingScope, RectMap,
};
use crate::registry::{CommitSummary, PendingOp, Registry};
use crate::sched::{ManualHost, ScheduleHost};
use crate::session::DragSession;
use crate::types::{DraggableEntry, DroppableContainer, EntryFlags, RegistrationKey};

/// Inputs the cached collision list was computed from.
#[derive(Copy, Clone, Debug, PartialEq)]
struct CollisionStamp {
    rects: u64,
    registry: u64,
    epoch: u64,
    translation: Vec2,
}

/// Drag-and-drop coordination context.
///
/// Type parameters: `K` identifies entries, `N` is the node handle, `D` is
/// caller-attached data, `C` picks the drop target, `H` grants scheduling
/// slots. The defaults (`RectIntersection`, [`ManualHost`]) suit tests and
/// embedders that drive the context directly.
pub struct DndContext<K, N, D = (), C = RectIntersection, H = ManualHost> {
    draggables: Registry<K, DraggableEntry<K, N, D>>,
    droppables: Registry<K, DroppableContainer<K, N, D>>,
    pending_ops: Vec<PendingOp<K, N, D>>,
    scheduler: MeasuringScheduler<K>,
    session: Option<DragSession<K>>,
    detector: C,
    host: H,
    next_key: u64,
    registry_version: u64,
    session_epoch: u64,
    timeout_armed: bool,
    collisions: Vec<Collision<K>>,
    collisions_stamp: Option<CollisionStamp>,
}

impl<K, N, D, C, H> fmt::Debug for DndContext<K, N, D, C, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DndContext")
            .field("draggables", &self.draggables.len())
            .field("droppables", &self.droppables.len())
            .field("pending_ops", &self.pending_ops.len())
            .field("dragging", &self.session.is_some())
            .field("collisions", &self.collisions.len())
            .finish_non_exhaustive()
    }
}

impl<K, N, D> DndContext<K, N, D>
where
    K: Clone + Eq,
    N: Measurable,
{
    /// Create a context with the default detector and a [`ManualHost`].
    pub fn new(config: MeasuringConfig) -> Self {
        Self::with_parts(config, RectIntersection, ManualHost)
    }
}

impl<K, N, D, C, H> DndContext<K, N, D, C, H>
where
    K: Clone + Eq,
    N: Measurable,
    C: CollisionDetector<K>,
    H: ScheduleHost,
{
    /// Create a context with an explicit detector and host.
    pub fn with_parts(config: MeasuringConfig, detector: C, mut host: H) -> Self {
        // A debounced cadence that is active at rest arms its first timeout
        // now; `Optimized` waits for drag-state changes and ad-hoc requests.
        let mut timeout_armed = false;
        if let MeasuringFrequency::Debounce(ms) = config.frequency
            && config.strategy.is_active(false)
        {
            host.request_timeout(ms);
            timeout_armed = true;
        }
        Self {
            draggables: Registry::new(),
            droppables: Registry::new(),
            pending_ops: Vec::new(),
            scheduler: MeasuringScheduler::new(config),
            session: None,
            detector,
            host,
            next_key: 0,
            registry_version: 0,
            session_epoch: 0,
            timeout_armed,
            collisions: Vec::new(),
            collisions_stamp: None,
        }
    }

    // --- registration ---

    /// Queue registration of a drag source. The entry becomes visible when
    /// the current turn's batch is committed.
    pub fn register_draggable(
        &mut self,
        id: K,
        node: N,
        activator: Option<N>,
        data: D,
    ) -> RegistrationKey {
        let key = self.alloc_key();
        self.pending_ops
            .push(PendingOp::RegisterDraggable(DraggableEntry {
                id,
                key,
                node,
                activator,
                flags: EntryFlags::empty(),
                data,
            }));
        key
    }

    /// Queue removal of a drag source. Ignored unless the stored entry still
    /// carries `key`.
    pub fn unregister_draggable(&mut self, id: K, key: RegistrationKey) {
        self.pending_ops
            .push(PendingOp::UnregisterDraggable { id, key });
    }

    /// Queue a disabled-flag change for a drag source. Ignored unless the
    /// stored entry still carries `key`.
    pub fn set_draggable_disabled(&mut self, id: K, key: RegistrationKey, disabled: bool) {
        self.pending_ops
            .push(PendingOp::SetDraggableDisabled { id, key, disabled });
    }

    /// Queue registration of a drop target. The container becomes visible,
    /// and gets scheduled for measurement, when the batch is committed.
    pub fn register_droppable(&mut self, id: K, node: N, data: D) -> RegistrationKey {
        let key = self.alloc_key();
        self.pending_ops
            .push(PendingOp::RegisterDroppable(DroppableContainer {
                id,
                key,
                node,
                flags: EntryFlags::empty(),
                rect: None,
                data,
            }));
        key
    }

    /// Queue removal of a drop target. Ignored unless the stored entry still
    /// carries `key`.
    pub fn unregister_droppable(&mut self, id: K, key: RegistrationKey) {
        self.pending_ops
            .push(PendingOp::UnregisterDroppable { id, key });
    }

    /// Queue a disabled-flag change for a drop target. Ignored unless the
    /// stored entry still carries `key`.
    pub fn set_droppable_disabled(&mut self, id: K, key: RegistrationKey, disabled: bool) {
        self.pending_ops
            .push(PendingOp::SetDroppableDisabled { id, key, disabled });
    }

    /// Apply all queued registry operations as one atomic batch.
    ///
    /// Call at the end of the turn that issued them. The returned summary is
    /// the batch's single state-change notification; it is empty when the
    /// batch had no net effect. Newly registered droppables are scheduled for
    /// measurement, and rects of unregistered ones leave the snapshot here.
    pub fn commit(&mut self) -> CommitSummary<K> {
        let mut summary = CommitSummary::default();
        if self.pending_ops.is_empty() {
            return summary;
        }
        let ops = core::mem::take(&mut self.pending_ops);
        for op in ops {
            match op {
                PendingOp::RegisterDraggable(entry) => {
                    summary.draggables_registered.push(entry.id.clone());
                    self.draggables.register(entry.id.clone(), entry);
                }
                PendingOp::UnregisterDraggable { id, key } => {
                    if self.draggables.unregister(&id, key) {
                        summary.draggables_unregistered.push(id);
                    }
                }
                PendingOp::SetDraggableDisabled { id, key, disabled } => {
                    if let Some(entry) = self.draggables.get_mut(&id)
                        && entry.key == key
                        && entry.is_disabled() != disabled
                    {
                        entry.flags.set(EntryFlags::DISABLED, disabled);
                        summary.draggables_disabled_changed.push(id);
                    }
                }
                PendingOp::RegisterDroppable(container) => {
                    summary.droppables_registered.push(container.id.clone());
                    self.droppables.register(container.id.clone(), container);
                }
                PendingOp::UnregisterDroppable { id, key } => {
                    if self.droppables.unregister(&id, key) {
                        if self.scheduler.retract(&id) {
                            self.host.cancel_idle();
                        }
                        summary.droppables_unregistered.push(id);
                    }
                }
                PendingOp::SetDroppableDisabled { id, key, disabled } => {
                    if let Some(container) = self.droppables.get_mut(&id)
                        && container.key == key
                        && container.is_disabled() != disabled
                    {
                        container.flags.set(EntryFlags::DISABLED, disabled);
                        summary.droppables_disabled_changed.push(id);
                    }
                }
            }
        }
        if !summary.is_empty() {
            self.registry_version = self.registry_version.wrapping_add(1);
        }
        if !summary.droppables_unregistered.is_empty() {
            let _ = self.scheduler.prune(&summary.droppables_unregistered);
        }
        if !summary.droppables_registered.is_empty()
            && self.measuring_active()
            && self
                .scheduler
                .request(PendingScope::Ids(summary.droppables_registered.clone()))
        {
            self.host.request_idle();
        }
        #[cfg(feature = "tracing")]
        if !summary.is_empty() {
            tracing::debug!(
                draggables = self.draggables.len(),
                droppables = self.droppables.len(),
                "registry commit"
            );
        }
        self.refresh_collisions();
        summary
    }

    // --- session control ---

    /// Begin a drag session for `id` at `initial`.
    ///
    /// Flushes the pending registry batch first, so a same-turn registration
    /// of `id` is honored. Starting while a session is already active
    /// overwrites it (last writer wins). A draggable registered as disabled
    /// refuses to start.
    pub fn drag_start(&mut self, id: K, initial: Point) {
        let _ = self.commit();
        if self.draggables.get(&id).is_some_and(|e| e.is_disabled()) {
            return;
        }
        let initial_rect = self.draggables.get(&id).and_then(|e| e.node.measure());
        let was_dragging = self.session.is_some();
        self.session = Some(DragSession::new(id, initial, initial_rect));
        self.session_epoch = self.session_epoch.wrapping_add(1);
        #[cfg(feature = "tracing")]
        tracing::trace!(epoch = self.session_epoch, "drag start");
        if !was_dragging {
            self.drag_state_changed();
        }
        self.refresh_collisions();
    }

    /// Record a pointer move. A no-op without an active session, so stray
    /// late events after drag end are harmless.
    pub fn drag_move(&mut self, coords: Point) {
        let Some(session) = &mut self.session else {
            return;
        };
        session.move_to(coords);
        self.refresh_collisions();
    }

    /// End the active session. Translation resets to zero and the active id
    /// clears; registries are untouched. A no-op without a session.
    pub fn drag_end(&mut self) {
        if self.session.take().is_none() {
            return;
        }
        self.session_epoch = self.session_epoch.wrapping_add(1);
        #[cfg(feature = "tracing")]
        tracing::trace!(epoch = self.session_epoch, "drag end");
        self.drag_state_changed();
        self.refresh_collisions();
    }

    // --- measurement ---

    /// Request re-measurement of the given containers, or of everything when
    /// `ids` is empty. Requests coalesce: the first one asks the host for an
    /// idle slot, later ones only grow the pending scope. A no-op while the
    /// strategy is inactive for the current drag state.
    pub fn request_measure<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = K>,
    {
        if !self.measuring_active() {
            return;
        }
        let ids: Vec<K> = ids.into_iter().collect();
        let scope = if ids.is_empty() {
            PendingScope::All
        } else {
            PendingScope::Ids(ids)
        };
        if self.scheduler.request(scope) {
            self.host.request_idle();
        }
    }

    /// Request re-measurement of every container.
    pub fn request_measure_all(&mut self) {
        self.request_measure(core::iter::empty());
    }

    /// Host entry point: the requested idle slot fired.
    ///
    /// Flushes the registry batch first, so registrations that arrived after
    /// the request are measured too. Strategy activity is re-checked here:
    /// a drag that ended since the request simply discards a now-irrelevant
    /// `DuringDrag` cycle. Returns whether the rect snapshot changed.
    pub fn run_scheduled(&mut self) -> bool {
        let _ = self.commit();
        if !self.measuring_active() {
            self.scheduler.clear_pending();
            return false;
        }
        let changed = self.scheduler.run_cycle(self.droppables.iter_mut());
        if changed {
            #[cfg(feature = "tracing")]
            tracing::trace!(
                version = self.scheduler.rects_version(),
                rects = self.scheduler.rects().len(),
                "droppable rects updated"
            );
            self.refresh_collisions();
        }
        changed
    }

    /// Host entry point: the requested frame slot fired. Requests one full
    /// measurement pass, which the next idle slot executes.
    pub fn on_frame(&mut self) {
        self.request_measure_all();
    }

    /// Host entry point: the requested debounce timeout fired. Requests a
    /// full measurement pass and re-arms while the strategy stays active;
    /// an inactive strategy lets the cadence lapse until the next
    /// drag-state change re-arms it.
    pub fn on_timeout(&mut self) {
        self.timeout_armed = false;
        let MeasuringFrequency::Debounce(ms) = self.scheduler.config().frequency else {
            return;
        };
        if !self.measuring_active() {
            return;
        }
        self.request_measure_all();
        self.host.request_timeout(ms);
        self.timeout_armed = true;
    }

    // --- queries ---

    /// Identifier of the active draggable, if a session is live.
    pub fn active_id(&self) -> Option<&K> {
        self.session.as_ref().map(DragSession::active)
    }

    /// Whether a drag session is active.
    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    /// Accumulated translation of the active session, or zero when inactive.
    pub fn translation(&self) -> Vec2 {
        self.session
            .as_ref()
            .map(DragSession::translation)
            .unwrap_or(Vec2::ZERO)
    }

    /// The active draggable's rect at its current position, when measurable.
    pub fn translated_rect(&self) -> Option<Rect> {
        self.session.as_ref().and_then(DragSession::translated_rect)
    }

    /// The current droppable rect snapshot.
    pub fn droppable_rects(&self) -> &RectMap<K> {
        self.scheduler.rects()
    }

    /// Current collision candidates, best first. Empty while no session is
    /// active or the active draggable is unmeasurable.
    pub fn collisions(&self) -> &[Collision<K>] {
        &self.collisions
    }

    /// The designated drop target: the top-ranked collision candidate.
    pub fn drop_target(&self) -> Option<&Collision<K>> {
        self.collisions.first()
    }

    /// Look up a committed draggable entry.
    pub fn get_draggable(&self, id: &K) -> Option<&DraggableEntry<K, N, D>> {
        self.draggables.get(id)
    }

    /// Look up a committed droppable container.
    pub fn get_droppable(&self, id: &K) -> Option<&DroppableContainer<K, N, D>> {
        self.droppables.get(id)
    }

    /// The measurement policy this context was built with.
    pub fn config(&self) -> &MeasuringConfig {
        self.scheduler.config()
    }

    /// The scheduling host, for embedders that poll it.
    pub fn host(&self) -> &H {
        &self.host
    }

    // --- internals ---

    fn alloc_key(&mut self) -> RegistrationKey {
        self.next_key = self.next_key.wrapping_add(1);
        RegistrationKey::new(self.next_key)
    }

    fn measuring_active(&self) -> bool {
        self.scheduler
            .config()
            .strategy
            .is_active(self.session.is_some())
    }

    /// On any drag-state flip: one frame slot for the optimized cadence, and
    /// a (re-)armed timeout when a debounced cadence just became active.
    fn drag_state_changed(&mut self) {
        self.host.request_frame();
        if let MeasuringFrequency::Debounce(ms) = self.scheduler.config().frequency
            && self.measuring_active()
            && !self.timeout_armed
        {
            self.host.request_timeout(ms);
            self.timeout_armed = true;
        }
    }

    /// Recompute the cached collision list iff one of its inputs changed.
    fn refresh_collisions(&mut self) {
        let Some(session) = &self.session else {
            self.collisions.clear();
            self.collisions_stamp = None;
            return;
        };
        let stamp = CollisionStamp {
            rects: self.scheduler.rects_version(),
            registry: self.registry_version,
            epoch: self.session_epoch,
            translation: session.translation(),
        };
        if self.collisions_stamp == Some(stamp) {
            return;
        }
        let Some(draggable_rect) = session.translated_rect() else {
            self.collisions.clear();
            self.collisions_stamp = Some(stamp);
            return;
        };
        let pointer = session.pointer();
        // Disabled state is checked here, at consumption time: a container
        // measured before being disabled keeps its cached rect but never
        // reaches the detector.
        let mut candidates: Vec<(K, Rect)> = Vec::with_capacity(self.scheduler.rects().len());
        for (id, rect) in self.scheduler.rects().iter() {
            if self.droppables.get(id).is_some_and(|c| !c.is_disabled()) {
                candidates.push((id.clone(), rect));
            }
        }
        let input = CollisionInput {
            draggable_rect,
            pointer: Some(pointer),
            droppables: &candidates,
        };
        self.collisions = self.detector.detect(&input);
        self.collisions_stamp = Some(stamp);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::MeasuringStrategy;
    use alloc::rc::Rc;
    use alloc::vec::Vec;
    use canopy_geometry::from_ltwh;
    use core::cell::Cell;

    /// Counts the slots the context asks for, so tests can assert coalescing.
    #[derive(Clone, Debug, Default)]
    struct RecordingHost {
        idle_requests: u32,
        idle_cancels: u32,
        frames: u32,
        timeouts: Vec<u32>,
    }

    impl ScheduleHost for RecordingHost {
        fn request_idle(&mut self) {
            self.idle_requests += 1;
        }
        fn cancel_idle(&mut self) {
            self.idle_cancels += 1;
        }
        fn request_frame(&mut self) {
            self.frames += 1;
        }
        fn request_timeout(&mut self, delay_ms: u32) {
            self.timeouts.push(delay_ms);
        }
    }

    type Node = Rc<Cell<Option<Rect>>>;

    fn node(rect: Option<Rect>) -> Node {
        Rc::new(Cell::new(rect))
    }

    fn config(strategy: MeasuringStrategy) -> MeasuringConfig {
        MeasuringConfig::new(strategy, MeasuringFrequency::Optimized)
    }

    fn recording_ctx(
        cfg: MeasuringConfig,
    ) -> DndContext<&'static str, Node, (), RectIntersection, RecordingHost> {
        DndContext::with_parts(cfg, RectIntersection, RecordingHost::default())
    }

    /// Registers a draggable and two droppables and commits, measuring both.
    fn populated_ctx(
        strategy: MeasuringStrategy,
    ) -> DndContext<&'static str, Node, (), RectIntersection, RecordingHost> {
        let mut ctx = recording_ctx(config(strategy));
        let _ = ctx.register_draggable("card", node(Some(from_ltwh(0.0, 0.0, 10.0, 10.0))), None, ());
        let _ = ctx.register_droppable("a", node(Some(from_ltwh(0.0, 0.0, 8.0, 8.0))), ());
        let _ = ctx.register_droppable("b", node(Some(from_ltwh(20.0, 20.0, 8.0, 8.0))), ());
        let _ = ctx.commit();
        ctx
    }

    #[test]
    fn registration_is_deferred_until_commit() {
        let mut ctx = recording_ctx(config(MeasuringStrategy::Always));
        let _ = ctx.register_droppable("a", node(None), ());
        assert!(ctx.get_droppable(&"a").is_none(), "not visible pre-commit");

        let summary = ctx.commit();
        assert_eq!(summary.droppables_registered, ["a"]);
        assert!(ctx.get_droppable(&"a").is_some());
    }

    #[test]
    fn batch_applies_atomically_with_one_summary() {
        let mut ctx = recording_ctx(config(MeasuringStrategy::Always));
        let ka = ctx.register_droppable("a", node(None), ());
        let _kb = ctx.register_droppable("b", node(None), ());
        ctx.unregister_droppable("a", ka);
        let _kd = ctx.register_draggable("d", node(None), None, ());

        let summary = ctx.commit();
        assert!(!summary.is_empty());
        assert_eq!(summary.droppables_registered, ["a", "b"]);
        assert_eq!(summary.droppables_unregistered, ["a"]);
        assert_eq!(summary.draggables_registered, ["d"]);
        // Net effect: only `b` and the draggable survive the batch.
        assert!(ctx.get_droppable(&"a").is_none());
        assert!(ctx.get_droppable(&"b").is_some());
        assert!(ctx.get_draggable(&"d").is_some());

        // A settled queue commits to nothing.
        assert!(ctx.commit().is_empty());
    }

    #[test]
    fn stale_unregister_leaves_newer_registration() {
        let mut ctx = recording_ctx(config(MeasuringStrategy::Always));
        let old_key = ctx.register_droppable("a", node(None), ());
        let _ = ctx.commit();
        // Remount: a fresh lifetime replaces the entry...
        let new_key = ctx.register_droppable("a", node(None), ());
        let _ = ctx.commit();
        // ...then the old lifetime's cleanup arrives late.
        ctx.unregister_droppable("a", old_key);
        let summary = ctx.commit();
        assert!(summary.droppables_unregistered.is_empty());
        assert_eq!(ctx.get_droppable(&"a").unwrap().key, new_key);
    }

    #[test]
    fn stale_set_disabled_is_ignored() {
        let mut ctx = recording_ctx(config(MeasuringStrategy::Always));
        let old_key = ctx.register_droppable("a", node(None), ());
        let _ = ctx.commit();
        let _new_key = ctx.register_droppable("a", node(None), ());
        let _ = ctx.commit();

        ctx.set_droppable_disabled("a", old_key, true);
        let summary = ctx.commit();
        assert!(summary.droppables_disabled_changed.is_empty());
        assert!(!ctx.get_droppable(&"a").unwrap().is_disabled());
    }

    #[test]
    fn measure_requests_coalesce_into_one_idle_slot() {
        let mut ctx = populated_ctx(MeasuringStrategy::Always);
        // populated_ctx's commit already scheduled the initial measurement.
        let initial = ctx.host().idle_requests;

        ctx.request_measure(["a"]);
        ctx.request_measure(["b"]);
        ctx.request_measure_all();
        assert_eq!(
            ctx.host().idle_requests,
            initial,
            "repeat requests grow the pending scope without new slots"
        );

        assert!(ctx.run_scheduled());
        assert_eq!(ctx.droppable_rects().len(), 2);
        // Nothing pending afterwards: another run is a no-op.
        assert!(!ctx.run_scheduled());
    }

    #[test]
    fn inactive_strategy_ignores_measure_requests() {
        let mut ctx = populated_ctx(MeasuringStrategy::DuringDrag);
        assert_eq!(ctx.host().idle_requests, 0, "commit did not schedule");
        ctx.request_measure_all();
        assert_eq!(ctx.host().idle_requests, 0);
        assert!(!ctx.run_scheduled());
        assert!(ctx.droppable_rects().is_empty());
    }

    #[test]
    fn drag_state_gates_during_drag_strategy() {
        let mut ctx = populated_ctx(MeasuringStrategy::DuringDrag);
        ctx.drag_start("card", Point::new(0.0, 0.0));
        assert_eq!(ctx.host().frames, 1, "state change requested a frame slot");

        // The host's frame fires, then its idle slot.
        ctx.on_frame();
        assert!(ctx.run_scheduled());
        assert_eq!(ctx.droppable_rects().len(), 2);
    }

    #[test]
    fn ending_drag_discards_now_irrelevant_cycle() {
        let mut ctx = populated_ctx(MeasuringStrategy::DuringDrag);
        ctx.drag_start("card", Point::new(0.0, 0.0));
        ctx.on_frame();
        // The idle slot fires only after the drag already ended.
        ctx.drag_end();
        assert!(!ctx.run_scheduled());
        assert!(ctx.droppable_rects().is_empty());
    }

    #[test]
    fn translation_tracks_moves_from_initial() {
        let mut ctx = populated_ctx(MeasuringStrategy::Always);
        ctx.drag_start("card", Point::new(0.0, 0.0));
        assert_eq!(ctx.translation(), Vec2::ZERO);

        ctx.drag_move(Point::new(10.0, 5.0));
        assert_eq!(ctx.translation(), Vec2::new(10.0, 5.0));
        ctx.drag_move(Point::new(20.0, 5.0));
        assert_eq!(ctx.translation(), Vec2::new(20.0, 5.0));
        ctx.drag_move(Point::new(25.0, 30.0));
        assert_eq!(ctx.translation(), Vec2::new(25.0, 30.0));
    }

    #[test]
    fn drag_move_without_session_is_noop() {
        let mut ctx = populated_ctx(MeasuringStrategy::Always);
        ctx.drag_move(Point::new(10.0, 10.0));
        assert!(!ctx.is_dragging());
        assert_eq!(ctx.translation(), Vec2::ZERO);
        // Same for a stray end.
        ctx.drag_end();
        assert!(!ctx.is_dragging());
    }

    #[test]
    fn collisions_rank_overlap_and_exclude_nonoverlapping() {
        let mut ctx = populated_ctx(MeasuringStrategy::Always);
        ctx.run_scheduled();
        ctx.drag_start("card", Point::new(0.0, 0.0));
        ctx.drag_move(Point::new(5.0, 5.0));

        // Translated rect {5,5,15,15} overlaps `a` {0,0,8,8} only.
        let hits = ctx.collisions();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "a");
        assert_eq!(hits[0].metric, 9.0);
        assert_eq!(ctx.drop_target().map(|c| c.id), Some("a"));
    }

    #[test]
    fn larger_overlap_wins_when_both_intersect() {
        let mut ctx = recording_ctx(config(MeasuringStrategy::Always));
        let _ = ctx.register_draggable("card", node(Some(from_ltwh(0.0, 0.0, 10.0, 10.0))), None, ());
        let _ = ctx.register_droppable("small", node(Some(from_ltwh(0.0, 0.0, 8.0, 8.0))), ());
        let _ = ctx.register_droppable("large", node(Some(from_ltwh(5.0, 5.0, 20.0, 20.0))), ());
        let _ = ctx.commit();
        ctx.run_scheduled();

        ctx.drag_start("card", Point::new(0.0, 0.0));
        ctx.drag_move(Point::new(5.0, 5.0));
        let ids: Vec<_> = ctx.collisions().iter().map(|c| c.id).collect();
        assert_eq!(ids, ["large", "small"]);
    }

    #[test]
    fn disabled_droppable_is_not_a_candidate() {
        let mut ctx = populated_ctx(MeasuringStrategy::Always);
        ctx.run_scheduled();
        let key = ctx.get_droppable(&"a").unwrap().key;

        ctx.drag_start("card", Point::new(0.0, 0.0));
        ctx.drag_move(Point::new(5.0, 5.0));
        assert_eq!(ctx.drop_target().map(|c| c.id), Some("a"));

        // Disable mid-drag: the rect stays cached but candidacy ends now.
        ctx.set_droppable_disabled("a", key, true);
        let _ = ctx.commit();
        assert!(ctx.collisions().is_empty());
        assert!(ctx.droppable_rects().contains(&"a"), "rect stays cached");

        // Re-enabling restores candidacy without re-measuring.
        ctx.set_droppable_disabled("a", key, false);
        let _ = ctx.commit();
        assert_eq!(ctx.drop_target().map(|c| c.id), Some("a"));
    }

    #[test]
    fn drag_end_then_start_resets_session_state() {
        let mut ctx = populated_ctx(MeasuringStrategy::Always);
        ctx.run_scheduled();
        ctx.drag_start("card", Point::new(0.0, 0.0));
        ctx.drag_move(Point::new(50.0, 50.0));
        assert!(ctx.is_dragging());

        ctx.drag_end();
        assert!(!ctx.is_dragging());
        assert_eq!(ctx.active_id(), None);
        assert_eq!(ctx.translation(), Vec2::ZERO);
        assert!(ctx.collisions().is_empty());

        ctx.drag_start("card", Point::new(100.0, 100.0));
        assert_eq!(ctx.active_id(), Some(&"card"));
        assert_eq!(ctx.translation(), Vec2::ZERO, "no residue from prior session");
        ctx.drag_move(Point::new(101.0, 100.0));
        assert_eq!(ctx.translation(), Vec2::new(1.0, 0.0));
    }

    #[test]
    fn drag_start_while_active_overwrites() {
        let mut ctx = populated_ctx(MeasuringStrategy::Always);
        ctx.drag_start("card", Point::new(0.0, 0.0));
        ctx.drag_move(Point::new(30.0, 0.0));

        ctx.drag_start("card", Point::new(10.0, 10.0));
        assert_eq!(ctx.translation(), Vec2::ZERO);
        ctx.drag_move(Point::new(15.0, 10.0));
        assert_eq!(ctx.translation(), Vec2::new(5.0, 0.0));
    }

    #[test]
    fn drag_start_sees_same_turn_registration() {
        let mut ctx = recording_ctx(config(MeasuringStrategy::Always));
        let _ = ctx.register_draggable("late", node(Some(from_ltwh(0.0, 0.0, 4.0, 4.0))), None, ());
        // No explicit commit: drag_start flushes the batch itself.
        ctx.drag_start("late", Point::new(0.0, 0.0));
        assert!(ctx.is_dragging());
        assert_eq!(ctx.translated_rect(), Some(from_ltwh(0.0, 0.0, 4.0, 4.0)));
    }

    #[test]
    fn disabled_draggable_refuses_to_start() {
        let mut ctx = recording_ctx(config(MeasuringStrategy::Always));
        let key = ctx.register_draggable("card", node(Some(from_ltwh(0.0, 0.0, 4.0, 4.0))), None, ());
        ctx.set_draggable_disabled("card", key, true);
        let _ = ctx.commit();

        ctx.drag_start("card", Point::new(0.0, 0.0));
        assert!(!ctx.is_dragging());
    }

    #[test]
    fn unknown_draggable_starts_without_rect() {
        let mut ctx = populated_ctx(MeasuringStrategy::Always);
        ctx.run_scheduled();
        ctx.drag_start("ghost", Point::new(0.0, 0.0));
        assert!(ctx.is_dragging());
        assert_eq!(ctx.translated_rect(), None);
        ctx.drag_move(Point::new(5.0, 5.0));
        assert!(ctx.collisions().is_empty(), "no rect means no candidates");
    }

    #[test]
    fn run_scheduled_includes_late_registrations() {
        let mut ctx = recording_ctx(config(MeasuringStrategy::Always));
        let _ = ctx.register_droppable("a", node(Some(from_ltwh(0.0, 0.0, 8.0, 8.0))), ());
        let _ = ctx.commit();
        // Registered after the cycle was requested, before it fired.
        let _ = ctx.register_droppable("late", node(Some(from_ltwh(10.0, 0.0, 8.0, 8.0))), ());

        assert!(ctx.run_scheduled());
        assert!(ctx.droppable_rects().contains(&"late"));
    }

    #[test]
    fn unchanged_cycle_preserves_snapshot() {
        let mut ctx = populated_ctx(MeasuringStrategy::Always);
        assert!(ctx.run_scheduled());
        ctx.request_measure_all();
        assert!(!ctx.run_scheduled(), "identical geometry changes nothing");
    }

    #[test]
    fn unregistering_pending_id_withdraws_idle_slot() {
        let mut ctx = recording_ctx(config(MeasuringStrategy::Always));
        let key = ctx.register_droppable("a", node(Some(from_ltwh(0.0, 0.0, 8.0, 8.0))), ());
        let _ = ctx.commit();
        assert!(ctx.run_scheduled());

        // A fresh cycle pends for `a` alone; its unregistration empties the
        // pending set and withdraws the slot.
        ctx.request_measure(["a"]);
        let cancels_before = ctx.host().idle_cancels;
        ctx.unregister_droppable("a", key);
        let _ = ctx.commit();
        assert_eq!(ctx.host().idle_cancels, cancels_before + 1);
        assert!(
            !ctx.droppable_rects().contains(&"a"),
            "unregistered rect left the snapshot at commit"
        );
    }

    #[test]
    fn unmeasurable_container_returns_next_cycle() {
        let mut ctx = recording_ctx(config(MeasuringStrategy::Always));
        let detached = node(None);
        let _ = ctx.register_droppable("a", Rc::clone(&detached), ());
        let _ = ctx.commit();
        assert!(!ctx.run_scheduled());
        assert!(ctx.droppable_rects().is_empty());

        detached.set(Some(from_ltwh(0.0, 0.0, 8.0, 8.0)));
        ctx.request_measure_all();
        assert!(ctx.run_scheduled());
        assert!(ctx.droppable_rects().contains(&"a"));
    }

    #[test]
    fn debounce_arms_at_rest_and_rearms_on_fire() {
        let cfg = MeasuringConfig::new(MeasuringStrategy::Always, MeasuringFrequency::Debounce(200));
        let mut ctx: DndContext<&'static str, Node, (), RectIntersection, RecordingHost> =
            DndContext::with_parts(cfg, RectIntersection, RecordingHost::default());
        assert_eq!(ctx.host().timeouts, [200], "active at rest arms immediately");

        ctx.on_timeout();
        assert_eq!(ctx.host().timeouts, [200, 200], "each firing re-arms once");
        assert_eq!(ctx.host().idle_requests, 1, "the firing requested a cycle");
    }

    #[test]
    fn debounce_lapses_while_inactive_and_rearms_on_drag() {
        let cfg =
            MeasuringConfig::new(MeasuringStrategy::DuringDrag, MeasuringFrequency::Debounce(100));
        let mut ctx: DndContext<&'static str, Node, (), RectIntersection, RecordingHost> =
            DndContext::with_parts(cfg, RectIntersection, RecordingHost::default());
        assert!(ctx.host().timeouts.is_empty(), "inactive at rest: unarmed");

        ctx.drag_start("x", Point::new(0.0, 0.0));
        assert_eq!(ctx.host().timeouts, [100]);

        ctx.drag_end();
        // The armed timeout fires after the drag ended: no measure, no re-arm.
        let idle_before = ctx.host().idle_requests;
        ctx.on_timeout();
        assert_eq!(ctx.host().timeouts, [100]);
        assert_eq!(ctx.host().idle_requests, idle_before);
    }

    #[test]
    fn pointer_detector_plugs_into_context() {
        let cfg = config(MeasuringStrategy::Always);
        let mut ctx: DndContext<&'static str, Node, (), canopy_collision::PointerWithin, RecordingHost> =
            DndContext::with_parts(cfg, canopy_collision::PointerWithin, RecordingHost::default());
        let _ = ctx.register_draggable("card", node(Some(from_ltwh(0.0, 0.0, 10.0, 10.0))), None, ());
        let _ = ctx.register_droppable("zone", node(Some(from_ltwh(40.0, 40.0, 20.0, 20.0))), ());
        let _ = ctx.commit();
        ctx.run_scheduled();

        ctx.drag_start("card", Point::new(5.0, 5.0));
        ctx.drag_move(Point::new(50.0, 50.0));
        // Pointer (50,50) sits inside the zone even though rect overlap is
        // what RectIntersection would have keyed on.
        assert_eq!(ctx.drop_target().map(|c| c.id), Some("zone"));
    }
}
