// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cooperative scheduling seam between the core and its hosting environment.
//!
//! The core never blocks and never owns a clock. When it wants deferred work
//! it asks the host for a slot; the host later calls back into the context:
//!
//! | request                  | host fires                      |
//! |--------------------------|---------------------------------|
//! | [`ScheduleHost::request_idle`]    | `DndContext::run_scheduled` |
//! | [`ScheduleHost::request_frame`]   | `DndContext::on_frame`      |
//! | [`ScheduleHost::request_timeout`] | `DndContext::on_timeout`    |
//!
//! In a browser-like host these map to idle callbacks, animation frames, and
//! timers; a test or game-loop host can satisfy them however it likes, or use
//! [`ManualHost`] and drive the context entry points directly.

/// Slots the coordination context requests from its hosting environment.
///
/// Requests are edge-triggered: the core asks for at most one idle slot at a
/// time (repeat measurement requests coalesce into the pending one), and one
/// timeout per debounce interval.
pub trait ScheduleHost {
    /// Ask for one low-priority slot. The host should eventually call
    /// `DndContext::run_scheduled` once per request that was not canceled.
    fn request_idle(&mut self);

    /// Withdraw the outstanding idle slot, if any. Issued when the pending
    /// measurement set empties before the slot fires.
    fn cancel_idle(&mut self);

    /// Ask for a slot before the next repaint; the host should call
    /// `DndContext::on_frame` when it fires.
    fn request_frame(&mut self);

    /// Ask for a slot after roughly `delay_ms` milliseconds; the host should
    /// call `DndContext::on_timeout` when it fires.
    fn request_timeout(&mut self, delay_ms: u32);
}

/// A host that never grants slots.
///
/// For embedders that drive the context directly (tests, deterministic
/// simulations): call `run_scheduled`, `on_frame`, and `on_timeout` yourself
/// at the cadence you control.
#[derive(Copy, Clone, Debug, Default)]
pub struct ManualHost;

impl ScheduleHost for ManualHost {
    fn request_idle(&mut self) {}
    fn cancel_idle(&mut self) {}
    fn request_frame(&mut self) {}
    fn request_timeout(&mut self, _delay_ms: u32) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_host_is_inert() {
        let mut host = ManualHost;
        host.request_idle();
        host.cancel_idle();
        host.request_frame();
        host.request_timeout(16);
    }
}
