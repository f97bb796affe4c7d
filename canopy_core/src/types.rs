// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Registry entry types: registration keys, flags, draggables, droppables.

use kurbo::Rect;

/// Token distinguishing successive registration lifetimes of one identifier.
///
/// Allocated monotonically by the coordination context on every
/// registration. An unregistration only takes effect while the stored entry
/// still carries the same key, so a stale unregister arriving after a
/// remount (which re-registered the id under a fresh key) is a silent no-op
/// rather than a corruption.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct RegistrationKey(u64);

impl RegistrationKey {
    pub(crate) const fn new(raw: u64) -> Self {
        Self(raw)
    }
}

bitflags::bitflags! {
    /// Flags controlling an entry's participation in drag interactions.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct EntryFlags: u8 {
        /// Entry is excluded: a disabled draggable refuses to start a drag;
        /// a disabled droppable is skipped as a collision candidate.
        const DISABLED = 0b0000_0001;
    }
}

impl Default for EntryFlags {
    fn default() -> Self {
        Self::empty()
    }
}

/// A registered drag source.
#[derive(Clone, Debug)]
pub struct DraggableEntry<K, N, D = ()> {
    /// Identifier, unique within the draggable registry.
    pub id: K,
    /// Key of this registration lifetime.
    pub key: RegistrationKey,
    /// Handle to the node's live geometry.
    pub node: N,
    /// Optional secondary handle for the element that starts the drag
    /// (a grip or handle distinct from the dragged node itself).
    pub activator: Option<N>,
    /// Participation flags.
    pub flags: EntryFlags,
    /// Caller-attached payload, handed back on queries.
    pub data: D,
}

/// A registered candidate drop target.
#[derive(Clone, Debug)]
pub struct DroppableContainer<K, N, D = ()> {
    /// Identifier, unique within the droppable registry.
    pub id: K,
    /// Key of this registration lifetime.
    pub key: RegistrationKey,
    /// Handle to the container's live geometry.
    pub node: N,
    /// Participation flags.
    pub flags: EntryFlags,
    /// Rectangle from the last successful measurement. `None` until first
    /// measured, and cleared again when a measurement fails.
    pub rect: Option<Rect>,
    /// Caller-attached payload, handed back on queries.
    pub data: D,
}

impl<K, N, D> DraggableEntry<K, N, D> {
    /// Whether this entry currently refuses to start a drag.
    pub fn is_disabled(&self) -> bool {
        self.flags.contains(EntryFlags::DISABLED)
    }
}

impl<K, N, D> DroppableContainer<K, N, D> {
    /// Whether this container is currently excluded from collision candidacy.
    pub fn is_disabled(&self) -> bool {
        self.flags.contains(EntryFlags::DISABLED)
    }
}
