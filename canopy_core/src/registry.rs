// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Insertion-ordered keyed registries and the pending-operation queue.
//!
//! ## Overview
//!
//! A [`Registry`] is a flat vector with linear lookup. Registries hold at
//! most a few dozen entries in practice, and iteration order doubles as
//! registration order (which downstream tie-breaking depends on), so a flat
//! scan beats a map here.
//!
//! Mutations issued through the coordination facade are not applied
//! immediately. They queue as [`PendingOp`] values and are drained atomically
//! by `DndContext::commit` at the end of the current turn, which reports the
//! net effect as one [`CommitSummary`]. Registering, unregistering, and
//! toggling disabled within one turn therefore produce exactly one
//! state-change notification, however many calls were made.

use alloc::vec::Vec;

use crate::types::{DraggableEntry, DroppableContainer, RegistrationKey};

/// Access to the registration key stored in an entry.
pub trait Keyed {
    /// The key of the entry's current registration lifetime.
    fn registration_key(&self) -> RegistrationKey;
}

impl<K, N, D> Keyed for DraggableEntry<K, N, D> {
    fn registration_key(&self) -> RegistrationKey {
        self.key
    }
}

impl<K, N, D> Keyed for DroppableContainer<K, N, D> {
    fn registration_key(&self) -> RegistrationKey {
        self.key
    }
}

/// An insertion-ordered keyed collection with key-guarded removal.
#[derive(Clone, Debug)]
pub struct Registry<K, E> {
    entries: Vec<(K, E)>,
}

impl<K, E> Default for Registry<K, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, E> Registry<K, E> {
    /// Create an empty registry.
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no entries are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &E)> {
        self.entries.iter().map(|(k, e)| (k, e))
    }

    /// Iterate entries mutably in registration order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut E> {
        self.entries.iter_mut().map(|(_, e)| e)
    }
}

impl<K: PartialEq, E: Keyed> Registry<K, E> {
    /// Insert or replace the entry for `id`.
    ///
    /// Replacing keeps the id's original position, so registration order,
    /// and with it collision tie-breaking, is stable across remounts.
    pub fn register(&mut self, id: K, entry: E) {
        match self.entries.iter_mut().find(|(k, _)| *k == id) {
            Some(slot) => slot.1 = entry,
            None => self.entries.push((id, entry)),
        }
    }

    /// Remove the entry for `id` if it still carries `key`.
    ///
    /// Returns whether an entry was removed. A mismatched key means a newer
    /// registration already replaced the entry; the call is then a no-op.
    pub fn unregister(&mut self, id: &K, key: RegistrationKey) -> bool {
        let Some(pos) = self.entries.iter().position(|(k, _)| k == id) else {
            return false;
        };
        if self.entries[pos].1.registration_key() != key {
            return false;
        }
        self.entries.remove(pos);
        true
    }

    /// Look up an entry by id.
    pub fn get(&self, id: &K) -> Option<&E> {
        self.entries.iter().find(|(k, _)| k == id).map(|(_, e)| e)
    }

    /// Look up an entry mutably by id.
    pub fn get_mut(&mut self, id: &K) -> Option<&mut E> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == id)
            .map(|(_, e)| e)
    }

    /// Whether `id` has a live entry.
    pub fn contains(&self, id: &K) -> bool {
        self.entries.iter().any(|(k, _)| k == id)
    }
}

/// A queued registry mutation, applied by `DndContext::commit`.
#[derive(Clone, Debug)]
pub(crate) enum PendingOp<K, N, D> {
    RegisterDraggable(DraggableEntry<K, N, D>),
    UnregisterDraggable { id: K, key: RegistrationKey },
    SetDraggableDisabled {
        id: K,
        key: RegistrationKey,
        disabled: bool,
    },
    RegisterDroppable(DroppableContainer<K, N, D>),
    UnregisterDroppable { id: K, key: RegistrationKey },
    SetDroppableDisabled {
        id: K,
        key: RegistrationKey,
        disabled: bool,
    },
}

/// Net registry changes applied by one `DndContext::commit`.
///
/// This is the single notification for the whole batch; an empty summary
/// means the commit observed no effective change.
#[derive(Clone, Debug)]
pub struct CommitSummary<K> {
    /// Draggable ids registered or re-registered.
    pub draggables_registered: Vec<K>,
    /// Draggable ids whose key-matched unregistration was applied.
    pub draggables_unregistered: Vec<K>,
    /// Draggable ids whose disabled flag changed.
    pub draggables_disabled_changed: Vec<K>,
    /// Droppable ids registered or re-registered.
    pub droppables_registered: Vec<K>,
    /// Droppable ids whose key-matched unregistration was applied.
    pub droppables_unregistered: Vec<K>,
    /// Droppable ids whose disabled flag changed.
    pub droppables_disabled_changed: Vec<K>,
}

impl<K> Default for CommitSummary<K> {
    fn default() -> Self {
        Self {
            draggables_registered: Vec::new(),
            draggables_unregistered: Vec::new(),
            draggables_disabled_changed: Vec::new(),
            droppables_registered: Vec::new(),
            droppables_unregistered: Vec::new(),
            droppables_disabled_changed: Vec::new(),
        }
    }
}

impl<K> CommitSummary<K> {
    /// True if the commit changed nothing.
    pub fn is_empty(&self) -> bool {
        self.draggables_registered.is_empty()
            && self.draggables_unregistered.is_empty()
            && self.draggables_disabled_changed.is_empty()
            && self.droppables_registered.is_empty()
            && self.droppables_unregistered.is_empty()
            && self.droppables_disabled_changed.is_empty()
    }
}
