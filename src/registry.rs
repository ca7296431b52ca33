// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Ordered, liveness-aware handler storage for one signal.
//!
//! The registry keeps registrations in connect order, de-duplicated by
//! handler identity, holding only weak references. Expired entries are
//! dropped lazily while traversing, so no separate cleanup pass is
//! needed.

use std::sync::{Arc, Weak};

use crate::handler::{Handler, HandlerFn, HandlerId};

/// One registration: identity, label for error reporting, and a weak
/// reference to the handler callable.
struct HandlerEntry<A: 'static, R: 'static> {
    id: HandlerId,
    label: String,
    func: Weak<HandlerFn<A, R>>,
}

impl<A: 'static, R: 'static> HandlerEntry<A, R> {
    fn is_live(&self) -> bool {
        self.func.strong_count() > 0
    }
}

/// An upgraded snapshot entry handed to the dispatch loop.
pub(crate) struct LiveHandler<A: 'static, R: 'static> {
    pub(crate) label: String,
    pub(crate) func: Arc<HandlerFn<A, R>>,
}

/// Per-signal collection of handler registrations.
///
/// Mutated only under the owning signal's lock; the expected registry
/// size is small, so identity checks are linear scans.
pub(crate) struct HandlerRegistry<A: 'static, R: 'static> {
    entries: Vec<HandlerEntry<A, R>>,
}

impl<A: 'static, R: 'static> HandlerRegistry<A, R> {
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Appends a registration unless the handler is already present.
    ///
    /// Returns `true` if the handler was newly added. Expired entries are
    /// purged first so a recycled allocation can never alias a dead
    /// registration.
    pub(crate) fn add(&mut self, handler: &Handler<A, R>) -> bool {
        self.purge_expired();
        let id = handler.id();
        if self.entries.iter().any(|entry| entry.id == id) {
            return false;
        }
        self.entries.push(HandlerEntry {
            id,
            label: handler.label().to_owned(),
            func: handler.downgrade(),
        });
        true
    }

    /// Removes a registration by handler identity.
    ///
    /// Returns `false` when no live registration for the handler exists.
    pub(crate) fn remove(&mut self, handler: &Handler<A, R>) -> bool {
        self.purge_expired();
        let id = handler.id();
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        self.entries.len() != before
    }

    /// Returns an ordered snapshot of the currently-live handlers.
    ///
    /// Expired entries are dropped from the backing collection as a side
    /// effect of the traversal.
    pub(crate) fn live(&mut self) -> Vec<LiveHandler<A, R>> {
        let mut live = Vec::with_capacity(self.entries.len());
        self.entries.retain(|entry| match entry.func.upgrade() {
            Some(func) => {
                live.push(LiveHandler {
                    label: entry.label.clone(),
                    func,
                });
                true
            }
            None => false,
        });
        live
    }

    /// Drops every registration.
    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of live registrations, without mutating the collection.
    pub(crate) fn live_count(&self) -> usize {
        self.entries.iter().filter(|entry| entry.is_live()).count()
    }

    fn purge_expired(&mut self) {
        self.entries.retain(HandlerEntry::is_live);
    }
}
