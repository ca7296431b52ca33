// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Handler handles for signal observers.
//!
//! A [`Handler`] is an owning, cloneable handle around an observer
//! callable. The owner keeps the handle alive for as long as it wants to
//! receive firings; signals only hold weak references to it, so a
//! registration never extends the handler's lifetime. Dropping the last
//! clone of a handle makes its registrations inert, as if it had been
//! disconnected.

use std::fmt;
use std::sync::{Arc, Weak};

use crate::signal::Signal;

/// Type alias for errors produced by fallible handlers.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Result type returned by a handler invocation.
pub type HandlerResult = std::result::Result<(), HandlerError>;

/// The callable contract a signal dispatches to: the fired signal plus a
/// reference to the firing's argument payload.
pub(crate) type HandlerFn<A, R> = dyn Fn(&Signal<A, R>, &A) -> HandlerResult + Send + Sync;

/// Identity token for a handler, derived from its shared allocation.
///
/// Clones of a [`Handler`] share the same identity, which is what makes
/// connect idempotent and disconnect symmetric across clones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct HandlerId(usize);

/// An observer registered with one or more [`Signal`]s.
///
/// Handlers are invoked synchronously, in registration order, with a
/// reference to the signal that fired (so one handler can observe several
/// signals) and the firing's arguments.
///
/// The `label` identifies the handler in logs and in aggregated dispatch
/// errors; it has no bearing on identity.
///
/// # Examples
///
/// ```
/// use announce::{Handler, Signal};
///
/// # fn main() -> announce::Result<()> {
/// let on_ready: Signal<String> = Signal::new("on_ready");
/// let greet = Handler::new("greet", |signal: &Signal<String>, name: &String| {
///     println!("{} fired for {name}", signal.name());
/// });
/// on_ready.connect(&greet);
/// on_ready.fire("world".to_owned())?;
/// # Ok(())
/// # }
/// ```
pub struct Handler<A: 'static, R: 'static = ()> {
    label: String,
    func: Arc<HandlerFn<A, R>>,
}

impl<A: 'static, R: 'static> Handler<A, R> {
    /// Creates a handler from an infallible closure.
    pub fn new<F>(label: impl Into<String>, func: F) -> Self
    where
        F: Fn(&Signal<A, R>, &A) + Send + Sync + 'static,
    {
        Self {
            label: label.into(),
            func: Arc::new(move |signal, args| {
                func(signal, args);
                Ok(())
            }),
        }
    }

    /// Creates a handler from a closure that can fail.
    ///
    /// A returned error does not stop dispatch to sibling handlers; it is
    /// collected and surfaced to the firing caller inside a
    /// [`DispatchError`](crate::DispatchError) once the full pass is over.
    pub fn fallible<F>(label: impl Into<String>, func: F) -> Self
    where
        F: Fn(&Signal<A, R>, &A) -> HandlerResult + Send + Sync + 'static,
    {
        Self {
            label: label.into(),
            func: Arc::new(func),
        }
    }

    /// Returns the handler's label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    pub(crate) fn id(&self) -> HandlerId {
        HandlerId(Arc::as_ptr(&self.func).cast::<()>() as usize)
    }

    pub(crate) fn downgrade(&self) -> Weak<HandlerFn<A, R>> {
        Arc::downgrade(&self.func)
    }
}

impl<A: 'static, R: 'static> Clone for Handler<A, R> {
    fn clone(&self) -> Self {
        Self {
            label: self.label.clone(),
            func: Arc::clone(&self.func),
        }
    }
}

impl<A: 'static, R: 'static> fmt::Debug for Handler<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}
