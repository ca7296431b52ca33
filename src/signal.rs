// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The signal dispatch point.
//!
//! A [`Signal`] wraps a callable (the *responder*) behind a stable name.
//! Firing the signal runs the responder first and then delivers the
//! firing's arguments to every connected handler, synchronously, in
//! registration order. Handlers are observed, not owned: the signal holds
//! weak references, so a registration never keeps a handler alive.
//!
//! Signals are cheap handles over shared state. Clone one freely and hand
//! the clones to whoever needs to fire or observe it; all clones address
//! the same dispatch point. Declare signals as fields of the component
//! that owns them, so their lifetime is tied to that component rather
//! than to ambient global state.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::{DispatchError, Error, HandlerFailure, Result};
use crate::handler::Handler;
use crate::registry::HandlerRegistry;

/// The wrapped callable a signal runs before dispatching to handlers.
type Responder<A, R> = Box<dyn Fn(&A) -> R + Send + Sync>;

/// A named dispatch point delivering argument payloads of type `A` to
/// subscribed handlers, returning `R` from its wrapped callable.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use announce::{Handler, Signal};
/// use parking_lot::Mutex;
///
/// # fn main() -> announce::Result<()> {
/// let on_ready: Signal<String> = Signal::new("on_ready");
///
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let sink = Arc::clone(&seen);
/// let log_ready = Handler::new("log_ready", move |_signal: &Signal<String>, msg: &String| {
///     sink.lock().push(msg.clone());
/// });
///
/// on_ready.connect(&log_ready);
/// on_ready.fire("ready".to_owned())?;
/// assert_eq!(*seen.lock(), ["ready"]);
/// # Ok(())
/// # }
/// ```
///
/// # Re-entrancy
///
/// Dispatch happens outside the signal's internal lock, so a handler may
/// connect, disconnect, or fire signals — including the one that invoked
/// it — without deadlocking. Registration changes made during a dispatch
/// pass take effect on the next firing. There is no guard against
/// unbounded recursion: a handler that unconditionally re-fires its own
/// signal will recurse until the stack runs out.
pub struct Signal<A: 'static, R: 'static = ()> {
    inner: Arc<SignalInner<A, R>>,
}

struct SignalInner<A: 'static, R: 'static> {
    name: String,
    responder: Responder<A, R>,
    registry: Mutex<HandlerRegistry<A, R>>,
}

impl<A: 'static> Signal<A> {
    /// Declares a signal with a no-op wrapped callable.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self::define(name, |_| ())
    }
}

impl<A: 'static, R: 'static> Signal<A, R> {
    /// Declares a signal wrapping `responder`.
    ///
    /// The responder runs on every firing, before any handler, and its
    /// return value is what [`fire`](Self::fire) returns on success.
    #[must_use]
    pub fn define<F>(name: impl Into<String>, responder: F) -> Self
    where
        F: Fn(&A) -> R + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(SignalInner {
                name: name.into(),
                responder: Box::new(responder),
                registry: Mutex::new(HandlerRegistry::new()),
            }),
        }
    }

    /// Returns the signal's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Registers `handler` to receive future firings.
    ///
    /// Idempotent: connecting a handler (or a clone of it) that is
    /// already connected is a silent no-op. Handlers are invoked in
    /// registration order; a handler disconnected and connected again
    /// moves to the end of that order.
    pub fn connect(&self, handler: &Handler<A, R>) {
        let added = self.inner.registry.lock().add(handler);
        if added {
            tracing::debug!(
                signal = %self.inner.name,
                handler = %handler.label(),
                "Connected handler"
            );
        } else {
            tracing::debug!(
                signal = %self.inner.name,
                handler = %handler.label(),
                "Handler already connected, ignoring"
            );
        }
    }

    /// Removes a previously connected handler.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotConnected`] when the handler is not currently
    /// registered — never connected, already disconnected, or expired.
    /// Disconnect is deliberately loud so double-disconnect bugs surface
    /// instead of passing silently.
    pub fn disconnect(&self, handler: &Handler<A, R>) -> Result<()> {
        let removed = self.inner.registry.lock().remove(handler);
        if removed {
            tracing::debug!(
                signal = %self.inner.name,
                handler = %handler.label(),
                "Disconnected handler"
            );
            Ok(())
        } else {
            Err(Error::NotConnected {
                signal: self.inner.name.clone(),
                handler: handler.label().to_owned(),
            })
        }
    }

    /// Drops every registration at once.
    ///
    /// Useful when tearing down the component that owns the signal.
    pub fn disconnect_all(&self) {
        self.inner.registry.lock().clear();
        tracing::debug!(signal = %self.inner.name, "Disconnected all handlers");
    }

    /// Fires the signal.
    ///
    /// Runs the wrapped callable with `args`, snapshots the live handlers
    /// under the registry lock, then invokes each one outside the lock,
    /// in registration order, with a reference to this signal and the
    /// arguments. Every live handler sees every firing: a failing handler
    /// never prevents delivery to the rest.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Dispatch`] naming every failing handler when one
    /// or more handlers returned an error. The error is raised only after
    /// the full dispatch pass; the wrapped callable's return value is
    /// discarded in that case.
    pub fn fire(&self, args: A) -> Result<R> {
        let value = (self.inner.responder)(&args);
        let live = self.inner.registry.lock().live();
        tracing::trace!(
            signal = %self.inner.name,
            handlers = live.len(),
            "Dispatching signal"
        );

        let mut failures = Vec::new();
        for handler in live {
            if let Err(error) = (handler.func)(self, &args) {
                tracing::warn!(
                    signal = %self.inner.name,
                    handler = %handler.label,
                    error = %error,
                    "Handler failed during dispatch"
                );
                failures.push(HandlerFailure {
                    handler: handler.label,
                    error,
                });
            }
        }

        if failures.is_empty() {
            Ok(value)
        } else {
            Err(Error::Dispatch(DispatchError {
                signal: self.inner.name.clone(),
                failures,
            }))
        }
    }

    /// Number of currently-live handler registrations.
    #[must_use]
    pub fn handler_count(&self) -> usize {
        self.inner.registry.lock().live_count()
    }

    /// Stable identity of this dispatch point, shared by all clones.
    #[cfg(feature = "testing")]
    pub(crate) fn id(&self) -> usize {
        Arc::as_ptr(&self.inner).cast::<()>() as usize
    }
}

impl<A: 'static, R: 'static> Clone for Signal<A, R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A: 'static, R: 'static> fmt::Debug for Signal<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("name", &self.inner.name)
            .field("handler_count", &self.handler_count())
            .finish()
    }
}
