// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `announce` - in-process signals for loosely-coupled components.
//!
//! This library lets a component declare a named [`Signal`], lets
//! arbitrary observers [`connect`](Signal::connect) a [`Handler`] to it,
//! and delivers every firing synchronously, in registration order, to
//! all live handlers. A component can announce "state changed" without
//! knowing who, if anyone, is listening.
//!
//! # Core Properties
//!
//! - **Ordered, synchronous dispatch**: handlers run on the firing
//!   thread, in the order they were connected
//! - **Observed, not owned**: signals hold handlers weakly; dropping a
//!   handler's last handle is equivalent to disconnecting it
//! - **Idempotent connect, loud disconnect**: connecting twice is a
//!   no-op, disconnecting what is not connected is an error
//! - **At-least-once delivery under partial failure**: a failing handler
//!   never stops its siblings; failures are aggregated and surfaced to
//!   the firing caller afterwards
//! - **Test harness**: the [`testing`] module records firings across
//!   signals and offers ordering-aware assertions (enabled by the
//!   `testing` feature, on by default)
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//!
//! use announce::{Handler, Signal};
//! use parking_lot::Mutex;
//!
//! # fn main() -> announce::Result<()> {
//! // Declare a signal owned by whoever announces readiness.
//! let on_ready: Signal<String> = Signal::new("on_ready");
//!
//! // Connect an observer. The handler handle must stay alive for as
//! // long as the observer wants to receive firings.
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&seen);
//! let log_ready = Handler::new("log_ready", move |_signal: &Signal<String>, msg: &String| {
//!     sink.lock().push(msg.clone());
//! });
//! on_ready.connect(&log_ready);
//!
//! // Fire. Every live handler sees the arguments.
//! on_ready.fire("ready".to_owned())?;
//! assert_eq!(*seen.lock(), ["ready"]);
//!
//! on_ready.disconnect(&log_ready)?;
//! # Ok(())
//! # }
//! ```
//!
//! # Wrapping a Callable
//!
//! A signal can wrap a *responder* that runs before dispatch on every
//! firing; its return value comes back from [`Signal::fire`]:
//!
//! ```
//! use announce::Signal;
//!
//! # fn main() -> announce::Result<()> {
//! let on_sum = Signal::define("on_sum", |values: &Vec<u32>| values.iter().sum::<u32>());
//! let total = on_sum.fire(vec![1, 2, 3])?;
//! assert_eq!(total, 6);
//! # Ok(())
//! # }
//! ```
//!
//! # Verifying Signals in Tests
//!
//! ```
//! use announce::Signal;
//! use announce::testing::{SignalRecorder, assert_ordering};
//!
//! # fn main() -> announce::Result<()> {
//! let on_started: Signal<u32> = Signal::new("on_started");
//! let on_finished: Signal<u32> = Signal::new("on_finished");
//!
//! let recorder = SignalRecorder::new();
//! recorder.watch(&on_started);
//! recorder.watch(&on_finished);
//!
//! on_started.fire(7)?;
//! on_finished.fire(7)?;
//!
//! assert_ordering(&recorder, &["on_started", "on_finished"])?;
//! recorder.teardown();
//! # Ok(())
//! # }
//! ```
//!
//! # Threading
//!
//! Signals and handlers are `Send + Sync`, and each signal guards its
//! registrations with a single lock, so concurrent connect, disconnect,
//! and fire calls never corrupt the registry. Dispatch itself happens
//! outside that lock on whichever thread fires; no delivery-order
//! guarantee exists across threads, and a hung handler hangs its firing
//! caller. There is no asynchronous or cross-process delivery.

pub mod error;
mod handler;
mod registry;
mod signal;
#[cfg(feature = "testing")]
pub mod testing;

pub use error::{AssertionError, DispatchError, Error, HandlerFailure, Result};
pub use handler::{Handler, HandlerError, HandlerResult};
pub use signal::Signal;
