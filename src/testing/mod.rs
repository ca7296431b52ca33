// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Test harness for observing signal behavior.
//!
//! This module provides the tools to verify how signals fire during a
//! test:
//!
//! - [`SignalRecorder`] - Watches signals and logs every firing
//! - [`FiringRecord`] - One logged firing: signal name, serialized
//!   arguments, global sequence number
//! - Assertion functions - Pure queries over the log:
//!   [`assert_fired`], [`assert_not_fired`], [`assert_ordering`] and
//!   their argument-matching variants
//!
//! # Usage
//!
//! Watch the signals under test, run the code that is supposed to fire
//! them, then assert on the log:
//!
//! ```
//! use announce::Signal;
//! use announce::testing::{SignalRecorder, assert_fired_with, assert_not_fired};
//! use serde_json::json;
//!
//! # fn main() -> announce::Result<()> {
//! let on_saved: Signal<String> = Signal::new("on_saved");
//! let on_deleted: Signal<String> = Signal::new("on_deleted");
//!
//! let recorder = SignalRecorder::new();
//! recorder.watch(&on_saved);
//! recorder.watch(&on_deleted);
//!
//! on_saved.fire("draft.txt".to_owned())?;
//!
//! assert_fired_with(&recorder, &on_saved, &json!("draft.txt"))?;
//! assert_not_fired(&recorder, &on_deleted)?;
//!
//! recorder.teardown();
//! # Ok(())
//! # }
//! ```
//!
//! The recorder disconnects its probes on [`SignalRecorder::teardown`]
//! and again on drop, so watched signals are always left clean, whatever
//! the test outcome.

mod assert;
mod recorder;

pub use assert::{
    assert_fired, assert_fired_matching, assert_fired_with, assert_not_fired,
    assert_not_fired_matching, assert_not_fired_with, assert_ordering,
};
pub use recorder::{FiringRecord, SignalRecorder};
