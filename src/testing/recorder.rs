// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Recording of signal firings for test assertions.
//!
//! A [`SignalRecorder`] attaches a probe handler to each watched signal
//! and appends one [`FiringRecord`] per observed firing to a single
//! append-only log. Records carry a sequence number shared across all
//! watched signals, so tests can assert on the relative order of firings
//! of different signals.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use serde_json::Value;

use crate::handler::Handler;
use crate::signal::Signal;

/// One observed firing of a watched signal.
///
/// The firing's argument payload is stored serialized, so a single log
/// can hold firings of signals with different argument types and
/// assertions can match on argument content.
#[derive(Debug, Clone, PartialEq)]
pub struct FiringRecord {
    /// Name of the signal that fired.
    pub signal: String,
    /// The firing's argument payload, serialized.
    pub args: Value,
    /// Position in the recorder's log, shared across all watched
    /// signals; strictly increasing, never reused.
    pub seq: u64,
}

impl fmt::Display for FiringRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {}({})", self.seq, self.signal, self.args)
    }
}

#[derive(Debug, Default)]
struct LogInner {
    next_seq: u64,
    records: Vec<FiringRecord>,
}

/// Shared append-only log; the sequence counter and the record vector sit
/// behind one lock so they cannot diverge.
#[derive(Debug, Default)]
struct FiringLog {
    inner: Mutex<LogInner>,
}

impl FiringLog {
    fn append(&self, signal: &str, args: Value) {
        let mut inner = self.inner.lock();
        let seq = inner.next_seq;
        inner.next_seq += 1;
        tracing::trace!(signal = %signal, seq, "Recording signal firing");
        inner.records.push(FiringRecord {
            signal: signal.to_owned(),
            args,
            seq,
        });
    }

    fn snapshot(&self) -> Vec<FiringRecord> {
        self.inner.lock().records.clone()
    }

    fn clear(&self) {
        self.inner.lock().records.clear();
    }

    fn len(&self) -> usize {
        self.inner.lock().records.len()
    }
}

/// One watched signal: its name for logging, and the action that
/// disconnects the probe again.
struct Watch {
    signal: String,
    disconnect: Box<dyn FnOnce() -> crate::Result<()> + Send>,
}

/// Records firings of one or more watched signals during a test.
///
/// Watching connects an internal probe handler; the recorder keeps the
/// probe alive, so the registration stays live until [`teardown`] runs.
/// Teardown also happens on drop, so probes never outlive the recording
/// scope regardless of test outcome.
///
/// [`teardown`]: Self::teardown
///
/// # Examples
///
/// ```
/// use announce::Signal;
/// use announce::testing::{SignalRecorder, assert_fired, assert_ordering};
///
/// # fn main() -> announce::Result<()> {
/// let on_started: Signal<u32> = Signal::new("on_started");
/// let on_finished: Signal<u32> = Signal::new("on_finished");
///
/// let recorder = SignalRecorder::new();
/// recorder.watch(&on_started);
/// recorder.watch(&on_finished);
///
/// on_started.fire(7)?;
/// on_finished.fire(7)?;
///
/// assert_fired(&recorder, &on_started)?;
/// assert_ordering(&recorder, &["on_started", "on_finished"])?;
///
/// recorder.teardown();
/// # Ok(())
/// # }
/// ```
pub struct SignalRecorder {
    log: Arc<FiringLog>,
    watches: Mutex<HashMap<usize, Watch>>,
}

impl SignalRecorder {
    /// Creates a recorder with an empty log and no watched signals.
    #[must_use]
    pub fn new() -> Self {
        Self {
            log: Arc::new(FiringLog::default()),
            watches: Mutex::new(HashMap::new()),
        }
    }

    /// Starts watching `signal`.
    ///
    /// Every subsequent firing appends one record to the shared log.
    /// Idempotent per dispatch point: watching a signal (or a clone of
    /// it) that is already watched is a no-op, so records are never
    /// duplicated. A probe that fails to serialize the firing's
    /// arguments surfaces through the normal dispatch aggregation, like
    /// any other failing handler.
    pub fn watch<A, R>(&self, signal: &Signal<A, R>)
    where
        A: Serialize + 'static,
        R: 'static,
    {
        let mut watches = self.watches.lock();
        if watches.contains_key(&signal.id()) {
            tracing::debug!(signal = %signal.name(), "Signal already watched, ignoring");
            return;
        }

        let log = Arc::clone(&self.log);
        let probe = Handler::fallible(
            format!("recorder probe ({})", signal.name()),
            move |fired: &Signal<A, R>, args: &A| {
                let value = serde_json::to_value(args)?;
                log.append(fired.name(), value);
                Ok(())
            },
        );
        signal.connect(&probe);

        let owned = signal.clone();
        watches.insert(
            signal.id(),
            Watch {
                signal: signal.name().to_owned(),
                disconnect: Box::new(move || owned.disconnect(&probe)),
            },
        );
    }

    /// Disconnects every probe and stops watching.
    ///
    /// Idempotent; also invoked on drop. The log is left intact so
    /// assertions can still run after teardown. Disconnect failures are
    /// logged, not raised.
    pub fn teardown(&self) {
        let drained: Vec<Watch> = {
            let mut watches = self.watches.lock();
            watches.drain().map(|(_, watch)| watch).collect()
        };
        for watch in drained {
            if let Err(error) = (watch.disconnect)() {
                tracing::warn!(
                    signal = %watch.signal,
                    error = %error,
                    "Failed to disconnect recorder probe"
                );
            }
        }
    }

    /// Clears the recorded firings, keeping watches in place.
    ///
    /// The sequence counter is not rewound, so records taken before and
    /// after a reset can never share a sequence number.
    pub fn reset(&self) {
        self.log.clear();
    }

    /// Returns a snapshot of the recorded firings, in log order.
    #[must_use]
    pub fn records(&self) -> Vec<FiringRecord> {
        self.log.snapshot()
    }

    /// Number of recorded firings.
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.log.len()
    }

    /// Returns `true` if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.record_count() == 0
    }

    /// Number of signals currently watched.
    #[must_use]
    pub fn watched_count(&self) -> usize {
        self.watches.lock().len()
    }
}

impl Default for SignalRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for SignalRecorder {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl fmt::Debug for SignalRecorder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignalRecorder")
            .field("record_count", &self.record_count())
            .field("watched_count", &self.watched_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_firings_with_arguments() {
        let signal: Signal<u32> = Signal::new("on_value");
        let recorder = SignalRecorder::new();
        recorder.watch(&signal);

        signal.fire(42).unwrap();

        let records = recorder.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].signal, "on_value");
        assert_eq!(records[0].args, serde_json::json!(42));
        assert_eq!(records[0].seq, 0);
    }

    #[test]
    fn sequence_is_shared_across_signals() {
        let first: Signal<u32> = Signal::new("first");
        let second: Signal<u32> = Signal::new("second");
        let recorder = SignalRecorder::new();
        recorder.watch(&first);
        recorder.watch(&second);

        first.fire(1).unwrap();
        second.fire(2).unwrap();
        first.fire(3).unwrap();

        let seqs: Vec<_> = recorder
            .records()
            .iter()
            .map(|r| (r.signal.clone(), r.seq))
            .collect();
        assert_eq!(
            seqs,
            [
                ("first".to_owned(), 0),
                ("second".to_owned(), 1),
                ("first".to_owned(), 2),
            ]
        );
    }

    #[test]
    fn watch_is_idempotent_per_signal() {
        let signal: Signal<u32> = Signal::new("on_value");
        let recorder = SignalRecorder::new();
        recorder.watch(&signal);
        recorder.watch(&signal);
        recorder.watch(&signal.clone());

        signal.fire(1).unwrap();

        assert_eq!(recorder.record_count(), 1);
        assert_eq!(recorder.watched_count(), 1);
    }

    #[test]
    fn teardown_disconnects_probes() {
        let signal: Signal<u32> = Signal::new("on_value");
        let recorder = SignalRecorder::new();
        recorder.watch(&signal);
        assert_eq!(signal.handler_count(), 1);

        recorder.teardown();
        assert_eq!(signal.handler_count(), 0);
        assert_eq!(recorder.watched_count(), 0);

        signal.fire(1).unwrap();
        assert!(recorder.is_empty());

        // A second teardown has nothing left to do.
        recorder.teardown();
    }

    #[test]
    fn drop_disconnects_probes() {
        let signal: Signal<u32> = Signal::new("on_value");
        {
            let recorder = SignalRecorder::new();
            recorder.watch(&signal);
            assert_eq!(signal.handler_count(), 1);
        }
        assert_eq!(signal.handler_count(), 0);
    }

    #[test]
    fn reset_clears_records_but_keeps_sequence_monotonic() {
        let signal: Signal<u32> = Signal::new("on_value");
        let recorder = SignalRecorder::new();
        recorder.watch(&signal);

        signal.fire(1).unwrap();
        signal.fire(2).unwrap();
        recorder.reset();
        assert!(recorder.is_empty());

        signal.fire(3).unwrap();
        let records = recorder.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].seq, 2);
    }

    #[test]
    fn record_display() {
        let record = FiringRecord {
            signal: "on_value".to_owned(),
            args: serde_json::json!([7]),
            seq: 3,
        };
        assert_eq!(record.to_string(), "#3 on_value([7])");
    }

    #[test]
    fn recorder_debug() {
        let recorder = SignalRecorder::new();
        let debug = format!("{recorder:?}");
        assert!(debug.contains("SignalRecorder"));
        assert!(debug.contains("record_count"));
    }
}
