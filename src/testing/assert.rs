// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Assertions over a recorder's log.
//!
//! Pure read-only queries over [`SignalRecorder::records`]; each fails
//! with a descriptive [`AssertionError`] when the expected property does
//! not hold. The positive assertions return the first matching record,
//! which is handy for follow-up checks on its arguments or sequence
//! number.

use serde_json::Value;

use super::recorder::{FiringRecord, SignalRecorder};
use crate::error::{AssertionError, Result};
use crate::signal::Signal;

/// Asserts that `signal` fired at least once.
///
/// # Errors
///
/// Returns [`AssertionError::NotFired`] when no record for the signal
/// exists.
pub fn assert_fired<A: 'static, R: 'static>(
    recorder: &SignalRecorder,
    signal: &Signal<A, R>,
) -> Result<FiringRecord> {
    fired_matching(recorder, signal.name(), |_| true)
}

/// Asserts that `signal` fired at least once with exactly `args`.
///
/// # Errors
///
/// Returns [`AssertionError::NotFired`] when no record for the signal
/// carries the given arguments.
pub fn assert_fired_with<A: 'static, R: 'static>(
    recorder: &SignalRecorder,
    signal: &Signal<A, R>,
    args: &Value,
) -> Result<FiringRecord> {
    fired_matching(recorder, signal.name(), |candidate| candidate == args)
}

/// Asserts that `signal` fired at least once with arguments accepted by
/// `matcher`.
///
/// # Errors
///
/// Returns [`AssertionError::NotFired`] when no record for the signal
/// satisfies the matcher.
pub fn assert_fired_matching<A: 'static, R: 'static, M>(
    recorder: &SignalRecorder,
    signal: &Signal<A, R>,
    matcher: M,
) -> Result<FiringRecord>
where
    M: Fn(&Value) -> bool,
{
    fired_matching(recorder, signal.name(), matcher)
}

/// Asserts that `signal` never fired.
///
/// # Errors
///
/// Returns [`AssertionError::UnexpectedlyFired`] when a record for the
/// signal exists.
pub fn assert_not_fired<A: 'static, R: 'static>(
    recorder: &SignalRecorder,
    signal: &Signal<A, R>,
) -> Result<()> {
    not_fired_matching(recorder, signal.name(), |_| true)
}

/// Asserts that `signal` never fired with exactly `args`.
///
/// # Errors
///
/// Returns [`AssertionError::UnexpectedlyFired`] when a record for the
/// signal carries the given arguments.
pub fn assert_not_fired_with<A: 'static, R: 'static>(
    recorder: &SignalRecorder,
    signal: &Signal<A, R>,
    args: &Value,
) -> Result<()> {
    not_fired_matching(recorder, signal.name(), |candidate| candidate == args)
}

/// Asserts that `signal` never fired with arguments accepted by
/// `matcher`.
///
/// # Errors
///
/// Returns [`AssertionError::UnexpectedlyFired`] when a record for the
/// signal satisfies the matcher.
pub fn assert_not_fired_matching<A: 'static, R: 'static, M>(
    recorder: &SignalRecorder,
    signal: &Signal<A, R>,
    matcher: M,
) -> Result<()>
where
    M: Fn(&Value) -> bool,
{
    not_fired_matching(recorder, signal.name(), matcher)
}

/// Asserts that the named signals fired in the given relative order.
///
/// Succeeds when the names form a subsequence of the log — other firings
/// may be interleaved; only the relative order of the named ones counts.
/// An empty expectation always succeeds.
///
/// # Errors
///
/// Returns [`AssertionError::OrderingMismatch`] when no such subsequence
/// exists.
pub fn assert_ordering(recorder: &SignalRecorder, expected: &[&str]) -> Result<()> {
    let records = recorder.records();
    let mut remaining = records.iter();
    for name in expected {
        if !remaining.any(|record| record.signal == *name) {
            return Err(AssertionError::OrderingMismatch {
                expected: expected.iter().map(|name| (*name).to_owned()).collect(),
                observed: render_log(&records),
            }
            .into());
        }
    }
    Ok(())
}

fn fired_matching<M>(recorder: &SignalRecorder, signal: &str, matcher: M) -> Result<FiringRecord>
where
    M: Fn(&Value) -> bool,
{
    let records = recorder.records();
    records
        .iter()
        .find(|record| record.signal == signal && matcher(&record.args))
        .cloned()
        .ok_or_else(|| {
            AssertionError::NotFired {
                signal: signal.to_owned(),
                observed: render_log(&records),
            }
            .into()
        })
}

fn not_fired_matching<M>(recorder: &SignalRecorder, signal: &str, matcher: M) -> Result<()>
where
    M: Fn(&Value) -> bool,
{
    let records = recorder.records();
    match records
        .iter()
        .find(|record| record.signal == signal && matcher(&record.args))
    {
        Some(record) => Err(AssertionError::UnexpectedlyFired {
            signal: signal.to_owned(),
            record: record.to_string(),
        }
        .into()),
        None => Ok(()),
    }
}

fn render_log(records: &[FiringRecord]) -> String {
    if records.is_empty() {
        "no recorded firings".to_owned()
    } else {
        records
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}
