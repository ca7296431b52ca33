// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end tests for the signal recorder and its assertions.

#![cfg(feature = "testing")]

use announce::testing::{
    SignalRecorder, assert_fired, assert_fired_matching, assert_fired_with, assert_not_fired,
    assert_ordering,
};
use announce::{AssertionError, Error, Handler, Signal};
use serde::Serialize;
use serde_json::json;

#[derive(Debug, Clone, Serialize)]
struct Job {
    id: u32,
    name: String,
}

fn job(id: u32, name: &str) -> Job {
    Job {
        id,
        name: name.to_owned(),
    }
}

// ============================================================================
// Recording Tests
// ============================================================================

mod recording {
    use super::*;

    #[test]
    fn watched_signal_firings_are_logged_in_order() {
        let on_started: Signal<Job> = Signal::new("on_started");
        let recorder = SignalRecorder::new();
        recorder.watch(&on_started);

        on_started.fire(job(1, "backup")).unwrap();
        on_started.fire(job(2, "restore")).unwrap();

        let records = recorder.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].args, json!({"id": 1, "name": "backup"}));
        assert_eq!(records[1].args, json!({"id": 2, "name": "restore"}));
        assert!(records[0].seq < records[1].seq);
    }

    #[test]
    fn one_log_spans_signals_with_different_payload_types() {
        let on_started: Signal<Job> = Signal::new("on_started");
        let on_idle: Signal<()> = Signal::new("on_idle");
        let recorder = SignalRecorder::new();
        recorder.watch(&on_started);
        recorder.watch(&on_idle);

        on_started.fire(job(1, "backup")).unwrap();
        on_idle.fire(()).unwrap();

        let names: Vec<_> = recorder
            .records()
            .iter()
            .map(|record| record.signal.clone())
            .collect();
        assert_eq!(names, ["on_started", "on_idle"]);
    }

    #[test]
    fn recorder_probe_coexists_with_ordinary_handlers() {
        let on_started: Signal<Job> = Signal::new("on_started");
        let noop = Handler::new("noop", |_signal: &Signal<Job>, _job: &Job| {});
        on_started.connect(&noop);

        let recorder = SignalRecorder::new();
        recorder.watch(&on_started);
        assert_eq!(on_started.handler_count(), 2);

        on_started.fire(job(1, "backup")).unwrap();
        assert_eq!(recorder.record_count(), 1);

        recorder.teardown();
        assert_eq!(on_started.handler_count(), 1);
    }

    #[test]
    fn teardown_runs_on_drop_even_after_a_failed_test_body() {
        let on_started: Signal<Job> = Signal::new("on_started");
        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let recorder = SignalRecorder::new();
            recorder.watch(&on_started);
            panic!("test body failed");
        }));
        assert!(outcome.is_err());
        assert_eq!(on_started.handler_count(), 0);
    }
}

// ============================================================================
// Assertion Tests
// ============================================================================

mod assertions {
    use super::*;

    #[test]
    fn fired_and_not_fired() {
        let on_started: Signal<Job> = Signal::new("on_started");
        let on_failed: Signal<Job> = Signal::new("on_failed");
        let recorder = SignalRecorder::new();
        recorder.watch(&on_started);
        recorder.watch(&on_failed);

        on_started.fire(job(1, "backup")).unwrap();

        assert_fired(&recorder, &on_started).unwrap();
        assert_not_fired(&recorder, &on_failed).unwrap();

        let err = assert_fired(&recorder, &on_failed).unwrap_err();
        assert!(matches!(
            err,
            Error::Assertion(AssertionError::NotFired { .. })
        ));
        let err = assert_not_fired(&recorder, &on_started).unwrap_err();
        assert!(matches!(
            err,
            Error::Assertion(AssertionError::UnexpectedlyFired { .. })
        ));
    }

    #[test]
    fn fired_with_matches_argument_content() {
        let on_started: Signal<Job> = Signal::new("on_started");
        let recorder = SignalRecorder::new();
        recorder.watch(&on_started);

        on_started.fire(job(7, "backup")).unwrap();

        assert_fired_with(&recorder, &on_started, &json!({"id": 7, "name": "backup"})).unwrap();
        assert_fired_matching(&recorder, &on_started, |args| args["id"] == json!(7)).unwrap();

        let err = assert_fired_with(&recorder, &on_started, &json!({"id": 8, "name": "backup"}))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Assertion(AssertionError::NotFired { .. })
        ));
    }

    #[test]
    fn cross_signal_ordering() {
        let on_a: Signal<u32> = Signal::new("a");
        let on_b: Signal<u32> = Signal::new("b");
        let recorder = SignalRecorder::new();
        recorder.watch(&on_a);
        recorder.watch(&on_b);

        on_a.fire(1).unwrap();
        on_b.fire(2).unwrap();
        on_a.fire(3).unwrap();

        assert_ordering(&recorder, &["a", "b", "a"]).unwrap();
        assert_ordering(&recorder, &["a", "b"]).unwrap();

        let err = assert_ordering(&recorder, &["b", "a", "b"]).unwrap_err();
        match err {
            Error::Assertion(AssertionError::OrderingMismatch { expected, .. }) => {
                assert_eq!(expected, ["b", "a", "b"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn assertion_failures_render_the_observed_log() {
        let on_a: Signal<u32> = Signal::new("a");
        let on_b: Signal<u32> = Signal::new("b");
        let recorder = SignalRecorder::new();
        recorder.watch(&on_a);
        recorder.watch(&on_b);

        on_a.fire(1).unwrap();

        let err = assert_fired(&recorder, &on_b).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("`b` was expected to fire"));
        assert!(message.contains("#0 a(1)"));
    }
}

// ============================================================================
// Lifecycle Tests
// ============================================================================

mod lifecycle {
    use super::*;

    #[test]
    fn watch_is_idempotent_across_clones() {
        let on_started: Signal<Job> = Signal::new("on_started");
        let recorder = SignalRecorder::new();
        recorder.watch(&on_started);
        recorder.watch(&on_started.clone());

        on_started.fire(job(1, "backup")).unwrap();
        assert_eq!(recorder.record_count(), 1);
    }

    #[test]
    fn reset_clears_the_log_but_keeps_watching() {
        let on_started: Signal<Job> = Signal::new("on_started");
        let recorder = SignalRecorder::new();
        recorder.watch(&on_started);

        on_started.fire(job(1, "backup")).unwrap();
        recorder.reset();
        assert!(recorder.is_empty());

        on_started.fire(job(2, "restore")).unwrap();
        let records = recorder.records();
        assert_eq!(records.len(), 1);
        // Sequence numbers are never reused.
        assert_eq!(records[0].seq, 1);
        assert_fired_with(&recorder, &on_started, &json!({"id": 2, "name": "restore"})).unwrap();
    }

    #[test]
    fn torn_down_recorder_sees_no_further_firings() {
        let on_started: Signal<Job> = Signal::new("on_started");
        let recorder = SignalRecorder::new();
        recorder.watch(&on_started);

        on_started.fire(job(1, "backup")).unwrap();
        recorder.teardown();
        on_started.fire(job(2, "restore")).unwrap();

        // The log survives teardown for post-hoc assertions.
        assert_eq!(recorder.record_count(), 1);
        assert_fired(&recorder, &on_started).unwrap();
    }
}
