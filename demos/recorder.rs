// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Walkthrough of the test recorder: watch signals, fire them, assert
//! on the recorded log.

use announce::Signal;
use announce::testing::{SignalRecorder, assert_fired_with, assert_ordering};
use serde::Serialize;
use serde_json::json;

#[derive(Debug, Serialize)]
struct Job {
    id: u32,
    name: String,
}

fn main() -> announce::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let on_started: Signal<Job> = Signal::new("on_started");
    let on_finished: Signal<Job> = Signal::new("on_finished");

    let recorder = SignalRecorder::new();
    recorder.watch(&on_started);
    recorder.watch(&on_finished);

    on_started.fire(Job {
        id: 7,
        name: "backup".to_owned(),
    })?;
    on_finished.fire(Job {
        id: 7,
        name: "backup".to_owned(),
    })?;

    for record in recorder.records() {
        println!("{record}");
    }

    assert_fired_with(
        &recorder,
        &on_started,
        &json!({"id": 7, "name": "backup"}),
    )?;
    assert_ordering(&recorder, &["on_started", "on_finished"])?;

    recorder.teardown();
    println!("all assertions passed");
    Ok(())
}
