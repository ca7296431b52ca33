// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Minimal walkthrough: declare a signal, connect handlers, fire it.
//!
//! Run with `RUST_LOG=announce=debug` to see the connect/dispatch
//! lifecycle in the log output.

use std::sync::Arc;

use announce::{Handler, Signal};
use parking_lot::Mutex;

/// A component that owns its signals and announces state transitions.
struct Service {
    on_ready: Signal<String>,
}

impl Service {
    fn new() -> Self {
        Self {
            on_ready: Signal::new("Service::on_ready"),
        }
    }

    fn start(&self) -> announce::Result<()> {
        // Real work would happen here; afterwards, announce readiness.
        self.on_ready.fire("service started".to_owned())?;
        Ok(())
    }
}

fn main() -> announce::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let service = Service::new();

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let log_ready = Handler::new("log_ready", move |signal: &Signal<String>, msg: &String| {
        println!("{} fired: {msg}", signal.name());
        sink.lock().push(msg.clone());
    });

    service.on_ready.connect(&log_ready);
    service.start()?;

    println!("observed: {:?}", *seen.lock());

    service.on_ready.disconnect(&log_ready)?;
    Ok(())
}
