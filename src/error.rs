// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `announce` library.
//!
//! This module provides the error hierarchy for signal operations:
//! disconnect bookkeeping failures, aggregated handler failures raised
//! after a dispatch pass, and test-harness assertion failures.

use thiserror::Error;

use crate::handler::HandlerError;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Disconnect was called for a handler that is not currently
    /// registered: it was never connected, already disconnected, or has
    /// expired. This is surfaced loudly to catch double-disconnect bugs
    /// in the caller's bookkeeping.
    #[error("handler `{handler}` is not connected to signal `{signal}`")]
    NotConnected {
        /// Name of the signal the disconnect was attempted on.
        signal: String,
        /// Label of the handler that was not registered.
        handler: String,
    },

    /// One or more handlers failed during a dispatch pass.
    #[error("dispatch error: {0}")]
    Dispatch(#[from] DispatchError),

    /// A test assertion over recorded firings did not hold.
    #[error("assertion failed: {0}")]
    Assertion(#[from] AssertionError),
}

/// Aggregated failures from one dispatch pass.
///
/// Raised only after every live handler has been attempted, so a failing
/// handler never prevents its siblings from observing the firing. Carries
/// one [`HandlerFailure`] per failing handler.
#[derive(Debug, Error)]
#[error(
    "{} handler(s) failed while dispatching signal `{signal}`: {}",
    .failures.len(),
    format_failures(.failures)
)]
pub struct DispatchError {
    /// Name of the signal that was being dispatched.
    pub signal: String,
    /// The handlers that failed, in dispatch order.
    pub failures: Vec<HandlerFailure>,
}

/// One handler's failure during a dispatch pass.
#[derive(Debug)]
pub struct HandlerFailure {
    /// Label of the failing handler.
    pub handler: String,
    /// The error the handler returned.
    pub error: HandlerError,
}

fn format_failures(failures: &[HandlerFailure]) -> String {
    failures
        .iter()
        .map(|failure| format!("`{}`: {}", failure.handler, failure.error))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Failure modes of the test-harness assertions.
///
/// Each variant carries a human-readable rendering of the expected
/// condition and the recorded firings that were actually observed.
#[derive(Debug, Error)]
pub enum AssertionError {
    /// The signal was expected to fire (with matching arguments) but no
    /// matching record was found.
    #[error("signal `{signal}` was expected to fire but did not; observed: {observed}")]
    NotFired {
        /// Name of the signal that did not fire.
        signal: String,
        /// Rendering of the recorded firings.
        observed: String,
    },

    /// The signal was expected not to fire but a matching record exists.
    #[error("signal `{signal}` fired unexpectedly: {record}")]
    UnexpectedlyFired {
        /// Name of the signal that fired.
        signal: String,
        /// Rendering of the offending record.
        record: String,
    },

    /// The expected relative firing order was not observed.
    #[error(
        "expected signals [{}] to fire in that relative order; observed: {observed}",
        .expected.join(", ")
    )]
    OrderingMismatch {
        /// The signal names in their expected relative order.
        expected: Vec<String>,
        /// Rendering of the recorded firings.
        observed: String,
    },
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
