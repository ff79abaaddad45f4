// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Log sink consumed by the statement executor.

use crate::types::{LogEvent, RequestContext};

/// Receives one event per attempted operation, plus one more when it fails.
///
/// Implementations must not block; they are called inline on the request path.
pub trait LogSink: Send + Sync {
    /// An operation is about to run.
    fn info(&self, ctx: &RequestContext, event: &LogEvent);

    /// An operation failed. `event.error` carries the failure description.
    fn error(&self, ctx: &RequestContext, event: &LogEvent);
}
