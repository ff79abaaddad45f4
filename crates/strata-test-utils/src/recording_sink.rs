// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Log sink that records events for assertion in tests.
//!
//! `RecordingSink` implements `LogSink` and keeps info-level and error-level
//! events in separate lists, in emission order.

use std::sync::Mutex;

use strata_core::{LogEvent, LogSink, RequestContext};

/// One captured event plus the request it belonged to.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub request_id: String,
    pub event: LogEvent,
}

/// A log sink that captures every event it receives.
#[derive(Debug, Default)]
pub struct RecordingSink {
    info: Mutex<Vec<Recorded>>,
    error: Mutex<Vec<Recorded>>,
}

impl RecordingSink {
    /// Create a new sink with empty lists.
    pub fn new() -> Self {
        Self::default()
    }

    /// Info-level events received so far.
    pub fn info_events(&self) -> Vec<LogEvent> {
        events(&self.info)
    }

    /// Error-level events received so far.
    pub fn error_events(&self) -> Vec<LogEvent> {
        events(&self.error)
    }

    /// Every info and error event tagged with `request_id`.
    pub fn for_request(&self, request_id: &str) -> Vec<LogEvent> {
        let mut out = Vec::new();
        for list in [&self.info, &self.error] {
            out.extend(
                lock(list)
                    .iter()
                    .filter(|r| r.request_id == request_id)
                    .map(|r| r.event.clone()),
            );
        }
        out
    }

    /// The most recent info-level event.
    pub fn last_info(&self) -> Option<LogEvent> {
        lock(&self.info).last().map(|r| r.event.clone())
    }

    /// Clear both lists.
    pub fn clear(&self) {
        lock(&self.info).clear();
        lock(&self.error).clear();
    }
}

impl LogSink for RecordingSink {
    fn info(&self, ctx: &RequestContext, event: &LogEvent) {
        record(&self.info, ctx, event);
    }

    fn error(&self, ctx: &RequestContext, event: &LogEvent) {
        record(&self.error, ctx, event);
    }
}

fn record(list: &Mutex<Vec<Recorded>>, ctx: &RequestContext, event: &LogEvent) {
    lock(list).push(Recorded {
        request_id: ctx.request_id.clone(),
        event: event.clone(),
    });
}

fn events(list: &Mutex<Vec<Recorded>>) -> Vec<LogEvent> {
    lock(list).iter().map(|r| r.event.clone()).collect()
}

// A panicking test thread may poison the lock; the data is still usable.
fn lock(list: &Mutex<Vec<Recorded>>) -> std::sync::MutexGuard<'_, Vec<Recorded>> {
    list.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::StatementKind;

    #[test]
    fn records_events_per_level() {
        let sink = RecordingSink::new();
        let ctx = RequestContext::with_id("r1");
        let event = LogEvent::new(StatementKind::Query, Some("q"), "SELECT 1");

        sink.info(&ctx, &event);
        sink.error(&ctx, &event.clone().with_error("boom"));

        assert_eq!(sink.info_events().len(), 1);
        assert_eq!(sink.error_events()[0].error.as_deref(), Some("boom"));
        assert_eq!(sink.last_info().unwrap().statement, "SELECT 1");
    }

    #[test]
    fn filters_by_request_and_clears() {
        let sink = RecordingSink::new();
        let event = LogEvent::new(StatementKind::Insert, None, "INSERT");

        sink.info(&RequestContext::with_id("a"), &event);
        sink.info(&RequestContext::with_id("b"), &event);
        sink.error(&RequestContext::with_id("a"), &event);

        assert_eq!(sink.for_request("a").len(), 2);
        assert_eq!(sink.for_request("b").len(), 1);

        sink.clear();
        assert!(sink.info_events().is_empty());
        assert!(sink.error_events().is_empty());
    }
}
