// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `tracing`-backed log sink.

use strata_core::{LogEvent, LogSink, RequestContext};
use tracing::{error, info};

/// Emits each [`LogEvent`] as a structured `tracing` event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn info(&self, ctx: &RequestContext, event: &LogEvent) {
        info!(
            request_id = %ctx.request_id,
            kind = %event.kind,
            label = event.label.as_deref().unwrap_or(""),
            statement = %event.statement,
            params = %event.params_json(),
            "executing statement"
        );
    }

    fn error(&self, ctx: &RequestContext, event: &LogEvent) {
        error!(
            request_id = %ctx.request_id,
            kind = %event.kind,
            label = event.label.as_deref().unwrap_or(""),
            statement = %event.statement,
            params = %event.params_json(),
            error = event.error.as_deref().unwrap_or(""),
            "statement failed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::{BoundValue, StatementKind};
    use tracing_test::traced_test;

    #[traced_test]
    #[test]
    fn info_event_carries_statement_and_params() {
        let ctx = RequestContext::with_id("req-42");
        let event = LogEvent::new(StatementKind::Query, Some("users.list"), "SELECT * FROM users WHERE id = ?1")
            .with_params(vec![BoundValue::Integer(7)]);

        TracingSink.info(&ctx, &event);

        assert!(logs_contain("executing statement"));
        assert!(logs_contain("req-42"));
        assert!(logs_contain("users.list"));
        assert!(logs_contain("SELECT * FROM users WHERE id = ?1"));
        assert!(logs_contain("[7]"));
    }

    #[traced_test]
    #[test]
    fn error_event_carries_failure_text() {
        let ctx = RequestContext::with_id("req-43");
        let event = LogEvent::new(StatementKind::Delete, None, "DELETE FROM nowhere")
            .with_params(vec![])
            .with_error("no such table: nowhere");

        TracingSink.error(&ctx, &event);

        assert!(logs_contain("statement failed"));
        assert!(logs_contain("no such table: nowhere"));
        assert!(logs_contain("kind=delete"));
    }
}
