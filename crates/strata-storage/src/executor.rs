// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Statement executor: coerce, log, run, and log again on failure.
//!
//! Every operation emits one info event before it runs. A failed operation
//! emits exactly one error event carrying the same statement and bound
//! parameters plus the failure text, then returns the backend error as is.

use std::sync::Arc;

use rusqlite::types::Value as SqlValue;
use serde_json::Value;
use strata_core::{
    BoundValue, ExecOutcome, IdentifierReference, LogEvent, LogSink, RequestContext, Row,
    StatementKind, StrataError,
};

use crate::coerce::{coerce, to_sql};
use crate::database::Database;
use crate::statement::{self, quote_ident, with_returning};
use crate::SEQUENCE_TABLE;

/// Runs statements against one [`Database`] and reports each attempt to a
/// [`LogSink`].
#[derive(Clone)]
pub struct Executor {
    db: Database,
    sink: Arc<dyn LogSink>,
}

impl Executor {
    pub fn new(db: Database, sink: Arc<dyn LogSink>) -> Self {
        Self { db, sink }
    }

    /// Execute a definition statement, or a batch of them, without parameters.
    pub async fn apply_schema(
        &self,
        ctx: &RequestContext,
        sql: &str,
        label: Option<&str>,
    ) -> Result<ExecOutcome, StrataError> {
        let event = LogEvent::new(StatementKind::Schema, label, sql);
        let sql = sql.to_string();
        self.logged(ctx, event, move |conn| {
            conn.execute_batch(&sql)?;
            Ok(ExecOutcome {
                rows: Vec::new(),
                rows_affected: conn.changes(),
                last_insert_id: conn.last_insert_rowid(),
            })
        })
        .await
    }

    /// Parameterized retrieval.
    pub async fn read(
        &self,
        ctx: &RequestContext,
        sql: &str,
        params: &[Value],
        label: Option<&str>,
    ) -> Result<Vec<Row>, StrataError> {
        let params = coerce(params);
        self.run_bound(ctx, StatementKind::Query, label, sql.to_string(), params, |conn, sql, params| {
            let mut stmt = conn.prepare(sql)?;
            statement::collect_rows(&mut stmt, params)
        })
        .await
    }

    /// Parameterized delete or other non-insert mutation, run verbatim.
    pub async fn mutate_raw(
        &self,
        ctx: &RequestContext,
        sql: &str,
        params: &[Value],
        label: Option<&str>,
    ) -> Result<ExecOutcome, StrataError> {
        let params = coerce(params);
        self.run_bound(ctx, StatementKind::Delete, label, sql.to_string(), params, statement::execute_mut)
            .await
    }

    /// Insert a row and return the identifier the backend assigned.
    ///
    /// Inserts into the sequence table run verbatim; every other insert gets
    /// a `RETURNING "id"` clause. The reference is empty when no row was
    /// inserted.
    pub async fn insert(
        &self,
        ctx: &RequestContext,
        sql: &str,
        params: &[Value],
        label: Option<&str>,
    ) -> Result<IdentifierReference, StrataError> {
        let is_sequence_insert = statement::insert_target(sql)
            .is_some_and(|table| table.eq_ignore_ascii_case(SEQUENCE_TABLE));
        let final_sql = if is_sequence_insert {
            sql.to_string()
        } else {
            with_returning(sql, &quote_ident("id"))
        };

        let params = coerce(params);
        let outcome = self
            .run_bound(ctx, StatementKind::Insert, label, final_sql, params, statement::execute_mut)
            .await?;

        let returned = outcome.rows.first().and_then(|row| row.get("id").cloned());
        let id = match returned {
            Some(id) => id,
            None if is_sequence_insert && outcome.rows_affected > 0 => {
                Value::from(outcome.last_insert_id)
            }
            // Nothing was inserted, e.g. `INSERT OR IGNORE` hit a conflict.
            None => Value::Null,
        };
        Ok(IdentifierReference::new(id))
    }

    /// Update rows. With `id_field`, the statement returns that field as `id`.
    pub async fn mutate(
        &self,
        ctx: &RequestContext,
        sql: &str,
        params: &[Value],
        id_field: Option<&str>,
        label: Option<&str>,
    ) -> Result<ExecOutcome, StrataError> {
        let final_sql = match id_field {
            Some(field) => with_returning(
                sql,
                &format!("{} AS {}", quote_ident(field), quote_ident("id")),
            ),
            None => sql.to_string(),
        };
        let params = coerce(params);
        self.run_bound(ctx, StatementKind::Update, label, final_sql, params, statement::execute_mut)
            .await
    }

    /// Run `op` with already-coerced parameters under the standard logging.
    pub(crate) async fn run_bound<F, R>(
        &self,
        ctx: &RequestContext,
        kind: StatementKind,
        label: Option<&str>,
        sql: String,
        params: Vec<BoundValue>,
        op: F,
    ) -> Result<R, StrataError>
    where
        F: FnOnce(&mut rusqlite::Connection, &str, &[SqlValue]) -> Result<R, rusqlite::Error>
            + Send
            + 'static,
        R: Send + 'static,
    {
        let sql_values: Vec<_> = params.iter().map(to_sql).collect();
        let event = LogEvent::new(kind, label, sql.as_str()).with_params(params);
        self.logged(ctx, event, move |conn| op(conn, &sql, &sql_values))
            .await
    }

    async fn logged<F, R>(
        &self,
        ctx: &RequestContext,
        event: LogEvent,
        f: F,
    ) -> Result<R, StrataError>
    where
        F: FnOnce(&mut rusqlite::Connection) -> Result<R, rusqlite::Error> + Send + 'static,
        R: Send + 'static,
    {
        self.sink.info(ctx, &event);
        match self.db.run(f).await {
            Ok(result) => Ok(result),
            Err(err) => {
                let failure = event.with_error(err.to_string());
                self.sink.error(ctx, &failure);
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::OpenOptions;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Capture {
        info: Mutex<Vec<LogEvent>>,
        error: Mutex<Vec<LogEvent>>,
    }

    impl LogSink for Capture {
        fn info(&self, _ctx: &RequestContext, event: &LogEvent) {
            self.info.lock().unwrap().push(event.clone());
        }
        fn error(&self, _ctx: &RequestContext, event: &LogEvent) {
            self.error.lock().unwrap().push(event.clone());
        }
    }

    async fn setup() -> (Executor, Arc<Capture>) {
        let db = Database::open_in_memory(&OpenOptions::default()).await.unwrap();
        let sink = Arc::new(Capture::default());
        let exec = Executor::new(db, sink.clone());
        exec.apply_schema(
            &RequestContext::new(),
            "CREATE TABLE users (id INTEGER PRIMARY KEY AUTOINCREMENT, uid TEXT, name TEXT, active INTEGER, prefs JSON);",
            Some("init"),
        )
        .await
        .unwrap();
        sink.info.lock().unwrap().clear();
        (exec, sink)
    }

    #[tokio::test]
    async fn insert_binds_coerced_params_and_returns_id() {
        let (exec, sink) = setup().await;
        let ctx = RequestContext::new();

        let id = exec
            .insert(&ctx, "INSERT INTO users (name, active) VALUES (?1, ?2);", &[json!("Alice"), json!(true)], Some("users.create"))
            .await
            .unwrap();
        assert_eq!(id.as_i64(), Some(1));

        let info = sink.info.lock().unwrap();
        assert_eq!(info.len(), 1);
        assert_eq!(info[0].kind, StatementKind::Insert);
        assert_eq!(info[0].label.as_deref(), Some("users.create"));
        assert_eq!(
            info[0].statement,
            "INSERT INTO users (name, active) VALUES (?1, ?2) RETURNING \"id\""
        );
        assert_eq!(
            info[0].params,
            Some(vec![BoundValue::Text("Alice".into()), BoundValue::Integer(1)])
        );
    }

    #[tokio::test]
    async fn sequence_table_insert_runs_verbatim() {
        let (exec, sink) = setup().await;
        let sql = "INSERT INTO _strata_sequences (name, last) VALUES (?1, ?2)";

        let id = exec
            .insert(&RequestContext::new(), sql, &[json!("Order"), json!(1)], None)
            .await
            .unwrap();

        assert!(!id.is_empty());
        assert_eq!(sink.info.lock().unwrap()[0].statement, sql);
    }

    #[tokio::test]
    async fn ignored_insert_returns_empty_reference() {
        let (exec, _sink) = setup().await;
        let ctx = RequestContext::new();
        exec.apply_schema(&ctx, "CREATE UNIQUE INDEX users_uid ON users (uid);", None)
            .await
            .unwrap();

        let a = exec
            .insert(&ctx, "INSERT INTO users (uid) VALUES (?1)", &[json!("a")], None)
            .await
            .unwrap();
        let b = exec
            .insert(&ctx, "INSERT INTO users (uid) VALUES (?1)", &[json!("b")], None)
            .await
            .unwrap();
        assert_eq!((a.as_i64(), b.as_i64()), (Some(1), Some(2)));

        let ignored = exec
            .insert(&ctx, "INSERT OR IGNORE INTO users (uid) VALUES (?1)", &[json!("a")], None)
            .await
            .unwrap();
        assert!(ignored.is_empty());

        let skipped = exec
            .insert(
                &ctx,
                "INSERT INTO users (uid) VALUES (?1) ON CONFLICT(uid) DO NOTHING",
                &[json!("b")],
                None,
            )
            .await
            .unwrap();
        assert!(skipped.is_empty());
    }

    #[tokio::test]
    async fn ignored_sequence_insert_returns_empty_reference() {
        let (exec, _sink) = setup().await;
        let ctx = RequestContext::new();
        let sql = "INSERT OR IGNORE INTO _strata_sequences (name, last) VALUES (?1, ?2)";

        let first = exec.insert(&ctx, sql, &[json!("Order"), json!(1)], None).await.unwrap();
        assert!(!first.is_empty());
        let again = exec.insert(&ctx, sql, &[json!("Order"), json!(5)], None).await.unwrap();
        assert!(again.is_empty());
    }

    #[tokio::test]
    async fn structured_values_are_stored_as_json_text() {
        let (exec, _sink) = setup().await;
        let ctx = RequestContext::new();
        exec.insert(&ctx, "INSERT INTO users (name, prefs) VALUES (?1, ?2)", &[json!("Bo"), json!({"theme": "dark"})], None)
            .await
            .unwrap();

        let rows = exec
            .read(&ctx, "SELECT json_extract(prefs, '$.theme') AS theme FROM users WHERE name = ?1", &[json!("Bo")], None)
            .await
            .unwrap();
        assert_eq!(rows[0]["theme"], json!("dark"));
    }

    #[tokio::test]
    async fn mutate_with_id_field_returns_aliased_rows() {
        let (exec, sink) = setup().await;
        let ctx = RequestContext::new();
        exec.insert(&ctx, "INSERT INTO users (uid, name) VALUES (?1, ?2)", &[json!("u-1"), json!("Cy")], None)
            .await
            .unwrap();

        let outcome = exec
            .mutate(&ctx, "UPDATE users SET name = ?1 WHERE uid = ?2", &[json!("Cyd"), json!("u-1")], Some("uid"), None)
            .await
            .unwrap();

        assert_eq!(outcome.rows.len(), 1);
        assert_eq!(outcome.rows[0]["id"], json!("u-1"));
        assert_eq!(outcome.rows_affected, 1);
        assert!(sink.info.lock().unwrap()[1].statement.ends_with("RETURNING \"uid\" AS \"id\""));
    }

    #[tokio::test]
    async fn caller_returning_clause_is_not_doubled() {
        let (exec, sink) = setup().await;
        let ctx = RequestContext::new();

        let id = exec
            .insert(&ctx, "INSERT INTO users (name) VALUES (?1) RETURNING id;", &[json!("Di")], None)
            .await
            .unwrap();
        assert_eq!(id.as_i64(), Some(1));

        let outcome = exec
            .mutate(&ctx, "UPDATE users SET name = ?1 RETURNING name", &[json!("Dee")], Some("uid"), None)
            .await
            .unwrap();
        assert_eq!(outcome.rows[0]["name"], json!("Dee"));

        let info = sink.info.lock().unwrap();
        assert_eq!(info[0].statement, "INSERT INTO users (name) VALUES (?1) RETURNING id");
        assert_eq!(info[1].statement, "UPDATE users SET name = ?1 RETURNING name");
    }

    #[tokio::test]
    async fn mutate_without_id_field_appends_nothing() {
        let (exec, sink) = setup().await;
        let sql = "UPDATE users SET active = ?1";

        let outcome = exec
            .mutate(&RequestContext::new(), sql, &[json!(false)], None, None)
            .await
            .unwrap();

        assert!(outcome.rows.is_empty());
        let info = sink.info.lock().unwrap();
        assert_eq!(info[0].statement, sql);
        assert_eq!(info[0].kind, StatementKind::Update);
        assert_eq!(info[0].params, Some(vec![BoundValue::Integer(0)]));
    }

    #[tokio::test]
    async fn mutate_raw_deletes_and_reports_changes() {
        let (exec, sink) = setup().await;
        let ctx = RequestContext::new();
        for name in ["a", "b"] {
            exec.insert(&ctx, "INSERT INTO users (name) VALUES (?1)", &[json!(name)], None)
                .await
                .unwrap();
        }

        let outcome = exec
            .mutate_raw(&ctx, "DELETE FROM users WHERE name = ?1", &[json!("a")], Some("users.delete"))
            .await
            .unwrap();
        assert_eq!(outcome.rows_affected, 1);
        assert_eq!(sink.info.lock().unwrap().last().unwrap().kind, StatementKind::Delete);
    }

    #[tokio::test]
    async fn failure_logs_once_and_returns_backend_error() {
        let (exec, sink) = setup().await;
        let sql = "SELECT * FROM missing_table WHERE id = ?1";

        let err = exec
            .read(&RequestContext::new(), sql, &[json!(true)], Some("broken"))
            .await
            .unwrap_err();

        let source = err.backend_source().expect("backend error");
        assert!(source.downcast_ref::<rusqlite::Error>().is_some());

        let errors = sink.error.lock().unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].statement, sql);
        assert_eq!(errors[0].params, Some(vec![BoundValue::Integer(1)]));
        assert_eq!(errors[0].label.as_deref(), Some("broken"));
        assert!(errors[0].error.as_deref().unwrap().contains("missing_table"));
    }
}
