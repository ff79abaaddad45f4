// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Statement text helpers and row decoding.

use std::sync::LazyLock;

use regex::Regex;
use rusqlite::types::{Value as SqlValue, ValueRef};
use serde_json::{Map, Number, Value};
use strata_core::{ExecOutcome, Row};

static INSERT_TARGET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?is)^\s*(?:INSERT(?:\s+OR\s+[a-z]+)?|REPLACE)\s+INTO\s+((?:[`"\[]?[\w$]+[`"\]]?\s*\.\s*)?[`"\[]?[\w$]+[`"\]]?)"#,
    )
    .unwrap()
});

static RETURNING_CLAUSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bRETURNING\b").unwrap());

/// Double-quote an identifier, escaping embedded quotes.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Append `RETURNING <columns>` to `statement`, dropping trailing semicolons
/// and whitespace. A statement that already returns something is kept as is.
pub fn with_returning(statement: &str, columns: &str) -> String {
    let trimmed = statement.trim_end().trim_end_matches(';').trim_end();
    if RETURNING_CLAUSE.is_match(trimmed) {
        return trimmed.to_string();
    }
    format!("{trimmed} RETURNING {columns}")
}

/// The table an `INSERT ... INTO <table>` statement targets, unquoted.
///
/// A schema qualifier (`main.items`) is dropped. Returns `None` for anything
/// that is not an insert.
pub fn insert_target(statement: &str) -> Option<String> {
    let captures = INSERT_TARGET.captures(statement)?;
    let target = captures.get(1)?.as_str();
    let table = target.rsplit('.').next().unwrap_or(target).trim();
    Some(
        table
            .trim_matches(|c| matches!(c, '"' | '`' | '[' | ']'))
            .to_string(),
    )
}

/// Prepare and run `sql`, collecting any rows it produces.
pub(crate) fn execute(
    conn: &rusqlite::Connection,
    sql: &str,
    params: &[SqlValue],
) -> Result<ExecOutcome, rusqlite::Error> {
    let mut stmt = conn.prepare(sql)?;
    let rows = if stmt.column_count() > 0 {
        collect_rows(&mut stmt, params)?
    } else {
        stmt.execute(rusqlite::params_from_iter(params.iter()))?;
        Vec::new()
    };
    Ok(ExecOutcome {
        rows,
        rows_affected: conn.changes(),
        last_insert_id: conn.last_insert_rowid(),
    })
}

/// [`execute`] with the signature the executor's callbacks take.
pub(crate) fn execute_mut(
    conn: &mut rusqlite::Connection,
    sql: &str,
    params: &[SqlValue],
) -> Result<ExecOutcome, rusqlite::Error> {
    execute(conn, sql, params)
}

/// Run a prepared statement and decode every row.
pub(crate) fn collect_rows(
    stmt: &mut rusqlite::Statement<'_>,
    params: &[SqlValue],
) -> Result<Vec<Row>, rusqlite::Error> {
    let names: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
    let mut rows = stmt.query(rusqlite::params_from_iter(params.iter()))?;
    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        out.push(decode_row(row, &names)?);
    }
    Ok(out)
}

fn decode_row(row: &rusqlite::Row<'_>, names: &[String]) -> Result<Row, rusqlite::Error> {
    let mut map = Map::with_capacity(names.len());
    for (i, name) in names.iter().enumerate() {
        map.insert(name.clone(), decode_value(row.get_ref(i)?));
    }
    Ok(map)
}

fn decode_value(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(f) => Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null),
        ValueRef::Text(bytes) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => Value::Array(bytes.iter().map(|b| Value::from(*b)).collect()),
    }
}
