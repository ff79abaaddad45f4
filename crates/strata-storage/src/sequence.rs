// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-name monotonically increasing counters.
//!
//! Each allocation is one `INSERT ... ON CONFLICT DO UPDATE ... RETURNING`
//! statement inside an `IMMEDIATE` transaction, so the read and the increment
//! cannot interleave with another allocation for the same name, whichever
//! connection it comes from.

use rusqlite::TransactionBehavior;
use strata_core::{BoundValue, RequestContext, StatementKind, StrataError};

use crate::executor::Executor;

/// Backing table, one row per sequence name.
pub const SEQUENCE_TABLE: &str = "_strata_sequences";

const ALLOCATE_SQL: &str = "INSERT INTO _strata_sequences (name, last) VALUES (?1, 1) \
     ON CONFLICT(name) DO UPDATE SET last = last + 1 RETURNING last";

const PEEK_SQL: &str = "SELECT last FROM _strata_sequences WHERE name = ?1";

/// Hands out 1, 2, 3, ... per name, with no gaps and no repeats.
#[derive(Clone)]
pub struct SequenceAllocator {
    executor: Executor,
}

impl SequenceAllocator {
    pub fn new(executor: Executor) -> Self {
        Self { executor }
    }

    /// Allocate the next value for `name`. The first allocation returns 1.
    pub async fn allocate(&self, ctx: &RequestContext, name: &str) -> Result<i64, StrataError> {
        validate_name(name)?;
        let label = label(name);
        self.executor
            .run_bound(
                ctx,
                StatementKind::Update,
                Some(label.as_str()),
                ALLOCATE_SQL.to_string(),
                vec![BoundValue::Text(name.to_string())],
                |conn, sql, params| {
                    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
                    let next: i64 =
                        tx.query_row(sql, rusqlite::params_from_iter(params.iter()), |row| {
                            row.get(0)
                        })?;
                    tx.commit()?;
                    Ok(next)
                },
            )
            .await
    }

    /// The most recently allocated value for `name`, or 0 if none was.
    pub async fn peek(&self, ctx: &RequestContext, name: &str) -> Result<i64, StrataError> {
        validate_name(name)?;
        let label = label(name);
        self.executor
            .run_bound(
                ctx,
                StatementKind::Query,
                Some(label.as_str()),
                PEEK_SQL.to_string(),
                vec![BoundValue::Text(name.to_string())],
                |conn, sql, params| {
                    let mut stmt = conn.prepare(sql)?;
                    let mut rows = stmt.query(rusqlite::params_from_iter(params.iter()))?;
                    let last = match rows.next()? {
                        Some(row) => row.get(0)?,
                        None => 0,
                    };
                    Ok(last)
                },
            )
            .await
    }
}

fn label(name: &str) -> String {
    format!("sequence:{name}")
}

fn validate_name(name: &str) -> Result<(), StrataError> {
    if name.trim().is_empty() {
        return Err(StrataError::InvalidArgument(
            "sequence name must not be empty".to_string(),
        ));
    }
    Ok(())
}
