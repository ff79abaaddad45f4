// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the adapter traits and their implementations.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{Display, EnumString};

/// One result row, keyed by column name.
pub type Row = Map<String, Value>;

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Correlation context for one inbound unit of work.
///
/// Passed explicitly into every adapter call and forwarded to the log sink.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestContext {
    pub request_id: String,
}

impl RequestContext {
    /// Create a context with a fresh random request id.
    pub fn new() -> Self {
        Self {
            request_id: uuid::Uuid::new_v4().to_string(),
        }
    }

    /// Create a context carrying a caller-supplied request id.
    pub fn with_id(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
        }
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// The kind of statement an executor operation runs.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum StatementKind {
    Schema,
    Query,
    Delete,
    Insert,
    Update,
}

/// A parameter value in the form the backend binds.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BoundValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

/// Raw acknowledgement of an executed statement.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExecOutcome {
    /// Rows produced by the statement (e.g. through a `RETURNING` clause).
    pub rows: Vec<Row>,
    /// Rows changed by the most recent INSERT, UPDATE or DELETE.
    pub rows_affected: u64,
    /// Row id of the most recent successful insert on the connection.
    pub last_insert_id: i64,
}

/// Opaque handle to a backend-assigned row identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentifierReference {
    pub id: Value,
}

impl IdentifierReference {
    pub fn new(id: impl Into<Value>) -> Self {
        Self { id: id.into() }
    }

    /// The identifier as an integer, when the backend assigned one.
    pub fn as_i64(&self) -> Option<i64> {
        match &self.id {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.id.is_null()
    }
}

/// A statement snippet expressing one match condition, with its own bindings.
#[derive(Debug, Clone, PartialEq)]
pub struct PredicateFragment {
    pub sql: String,
    pub params: Vec<BoundValue>,
}

/// One attempted operation, as handed to a [`LogSink`](crate::LogSink).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEvent {
    pub kind: StatementKind,
    pub label: Option<String>,
    pub statement: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Vec<BoundValue>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LogEvent {
    pub fn new(kind: StatementKind, label: Option<&str>, statement: impl Into<String>) -> Self {
        Self {
            kind,
            label: label.map(str::to_string),
            statement: statement.into(),
            params: None,
            error: None,
        }
    }

    pub fn with_params(mut self, params: Vec<BoundValue>) -> Self {
        self.params = Some(params);
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// Bound parameters rendered as a JSON array, or `[]` when absent.
    pub fn params_json(&self) -> String {
        match &self.params {
            Some(params) => serde_json::to_string(params).unwrap_or_else(|_| "[]".to_string()),
            None => "[]".to_string(),
        }
    }
}
