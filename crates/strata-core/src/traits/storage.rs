// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The fixed storage contract consumed by the application framework.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::StrataError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{ExecOutcome, IdentifierReference, PredicateFragment, RequestContext, Row};

/// Adapter over a backend that executes parameterized statements.
///
/// The framework hands over finished statement text plus positional
/// parameters; the adapter coerces the parameters, runs the statement,
/// logs the attempt and returns the result in the declared shape.
/// Backend failures are logged and returned unchanged as
/// [`StrataError::Backend`].
#[async_trait]
pub trait DatabaseAdapter: PluginAdapter {
    /// Opens the backend and creates the sequence table if missing.
    ///
    /// With `force_drop`, every existing table is dropped first.
    async fn open(&self, force_drop: bool) -> Result<(), StrataError>;

    /// Executes a definition statement (or a batch of them) without parameters.
    async fn apply_schema(
        &self,
        ctx: &RequestContext,
        statement: &str,
        label: Option<&str>,
    ) -> Result<ExecOutcome, StrataError>;

    /// Runs a parameterized retrieval and returns its rows.
    async fn read(
        &self,
        ctx: &RequestContext,
        statement: &str,
        params: &[Value],
        label: Option<&str>,
    ) -> Result<Vec<Row>, StrataError>;

    /// Runs a delete or other non-insert mutation verbatim.
    async fn mutate_raw(
        &self,
        ctx: &RequestContext,
        statement: &str,
        params: &[Value],
        label: Option<&str>,
    ) -> Result<ExecOutcome, StrataError>;

    /// Runs an insert and returns the identifier the backend assigned.
    async fn insert(
        &self,
        ctx: &RequestContext,
        statement: &str,
        params: &[Value],
        label: Option<&str>,
    ) -> Result<IdentifierReference, StrataError>;

    /// Runs an update. With `id_field`, the rows carry that field aliased as `id`.
    async fn mutate(
        &self,
        ctx: &RequestContext,
        statement: &str,
        params: &[Value],
        id_field: Option<&str>,
        label: Option<&str>,
    ) -> Result<ExecOutcome, StrataError>;

    /// Returns the next value of the named sequence: 1, 2, 3, ...
    async fn allocate(&self, ctx: &RequestContext, name: &str) -> Result<i64, StrataError>;

    /// Translates an abstract field-type token into a column declaration.
    fn map_type(&self, token: &str, is_collection: bool) -> &'static str;

    /// Translates a collection "contains" predicate, or returns `None` so the
    /// caller can fall back to its generic translator.
    fn translate_contains(
        &self,
        column: &str,
        column_type: &str,
        operator: &str,
        operand: &Value,
    ) -> Option<PredicateFragment>;

    /// Returns `true` when the schema bookkeeping table does not exist yet.
    async fn schema_pending(&self, ctx: &RequestContext) -> Result<bool, StrataError>;

    /// Flushes pending writes and releases the backend.
    async fn close(&self) -> Result<(), StrataError>;
}
