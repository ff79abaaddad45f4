// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the DatabaseAdapter trait.

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::OnceCell;
use tracing::debug;

use strata_config::model::StorageConfig;
use strata_core::{
    DatabaseAdapter, ExecOutcome, HealthStatus, IdentifierReference, LogSink, PluginAdapter,
    PredicateFragment, RequestContext, Row, StrataError,
};

use crate::database::{Database, OpenOptions};
use crate::executor::Executor;
use crate::sequence::SequenceAllocator;
use crate::{predicate, type_map};

const SCHEMA_PROBE_SQL: &str = "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1";

/// SQLite-backed database adapter.
///
/// Either opened from configuration with [`DatabaseAdapter::open`], or built
/// around an already-open [`Database`] with [`SqliteAdapter::from_database`]
/// for one unit of work.
pub struct SqliteAdapter {
    config: StorageConfig,
    sink: Arc<dyn LogSink>,
    db: OnceCell<Database>,
}

impl SqliteAdapter {
    /// Create an adapter. The database file is not touched until `open`.
    pub fn new(config: StorageConfig, sink: Arc<dyn LogSink>) -> Self {
        Self {
            config,
            sink,
            db: OnceCell::new(),
        }
    }

    /// Wrap a shared, already-open handle. `open` on the result fails.
    pub fn from_database(db: Database, sink: Arc<dyn LogSink>) -> Self {
        Self {
            config: StorageConfig::default(),
            sink,
            db: OnceCell::new_with(Some(db)),
        }
    }

    /// The open database handle.
    pub fn database(&self) -> Result<&Database, StrataError> {
        self.db.get().ok_or(StrataError::NotInitialized)
    }

    pub fn executor(&self) -> Result<Executor, StrataError> {
        Ok(Executor::new(self.database()?.clone(), self.sink.clone()))
    }

    pub fn sequences(&self) -> Result<SequenceAllocator, StrataError> {
        Ok(SequenceAllocator::new(self.executor()?))
    }

    /// Run a retrieval and deserialize each row into `T`.
    pub async fn read_as<T: DeserializeOwned>(
        &self,
        ctx: &RequestContext,
        statement: &str,
        params: &[Value],
        label: Option<&str>,
    ) -> Result<Vec<T>, StrataError> {
        self.read(ctx, statement, params, label)
            .await?
            .into_iter()
            .map(|row| {
                serde_json::from_value(Value::Object(row))
                    .map_err(|e| StrataError::Decode(e.to_string()))
            })
            .collect()
    }

    /// The last value handed out for `name`, without advancing it.
    pub async fn peek(&self, ctx: &RequestContext, name: &str) -> Result<i64, StrataError> {
        self.sequences()?.peek(ctx, name).await
    }
}

#[async_trait]
impl PluginAdapter for SqliteAdapter {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    async fn health_check(&self) -> Result<HealthStatus, StrataError> {
        self.database()?
            .run(|conn| conn.execute_batch("SELECT 1;"))
            .await?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), StrataError> {
        if let Some(db) = self.db.get() {
            db.checkpoint().await?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl DatabaseAdapter for SqliteAdapter {
    async fn open(&self, force_drop: bool) -> Result<(), StrataError> {
        if self.db.initialized() {
            return Err(StrataError::AlreadyInitialized);
        }
        let options = OpenOptions::from_config(&self.config, force_drop);
        let db = Database::open(&self.config.database_path, &options).await?;
        self.db
            .set(db)
            .map_err(|_| StrataError::AlreadyInitialized)?;
        debug!(path = %self.config.database_path, force_drop, "SQLite adapter opened");
        Ok(())
    }

    async fn apply_schema(
        &self,
        ctx: &RequestContext,
        statement: &str,
        label: Option<&str>,
    ) -> Result<ExecOutcome, StrataError> {
        self.executor()?.apply_schema(ctx, statement, label).await
    }

    async fn read(
        &self,
        ctx: &RequestContext,
        statement: &str,
        params: &[Value],
        label: Option<&str>,
    ) -> Result<Vec<Row>, StrataError> {
        self.executor()?.read(ctx, statement, params, label).await
    }

    async fn mutate_raw(
        &self,
        ctx: &RequestContext,
        statement: &str,
        params: &[Value],
        label: Option<&str>,
    ) -> Result<ExecOutcome, StrataError> {
        self.executor()?
            .mutate_raw(ctx, statement, params, label)
            .await
    }

    async fn insert(
        &self,
        ctx: &RequestContext,
        statement: &str,
        params: &[Value],
        label: Option<&str>,
    ) -> Result<IdentifierReference, StrataError> {
        self.executor()?.insert(ctx, statement, params, label).await
    }

    async fn mutate(
        &self,
        ctx: &RequestContext,
        statement: &str,
        params: &[Value],
        id_field: Option<&str>,
        label: Option<&str>,
    ) -> Result<ExecOutcome, StrataError> {
        self.executor()?
            .mutate(ctx, statement, params, id_field, label)
            .await
    }

    async fn allocate(&self, ctx: &RequestContext, name: &str) -> Result<i64, StrataError> {
        self.sequences()?.allocate(ctx, name).await
    }

    fn map_type(&self, token: &str, is_collection: bool) -> &'static str {
        type_map::map_type(token, is_collection)
    }

    fn translate_contains(
        &self,
        column: &str,
        column_type: &str,
        operator: &str,
        operand: &Value,
    ) -> Option<PredicateFragment> {
        predicate::translate_contains(column, column_type, operator, operand)
    }

    async fn schema_pending(&self, ctx: &RequestContext) -> Result<bool, StrataError> {
        let table = Value::from(self.config.schema_table.as_str());
        let rows = self
            .read(ctx, SCHEMA_PROBE_SQL, &[table], Some("schema_pending"))
            .await?;
        Ok(rows.is_empty())
    }

    async fn close(&self) -> Result<(), StrataError> {
        self.database()?.checkpoint().await
    }
}
