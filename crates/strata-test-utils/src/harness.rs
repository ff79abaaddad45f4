// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Temp-database harness for integration testing.
//!
//! `TestDatabase` opens a [`SqliteAdapter`] over a fresh SQLite file in a
//! temp directory, wired to a [`RecordingSink`], and optionally applies a
//! schema up front.

use std::path::PathBuf;
use std::sync::Arc;

use strata_config::model::StorageConfig;
use strata_core::{DatabaseAdapter, RequestContext, StrataError};
use strata_storage::SqliteAdapter;

use crate::recording_sink::RecordingSink;

/// Builder for creating test databases with configurable options.
pub struct TestDatabaseBuilder {
    schema: Option<String>,
    wal_mode: bool,
}

impl TestDatabaseBuilder {
    fn new() -> Self {
        Self {
            schema: None,
            wal_mode: true,
        }
    }

    /// Schema statements applied after open. Their log events are cleared.
    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    /// Use the rollback journal instead of WAL.
    pub fn without_wal(mut self) -> Self {
        self.wal_mode = false;
        self
    }

    /// Create the temp file and open the adapter.
    pub async fn build(self) -> Result<TestDatabase, StrataError> {
        let temp_dir = tempfile::TempDir::new().map_err(StrataError::backend)?;
        let path = temp_dir.path().join("test.db");

        let config = StorageConfig {
            database_path: path.to_string_lossy().to_string(),
            wal_mode: self.wal_mode,
            ..StorageConfig::default()
        };
        let sink = Arc::new(RecordingSink::new());
        let adapter = SqliteAdapter::new(config, sink.clone());
        adapter.open(false).await?;

        if let Some(schema) = &self.schema {
            adapter
                .apply_schema(&RequestContext::new(), schema, Some("test-schema"))
                .await?;
            sink.clear();
        }

        Ok(TestDatabase {
            adapter,
            sink,
            path,
            _temp_dir: temp_dir,
        })
    }
}

/// An opened adapter over a temp database, plus the sink it logs to.
pub struct TestDatabase {
    /// The adapter under test.
    pub adapter: SqliteAdapter,
    /// Every event the adapter logged.
    pub sink: Arc<RecordingSink>,
    /// Location of the database file.
    pub path: PathBuf,
    /// Temp directory kept alive for cleanup on drop.
    _temp_dir: tempfile::TempDir,
}

impl TestDatabase {
    /// Create a new builder for configuring the test database.
    pub fn builder() -> TestDatabaseBuilder {
        TestDatabaseBuilder::new()
    }

    /// An opened database with no user tables.
    pub async fn empty() -> Result<Self, StrataError> {
        Self::builder().build().await
    }
}
