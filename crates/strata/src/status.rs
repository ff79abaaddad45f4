// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `strata status` command implementation.
//!
//! Reports adapter identity, database health and whether the framework
//! still has to run its schema migration.

use serde::Serialize;
use strata_config::model::StorageConfig;
use strata_core::{DatabaseAdapter, HealthStatus, PluginAdapter, RequestContext, StrataError};
use strata_storage::SqliteAdapter;

/// Structured status output.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub adapter: String,
    pub version: String,
    pub database_path: String,
    pub wal_mode: bool,
    pub health: String,
    pub schema_table: String,
    pub schema_pending: bool,
    /// Last value handed out per sequence name, by name.
    pub sequences: serde_json::Map<String, serde_json::Value>,
}

fn describe(health: Result<HealthStatus, StrataError>) -> String {
    match health {
        Ok(HealthStatus::Healthy) => "healthy".to_string(),
        Ok(HealthStatus::Degraded(reason)) => format!("degraded: {reason}"),
        Ok(HealthStatus::Unhealthy(reason)) => format!("unhealthy: {reason}"),
        Err(e) => format!("unhealthy: {e}"),
    }
}

/// Run the `strata status` checks against an open adapter.
pub async fn run_status(
    adapter: &SqliteAdapter,
    ctx: &RequestContext,
    storage: &StorageConfig,
) -> Result<StatusResponse, StrataError> {
    let health = describe(adapter.health_check().await);
    let schema_pending = adapter.schema_pending(ctx).await?;

    let rows = adapter
        .read(
            ctx,
            &format!("SELECT name, last FROM {} ORDER BY name", strata_storage::SEQUENCE_TABLE),
            &[],
            Some("status.sequences"),
        )
        .await?;
    let sequences = rows
        .into_iter()
        .filter_map(|row| {
            let name = row.get("name")?.as_str()?.to_string();
            Some((name, row.get("last")?.clone()))
        })
        .collect();

    Ok(StatusResponse {
        adapter: adapter.name().to_string(),
        version: adapter.version().to_string(),
        database_path: storage.database_path.clone(),
        wal_mode: storage.wal_mode,
        health,
        schema_table: storage.schema_table.clone(),
        schema_pending,
        sequences,
    })
}
