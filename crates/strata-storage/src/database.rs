// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All statements run on tokio-rusqlite's single background thread, so one
//! `Database` is the single writer for its file. Clones share that thread.

use std::path::Path;
use std::time::Duration;

use strata_config::model::StorageConfig;
use strata_core::StrataError;
use tokio_rusqlite::Connection;
use tracing::{debug, info};

use crate::migrations;

/// Connection options applied on open.
#[derive(Debug, Clone)]
pub struct OpenOptions {
    pub wal_mode: bool,
    pub busy_timeout: Duration,
    /// Drop every existing table before running migrations.
    pub force_drop: bool,
}

impl OpenOptions {
    pub fn from_config(config: &StorageConfig, force_drop: bool) -> Self {
        Self {
            wal_mode: config.wal_mode,
            busy_timeout: Duration::from_millis(config.busy_timeout_ms),
            force_drop,
        }
    }
}

impl Default for OpenOptions {
    fn default() -> Self {
        Self {
            wal_mode: true,
            busy_timeout: Duration::from_secs(5),
            force_drop: false,
        }
    }
}

/// Shared handle to one SQLite database.
#[derive(Clone)]
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (creating if needed) the database file at `path`.
    pub async fn open(path: &str, options: &OpenOptions) -> Result<Self, StrataError> {
        if let Some(parent) = Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(StrataError::backend)?;
        }
        let conn = Connection::open(path).await.map_err(StrataError::backend)?;
        let db = Self { conn };
        db.bootstrap(options).await?;
        info!(path, wal = options.wal_mode, "database opened");
        Ok(db)
    }

    /// Open a private in-memory database. WAL does not apply.
    pub async fn open_in_memory(options: &OpenOptions) -> Result<Self, StrataError> {
        let conn = Connection::open_in_memory().await.map_err(StrataError::backend)?;
        let db = Self { conn };
        db.bootstrap(&OpenOptions {
            wal_mode: false,
            ..options.clone()
        })
        .await?;
        Ok(db)
    }

    /// The underlying tokio-rusqlite connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Run `f` on the database thread.
    ///
    /// Errors from `f` come back as [`StrataError::Backend`] wrapping the
    /// original `rusqlite::Error`.
    pub async fn run<F, R>(&self, f: F) -> Result<R, StrataError>
    where
        F: FnOnce(&mut rusqlite::Connection) -> Result<R, rusqlite::Error> + Send + 'static,
        R: Send + 'static,
    {
        self.conn
            .call(move |conn| -> Result<Result<R, rusqlite::Error>, rusqlite::Error> {
                Ok(f(conn))
            })
            .await
            .map_err(StrataError::backend)?
            .map_err(StrataError::backend)
    }

    /// Checkpoint the WAL into the main database file.
    pub async fn checkpoint(&self) -> Result<(), StrataError> {
        self.run(|conn| conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);"))
            .await?;
        debug!("WAL checkpoint complete");
        Ok(())
    }

    /// Checkpoint and close the connection. Clones of this handle stop working.
    pub async fn close(self) -> Result<(), StrataError> {
        self.checkpoint().await?;
        self.conn.close().await.map_err(StrataError::backend)
    }

    async fn bootstrap(&self, options: &OpenOptions) -> Result<(), StrataError> {
        let wal_mode = options.wal_mode;
        let busy_timeout = options.busy_timeout;
        self.run(move |conn| {
            conn.busy_timeout(busy_timeout)?;
            if wal_mode {
                let _mode: String = conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| {
                    row.get(0)
                })?;
                conn.pragma_update(None, "synchronous", "NORMAL")?;
            }
            conn.pragma_update(None, "foreign_keys", "ON")?;
            Ok(())
        })
        .await?;

        if options.force_drop {
            let dropped = self.run(drop_all_tables).await?;
            info!(dropped, "force_drop: dropped existing tables");
        }

        self.conn
            .call(|conn| -> Result<(), refinery::Error> {
                migrations::run_migrations(conn)
            })
            .await
            .map_err(StrataError::backend)?;
        Ok(())
    }
}

/// Drop every user view, trigger and table, including refinery's history, so
/// migrations rerun. Indexes go with their tables.
fn drop_all_tables(conn: &mut rusqlite::Connection) -> Result<usize, rusqlite::Error> {
    let objects: Vec<(String, String)> = {
        let mut stmt = conn.prepare(
            "SELECT type, name FROM sqlite_master \
             WHERE type IN ('view', 'trigger', 'table') AND name NOT LIKE 'sqlite_%' \
             ORDER BY CASE type WHEN 'view' THEN 0 WHEN 'trigger' THEN 1 ELSE 2 END",
        )?;
        stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<Vec<_>, _>>()?
    };

    without_foreign_keys(conn, |conn| drop_objects(conn, &objects))?;
    Ok(objects.iter().filter(|(kind, _)| kind == "table").count())
}

/// Run `f` with foreign key enforcement off, turning it back on even when `f` fails.
fn without_foreign_keys<F>(conn: &mut rusqlite::Connection, f: F) -> Result<(), rusqlite::Error>
where
    F: FnOnce(&mut rusqlite::Connection) -> Result<(), rusqlite::Error>,
{
    conn.pragma_update(None, "foreign_keys", "OFF")?;
    let result = f(conn);
    conn.pragma_update(None, "foreign_keys", "ON")?;
    result
}

fn drop_objects(
    conn: &mut rusqlite::Connection,
    objects: &[(String, String)],
) -> Result<(), rusqlite::Error> {
    let tx = conn.transaction()?;
    for (kind, name) in objects {
        let keyword = match kind.as_str() {
            "view" => "VIEW",
            "trigger" => "TRIGGER",
            _ => "TABLE",
        };
        tx.execute_batch(&format!(
            "DROP {keyword} IF EXISTS {};",
            crate::statement::quote_ident(name)
        ))?;
    }
    tx.commit()
}
