// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests driving the `strata` binary against a temp database.
//!
//! Each test writes its own config file pointing at a fresh database, so
//! tests are independent and order-insensitive.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::{json, Value};

struct Workspace {
    dir: tempfile::TempDir,
    config: PathBuf,
}

impl Workspace {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("data/strata.db");
        let config = dir.path().join("strata.toml");
        std::fs::write(
            &config,
            format!(
                "[storage]\ndatabase_path = {:?}\n\n[logging]\nlevel = \"warn\"\n",
                db.to_string_lossy()
            ),
        )
        .unwrap();
        Self { dir, config }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_strata"))
            .arg("--config")
            .arg(&self.config)
            .args(args)
            .env_remove("RUST_LOG")
            .output()
            .unwrap()
    }

    fn json(&self, args: &[&str]) -> Value {
        let out = self.run(args);
        assert!(
            out.status.success(),
            "strata {args:?} failed: {}",
            String::from_utf8_lossy(&out.stderr)
        );
        serde_json::from_slice(&out.stdout).unwrap()
    }
}

fn write(path: &Path, content: &str) -> String {
    std::fs::write(path, content).unwrap();
    path.to_string_lossy().into_owned()
}

#[test]
fn schema_insert_query_round_through_the_binary() {
    let ws = Workspace::new();
    let schema = write(
        &ws.path("schema.sql"),
        "CREATE TABLE users (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT, active INTEGER);",
    );

    ws.json(&["schema", &schema]);
    let id = ws.json(&[
        "insert",
        "INSERT INTO users (name, active) VALUES (?1, ?2)",
        "--params",
        r#"["Alice", true]"#,
    ]);
    assert_eq!(id, json!({ "id": 1 }));

    let rows = ws.json(&["query", "SELECT name, active FROM users"]);
    assert_eq!(rows, json!([{ "name": "Alice", "active": 1 }]));
}

#[test]
fn sequences_persist_across_invocations() {
    let ws = Workspace::new();
    assert_eq!(ws.json(&["allocate", "Order"])["value"], json!(1));
    assert_eq!(ws.json(&["allocate", "Order"])["value"], json!(2));

    let status = ws.json(&["status"]);
    assert_eq!(status["sequences"]["Order"], json!(2));
    assert_eq!(status["schema_pending"], json!(true));
    assert_eq!(status["health"], json!("healthy"));
}

#[test]
fn force_drop_resets_the_database() {
    let ws = Workspace::new();
    ws.json(&["allocate", "Order"]);
    ws.json(&["allocate", "Order"]);

    assert_eq!(ws.json(&["--force-drop", "allocate", "Order"])["value"], json!(1));
}

#[test]
fn backend_failure_exits_nonzero() {
    let ws = Workspace::new();
    let out = ws.run(&["query", "SELECT * FROM missing"]);
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("no such table: missing"), "stderr: {stderr}");
}

#[test]
fn invalid_config_exits_with_diagnostic() {
    let ws = Workspace::new();
    std::fs::write(&ws.config, "[storage]\nwal_mod = true\n").unwrap();

    let out = ws.run(&["status"]);
    assert_eq!(out.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("wal_mod"), "stderr: {stderr}");
}
