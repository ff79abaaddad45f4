// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite database adapter for Strata.
//!
//! Provides WAL-mode SQLite storage with embedded migrations, a single-writer
//! concurrency model via `tokio-rusqlite`, and the statement executor,
//! sequence allocator, value coercer, type mapper and predicate translator
//! behind the [`DatabaseAdapter`](strata_core::DatabaseAdapter) contract.

pub mod adapter;
pub mod coerce;
pub mod database;
pub mod executor;
pub mod logging;
pub mod migrations;
pub mod predicate;
pub mod sequence;
pub mod statement;
pub mod type_map;

pub use adapter::SqliteAdapter;
pub use coerce::{coerce, coerce_value};
pub use database::{Database, OpenOptions};
pub use executor::Executor;
pub use logging::TracingSink;
pub use predicate::translate_contains;
pub use sequence::{SequenceAllocator, SEQUENCE_TABLE};
pub use type_map::{map_type, FieldType};
