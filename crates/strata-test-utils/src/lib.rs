// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Strata integration tests.
//!
//! Provides a recording log sink and a temp-database harness for fast,
//! deterministic, CI-runnable tests.
//!
//! # Components
//!
//! - [`RecordingSink`] - Log sink that captures every event for assertions
//! - [`TestDatabase`] - Opened SQLite adapter over a temp file, removed on drop

pub mod harness;
pub mod recording_sink;

pub use harness::{TestDatabase, TestDatabaseBuilder};
pub use recording_sink::RecordingSink;
