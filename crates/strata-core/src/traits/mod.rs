// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait definitions at the seams between the framework and the adapter.
//!
//! Async traits use `#[async_trait]` so they stay usable as trait objects.

pub mod adapter;
pub mod observability;
pub mod storage;

pub use adapter::PluginAdapter;
pub use observability::LogSink;
pub use storage::DatabaseAdapter;
