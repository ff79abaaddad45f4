// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Strata database adapter.
//!
//! This crate provides the storage contract consumed by the application
//! framework, the log sink contract consumed by the adapter, the shared
//! error type, and the value types that cross those seams.

pub mod error;
pub mod params;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::StrataError;
pub use params::{Args, ParamSpec, Transformer};
pub use types::{
    BoundValue, ExecOutcome, HealthStatus, IdentifierReference, LogEvent, PredicateFragment,
    RequestContext, Row, StatementKind,
};

pub use traits::{DatabaseAdapter, LogSink, PluginAdapter};
