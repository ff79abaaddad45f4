// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Strata database adapter.

use thiserror::Error;

/// The primary error type used across all Strata traits and core operations.
#[derive(Debug, Error)]
pub enum StrataError {
    /// A failure reported by the backend while executing a statement
    /// (malformed SQL, constraint violation, lost connection).
    ///
    /// `source` is the backend's own error, boxed without modification.
    #[error("backend error: {source}")]
    Backend {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// A caller-supplied argument was rejected before reaching the backend.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Arguments did not satisfy the parameter spec of a registered handler.
    #[error("invalid parameters for `{handler}`: {message}")]
    InvalidParams { handler: String, message: String },

    /// No handler is registered under the requested name.
    #[error("handler not found: {name}")]
    HandlerNotFound { name: String },

    /// A handler with the same name is already registered.
    #[error("handler already registered: {name}")]
    DuplicateHandler { name: String },

    /// The adapter was used before `open` completed.
    #[error("database not opened -- call open() first")]
    NotInitialized,

    /// `open` was called on an adapter that already holds a connection.
    #[error("database already opened")]
    AlreadyInitialized,

    /// Result rows could not be decoded into the caller's type.
    #[error("row decode error: {0}")]
    Decode(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl StrataError {
    /// Wraps a backend failure without altering it.
    pub fn backend<E>(source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Backend {
            source: Box::new(source),
        }
    }

    /// Returns the original backend error, if this is a backend failure.
    pub fn backend_source(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            Self::Backend { source } => Some(source.as_ref()),
            _ => None,
        }
    }
}
