// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Registry mapping handler names to their spec and implementation.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use strata_core::{Args, ParamSpec, RequestContext, StrataError};
use tracing::debug;

use crate::handler::Handler;

/// A single entry in the handler registry.
pub struct HandlerEntry {
    /// Argument shape, already validated.
    pub spec: ParamSpec,
    pub handler: Arc<dyn Handler>,
}

impl std::fmt::Debug for HandlerEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerEntry")
            .field("spec", &self.spec)
            .finish_non_exhaustive()
    }
}

/// Registry of named handlers.
#[derive(Default)]
pub struct HandlerRegistry {
    entries: HashMap<String, HandlerEntry>,
}

impl HandlerRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` under `name`.
    ///
    /// Fails if the spec is malformed or the name is taken.
    pub fn register(
        &mut self,
        name: &str,
        spec: ParamSpec,
        handler: impl Handler + 'static,
    ) -> Result<(), StrataError> {
        spec.validate().map_err(|message| StrataError::InvalidParams {
            handler: name.to_string(),
            message,
        })?;
        if self.entries.contains_key(name) {
            return Err(StrataError::DuplicateHandler {
                name: name.to_string(),
            });
        }
        debug!(handler = name, ?spec, "registered handler");
        self.entries.insert(
            name.to_string(),
            HandlerEntry {
                spec,
                handler: Arc::new(handler),
            },
        );
        Ok(())
    }

    /// Apply the spec of `name` to `args` and run the handler.
    pub async fn dispatch(
        &self,
        name: &str,
        ctx: &RequestContext,
        args: Args,
    ) -> Result<Value, StrataError> {
        let entry = self.get(name).ok_or_else(|| StrataError::HandlerNotFound {
            name: name.to_string(),
        })?;
        let args = entry
            .spec
            .apply(args)
            .map_err(|message| StrataError::InvalidParams {
                handler: name.to_string(),
                message,
            })?;
        debug!(handler = name, request_id = %ctx.request_id, "dispatching");
        entry.handler.handle(ctx, args).await
    }

    /// Get a handler entry by name.
    pub fn get(&self, name: &str) -> Option<&HandlerEntry> {
        self.entries.get(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Returns the number of registered handlers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no handlers are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
