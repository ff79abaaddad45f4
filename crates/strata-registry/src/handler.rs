// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The handler trait and a closure-backed implementation.

use std::future::Future;
use std::pin::Pin;

use async_trait::async_trait;
use serde_json::Value;
use strata_core::{Args, RequestContext, StrataError};

/// A named operation reachable through the registry.
#[async_trait]
pub trait Handler: Send + Sync {
    /// Run with arguments that already passed the handler's spec.
    async fn handle(&self, ctx: &RequestContext, args: Args) -> Result<Value, StrataError>;
}

/// Boxed future returned by closure handlers.
pub type HandlerFuture = Pin<Box<dyn Future<Output = Result<Value, StrataError>> + Send>>;

/// Adapts a closure returning a [`HandlerFuture`] into a [`Handler`].
pub struct FnHandler<F> {
    f: F,
}

/// Wrap `f` as a [`Handler`]. The closure receives an owned context.
pub fn handler_fn<F>(f: F) -> FnHandler<F>
where
    F: Fn(RequestContext, Args) -> HandlerFuture + Send + Sync,
{
    FnHandler { f }
}

#[async_trait]
impl<F> Handler for FnHandler<F>
where
    F: Fn(RequestContext, Args) -> HandlerFuture + Send + Sync,
{
    async fn handle(&self, ctx: &RequestContext, args: Args) -> Result<Value, StrataError> {
        (self.f)(ctx.clone(), args).await
    }
}
