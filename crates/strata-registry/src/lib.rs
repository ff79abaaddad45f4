// SPDX-FileCopyrightText: 2026 Strata Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Named handler registry for the API layer.
//!
//! Handlers are registered under a name together with a [`ParamSpec`]
//! (positional or named arguments, each with an optional transformer).
//! The spec is validated at registration; on dispatch it is applied to the
//! caller's arguments before the handler runs. The registry is an ordinary
//! value built at startup and passed by reference.
//!
//! [`ParamSpec`]: strata_core::ParamSpec

pub mod handler;
pub mod registry;

pub use handler::{handler_fn, FnHandler, Handler, HandlerFuture};
pub use registry::{HandlerEntry, HandlerRegistry};
