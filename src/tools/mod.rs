// ABOUTME: Tool and prompt descriptors, the Invocable handler seam, and invocation context
// ABOUTME: Everything a service author needs to declare and implement tools
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! # Tools
//!
//! - `descriptor`: immutable [`Tool`] / [`Prompt`] metadata and [`ToolHints`]
//! - `traits`: the [`Invocable`] trait and closure adapters
//! - `context`: [`InvocationContext`] with deadline and cancellation token
//! - `result`: [`ToolOutput`] success envelope

/// Invocation context passed to handlers
pub mod context;
/// Tool and prompt descriptors
pub mod descriptor;
/// Success envelope returned by handlers
pub mod result;
/// Handler trait and adapters
pub mod traits;

pub use context::InvocationContext;
pub use descriptor::{Prompt, Tool, ToolAnnotations, ToolHints};
pub use result::{Content, ToolOutput};
pub use traits::{handler_fn, typed_handler, Handler, HandlerError, Invocable};
