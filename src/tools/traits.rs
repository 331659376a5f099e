// ABOUTME: Defines the Invocable trait every tool handler implements
// ABOUTME: Adapters turn plain async closures and typed-argument closures into handlers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! # Handler Trait
//!
//! A handler is anything implementing [`Invocable`]. Services own their
//! handlers behind `Arc<dyn Invocable>`; the registry only ever clones the
//! `Arc`.
//!
//! Most handlers are closures. [`handler_fn`] wraps a closure over raw JSON
//! arguments, [`typed_handler`] wraps a closure over a strongly-typed argument
//! struct, deserialized after schema validation has passed.
//!
//! # Example
//!
//! ```rust,no_run
//! use serde::Deserialize;
//! use tool_proxy::tools::{typed_handler, ToolOutput};
//!
//! #[derive(Deserialize)]
//! struct EchoArgs {
//!     text: String,
//! }
//!
//! let handler = typed_handler(|args: EchoArgs, _ctx| async move {
//!     Ok(ToolOutput::text(format!("Echo: {}", args.text)))
//! });
//! ```

use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::errors::{AppError, ErrorCode};
use crate::validation::{self, SchemaNode, ValidationError};

use super::context::InvocationContext;
use super::result::ToolOutput;

/// Failure reported by a handler
#[derive(Debug, Error)]
pub enum HandlerError {
    /// The handler ran and failed
    #[error("{0}")]
    Failed(String),
    /// Arguments passed the schema but do not fit the handler's argument type
    #[error("arguments do not match the handler's argument type: {0}")]
    Arguments(#[from] serde_json::Error),
    /// The handler observed cancellation and stopped
    #[error("invocation cancelled")]
    Cancelled,
}

impl HandlerError {
    /// Convenience constructor for handler failures
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

impl From<HandlerError> for AppError {
    fn from(error: HandlerError) -> Self {
        match error {
            HandlerError::Arguments(source) => {
                Self::new(ErrorCode::InvalidParams, source.to_string()).with_source(source)
            }
            other => Self::internal(other.to_string()),
        }
    }
}

/// The seam between the dispatcher and tool implementations
#[async_trait]
pub trait Invocable: Send + Sync {
    /// Check arguments before invocation
    ///
    /// The default validates structurally against the declared schema.
    ///
    /// # Errors
    ///
    /// Returns every violated field
    fn validate(&self, schema: &SchemaNode, arguments: &Value) -> Result<(), ValidationError> {
        validation::validate(schema, arguments)
    }

    /// Run the handler
    ///
    /// # Errors
    ///
    /// Returns a [`HandlerError`] when the handler fails
    async fn invoke(
        &self,
        arguments: Value,
        ctx: InvocationContext,
    ) -> Result<ToolOutput, HandlerError>;
}

/// Shared handler reference
pub type Handler = Arc<dyn Invocable>;

/// Handler over raw JSON arguments
pub struct FnHandler<F> {
    func: F,
}

#[async_trait]
impl<F, Fut> Invocable for FnHandler<F>
where
    F: Fn(Value, InvocationContext) -> Fut + Send + Sync,
    Fut: Future<Output = Result<ToolOutput, HandlerError>> + Send,
{
    async fn invoke(
        &self,
        arguments: Value,
        ctx: InvocationContext,
    ) -> Result<ToolOutput, HandlerError> {
        (self.func)(arguments, ctx).await
    }
}

/// Wrap an async closure over raw JSON arguments
pub fn handler_fn<F, Fut>(func: F) -> Handler
where
    F: Fn(Value, InvocationContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<ToolOutput, HandlerError>> + Send + 'static,
{
    Arc::new(FnHandler { func })
}

/// Handler over a strongly-typed argument struct
pub struct TypedHandler<A, F> {
    func: F,
    _args: PhantomData<fn() -> A>,
}

#[async_trait]
impl<A, F, Fut> Invocable for TypedHandler<A, F>
where
    A: DeserializeOwned + Send + 'static,
    F: Fn(A, InvocationContext) -> Fut + Send + Sync,
    Fut: Future<Output = Result<ToolOutput, HandlerError>> + Send,
{
    async fn invoke(
        &self,
        arguments: Value,
        ctx: InvocationContext,
    ) -> Result<ToolOutput, HandlerError> {
        let args: A = serde_json::from_value(arguments)?;
        (self.func)(args, ctx).await
    }
}

/// Wrap an async closure whose arguments deserialize into `A`
pub fn typed_handler<A, F, Fut>(func: F) -> Handler
where
    A: DeserializeOwned + Send + 'static,
    F: Fn(A, InvocationContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<ToolOutput, HandlerError>> + Send + 'static,
{
    Arc::new(TypedHandler {
        func,
        _args: PhantomData,
    })
}
