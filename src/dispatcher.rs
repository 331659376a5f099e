// ABOUTME: Request dispatcher resolving, validating, and executing one tool call
// ABOUTME: Runs each handler on its own task with a deadline and a cancellation token
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! # Request Dispatcher
//!
//! Each call moves through `Received → Resolving → Validating → Executing →
//! Completed | Failed`. Resolution and validation failures are terminal and
//! never reach a handler. Execution happens on a spawned task so that a
//! failing or panicking handler only affects its own call, bounded by the
//! configured budget. On timeout the invocation's cancellation token is
//! cancelled and the task aborted; the caller gets `Timeout` immediately.
//!
//! The dispatcher holds no per-call state; it is cheap to share by `Arc`.

use std::any::Any;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::{json, Map, Value};
use tokio::task::JoinError;
use tokio::time::timeout;
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::errors::{AppError, AppResult, ErrorCode};
use crate::services::{ResolvedTool, ServiceRegistry};
use crate::tools::{InvocationContext, Prompt, ToolOutput};
use crate::validation;

/// Lifecycle of one dispatched call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchState {
    /// Call accepted
    Received,
    /// Looking up the handler
    Resolving,
    /// Checking arguments against the schema
    Validating,
    /// Handler running
    Executing,
    /// Handler returned a result
    Completed,
    /// Call ended with an error
    Failed,
}

impl fmt::Display for DispatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Received => "received",
            Self::Resolving => "resolving",
            Self::Validating => "validating",
            Self::Executing => "executing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// A decoded tool invocation
#[derive(Debug, Clone)]
pub struct ToolCall {
    /// Caller-visible or qualified tool name
    pub name: String,
    /// Arguments object; `null` is treated as `{}`
    pub arguments: Value,
    /// Correlation id; generated when absent
    pub request_id: Option<String>,
    /// Overrides the dispatcher's budget for this call
    pub timeout: Option<Duration>,
}

impl ToolCall {
    /// Create a call with no correlation id
    #[must_use]
    pub fn new(name: impl Into<String>, arguments: Value) -> Self {
        Self {
            name: name.into(),
            arguments,
            request_id: None,
            timeout: None,
        }
    }

    /// Set the correlation id
    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    /// Set a per-call budget
    #[must_use]
    pub const fn with_timeout(mut self, budget: Duration) -> Self {
        self.timeout = Some(budget);
        self
    }
}

/// A prompt rendered with validated arguments
#[derive(Debug, Clone)]
pub struct RenderedPrompt {
    /// Owning service
    pub service: String,
    /// Declared prompt descriptor
    pub prompt: Arc<Prompt>,
    /// Template with placeholders substituted
    pub text: String,
}

/// Resolves, validates, and executes calls against the registry
#[derive(Debug, Clone)]
pub struct RequestDispatcher {
    registry: Arc<ServiceRegistry>,
    timeout: Duration,
}

impl RequestDispatcher {
    /// Create a dispatcher with a default per-call budget
    #[must_use]
    pub const fn new(registry: Arc<ServiceRegistry>, timeout: Duration) -> Self {
        Self { registry, timeout }
    }

    /// Registry the dispatcher resolves against
    #[must_use]
    pub const fn registry(&self) -> &Arc<ServiceRegistry> {
        &self.registry
    }

    /// Default per-call budget
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Dispatch one tool call
    ///
    /// # Errors
    ///
    /// - `MethodNotFound` / `AmbiguousTool` when the name does not resolve
    /// - `InvalidParams` when arguments violate the tool's schema
    /// - `InternalError` when the handler fails or panics
    /// - `Timeout` when the handler exceeds its budget
    pub async fn dispatch(&self, call: ToolCall) -> AppResult<ToolOutput> {
        let started = Instant::now();
        let request_id = call
            .request_id
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let budget = call.timeout.unwrap_or(self.timeout);
        debug!(request_id = %request_id, tool = %call.name, state = %DispatchState::Received, "Dispatch");

        debug!(request_id = %request_id, tool = %call.name, state = %DispatchState::Resolving, "Dispatch");
        let resolved = self
            .registry
            .resolve(&call.name)
            .await
            .inspect_err(|e| log_failure(&request_id, &call.name, "", started, e))?;

        debug!(
            request_id = %request_id,
            tool = %call.name,
            service = %resolved.service,
            state = %DispatchState::Validating,
            "Dispatch"
        );
        let arguments = normalize_arguments(call.arguments)
            .and_then(|args| {
                resolved
                    .handler
                    .validate(&resolved.tool.input_schema, &args)
                    .map(|()| args)
                    .map_err(AppError::from)
            })
            .inspect_err(|e| log_failure(&request_id, &call.name, &resolved.service, started, e))?;

        debug!(
            request_id = %request_id,
            tool = %call.name,
            service = %resolved.service,
            state = %DispatchState::Executing,
            timeout_ms = millis(budget),
            "Dispatch"
        );
        let service = resolved.service.clone();
        let result = execute(resolved, arguments, &request_id, budget).await;

        match &result {
            Ok(_) => debug!(
                request_id = %request_id,
                tool = %call.name,
                service = %service,
                state = %DispatchState::Completed,
                duration_ms = millis(started.elapsed()),
                "Dispatch"
            ),
            Err(e) => log_failure(&request_id, &call.name, &service, started, e),
        }
        result
    }

    /// Resolve a prompt, validate its arguments, and render its template
    ///
    /// # Errors
    ///
    /// - `MethodNotFound` / `AmbiguousTool` when the name does not resolve
    /// - `InvalidParams` when arguments violate the prompt's schema
    pub async fn render_prompt(&self, name: &str, arguments: Value) -> AppResult<RenderedPrompt> {
        let resolved = self.registry.resolve_prompt(name).await?;
        let arguments = normalize_arguments(arguments)?;
        validation::validate(&resolved.prompt.input_schema, &arguments)?;

        let empty = Map::new();
        let text = resolved
            .prompt
            .render(arguments.as_object().unwrap_or(&empty));
        debug!(prompt = %name, service = %resolved.service, "Rendered prompt");
        Ok(RenderedPrompt {
            service: resolved.service,
            prompt: resolved.prompt,
            text,
        })
    }
}

/// `null` becomes `{}`; anything else must be an object
fn normalize_arguments(arguments: Value) -> AppResult<Value> {
    match arguments {
        Value::Null => Ok(Value::Object(Map::new())),
        Value::Object(_) => Ok(arguments),
        other => Err(AppError::invalid_params(format!(
            "Arguments must be an object, got {}",
            validation::SchemaType::name_of(&other)
        ))),
    }
}

async fn execute(
    resolved: ResolvedTool,
    arguments: Value,
    request_id: &str,
    budget: Duration,
) -> AppResult<ToolOutput> {
    let ctx = InvocationContext::new(resolved.service.as_str(), resolved.tool.name.as_str(), budget)
        .with_request_id(request_id);
    let cancellation = ctx.cancellation.clone();
    let handler = Arc::clone(&resolved.handler);
    let details = json!({ "service": resolved.service, "tool": resolved.tool.name });

    let mut task = tokio::spawn(async move { handler.invoke(arguments, ctx).await });

    match timeout(budget, &mut task).await {
        Ok(Ok(Ok(output))) => Ok(output),
        Ok(Ok(Err(handler_error))) => Err(AppError::from(handler_error).with_details(details)),
        Ok(Err(join_error)) => Err(AppError::internal(join_failure_message(join_error))
            .with_details(details)),
        Err(_) => {
            cancellation.cancel();
            task.abort();
            Err(AppError::new(
                ErrorCode::Timeout,
                format!(
                    "Tool '{}' exceeded its {}ms budget",
                    resolved.tool.name,
                    budget.as_millis()
                ),
            )
            .with_details(json!({
                "service": resolved.service,
                "tool": resolved.tool.name,
                "timeout_ms": millis(budget),
            })))
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

fn join_failure_message(join_error: JoinError) -> String {
    if join_error.is_panic() {
        format!("Handler panicked: {}", panic_message(join_error.into_panic().as_ref()))
    } else {
        "Handler task was cancelled".to_owned()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic payload")
}

fn log_failure(request_id: &str, tool: &str, service: &str, started: Instant, e: &AppError) {
    let duration_ms = millis(started.elapsed());
    match e.code {
        ErrorCode::InternalError => error!(
            request_id = %request_id,
            tool = %tool,
            service = %service,
            state = %DispatchState::Failed,
            duration_ms,
            error = %e,
            "Dispatch"
        ),
        _ => warn!(
            request_id = %request_id,
            tool = %tool,
            service = %service,
            state = %DispatchState::Failed,
            error_kind = e.code.as_str(),
            duration_ms,
            error = %e,
            "Dispatch"
        ),
    }
}
