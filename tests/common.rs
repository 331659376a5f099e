// ABOUTME: Shared test utilities for integration tests
// ABOUTME: Provides spy handlers, sample services, and registry/adapter setup helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::module_name_repetitions
)]
//! Shared test utilities for `tool_proxy`
//!
//! This module provides common setup functions to reduce duplication across
//! integration tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};
use std::time::Duration;

use serde_json::{json, Value};
use tokio::time::sleep;
use tool_proxy::config::ServerConfig;
use tool_proxy::jsonrpc::JsonRpcRequest;
use tool_proxy::mcp::ProtocolAdapter;
use tool_proxy::services::{builtin, CollisionPolicy, Service, ServiceRegistry};
use tool_proxy::tools::{handler_fn, Handler, HandlerError, Tool, ToolOutput};
use tool_proxy::validation::SchemaNode;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("warn")
            .with_test_writer()
            .try_init();
    });
}

/// Handler wrapper counting how often it was invoked
#[derive(Clone, Default)]
pub struct Spy {
    calls: Arc<AtomicUsize>,
}

impl Spy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Handler returning `reply` as text
    pub fn replying(&self, reply: &'static str) -> Handler {
        let calls = Arc::clone(&self.calls);
        handler_fn(move |_args: Value, _ctx| {
            calls.fetch_add(1, Ordering::SeqCst);
            async move { Ok(ToolOutput::text(reply)) }
        })
    }

    /// Handler that always fails with `message`
    pub fn failing(&self, message: &'static str) -> Handler {
        let calls = Arc::clone(&self.calls);
        handler_fn(move |_args: Value, _ctx| {
            calls.fetch_add(1, Ordering::SeqCst);
            async move { Err(HandlerError::failed(message)) }
        })
    }

    /// Handler that panics
    pub fn panicking(&self) -> Handler {
        let calls = Arc::clone(&self.calls);
        handler_fn(move |_args: Value, _ctx| {
            calls.fetch_add(1, Ordering::SeqCst);
            explode()
        })
    }

    /// Handler that sleeps for `delay` before answering
    pub fn sleeping(&self, delay: Duration) -> Handler {
        let calls = Arc::clone(&self.calls);
        handler_fn(move |_args: Value, _ctx| {
            calls.fetch_add(1, Ordering::SeqCst);
            async move {
                sleep(delay).await;
                Ok(ToolOutput::text("finally"))
            }
        })
    }
}

async fn explode() -> Result<ToolOutput, HandlerError> {
    panic!("handler exploded")
}

/// `{text: string}` with `text` required
pub fn text_schema() -> SchemaNode {
    SchemaNode::object().required_property("text", SchemaNode::string())
}

/// `{a: number, b: number}` with both required
pub fn add_schema() -> SchemaNode {
    SchemaNode::object()
        .required_property("a", SchemaNode::number())
        .required_property("b", SchemaNode::number())
}

/// Service with one tool per `(name, handler)` pair, each accepting any object
pub fn service_with(name: &str, tools: Vec<(&str, Handler)>) -> Service {
    tools
        .into_iter()
        .fold(Service::builder(name), |builder, (tool, handler)| {
            builder.tool(
                Tool::new(tool, format!("{tool} from {name}"), SchemaNode::object()),
                handler,
            )
        })
        .build()
}

/// Registry holding the built-in services
pub async fn builtin_registry(policy: CollisionPolicy) -> Arc<ServiceRegistry> {
    let registry = Arc::new(ServiceRegistry::new(policy));
    registry
        .initialize(builtin::default_services(&registry))
        .await
        .unwrap();
    registry
}

/// Adapter over the built-in services with default configuration
pub async fn builtin_adapter() -> Arc<ProtocolAdapter> {
    adapter_with(ServerConfig::default()).await
}

/// Adapter over the built-in services with the given configuration
pub async fn adapter_with(config: ServerConfig) -> Arc<ProtocolAdapter> {
    let registry = builtin_registry(config.collision_policy).await;
    Arc::new(ProtocolAdapter::new(Arc::new(config), registry))
}

/// `tools/call` request for `name` with `arguments`
pub fn tools_call(id: i64, name: &str, arguments: Value) -> JsonRpcRequest {
    JsonRpcRequest::with_id(
        "tools/call",
        Some(json!({ "name": name, "arguments": arguments })),
        Value::from(id),
    )
}
