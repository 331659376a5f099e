// ABOUTME: System service exposing a read-only view of the registry itself
// ABOUTME: Holds a weak registry reference so registration does not create a cycle
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use std::sync::{Arc, Weak};

use serde_json::{json, Value};

use crate::services::{Service, ServiceRegistry};
use crate::tools::{handler_fn, HandlerError, Tool, ToolHints, ToolOutput};
use crate::validation::SchemaNode;

/// Service name
pub const NAME: &str = "system";

/// Build the system service bound to `registry`
#[must_use]
pub fn service(registry: &Arc<ServiceRegistry>) -> Service {
    let registry: Weak<ServiceRegistry> = Arc::downgrade(registry);

    Service::builder(NAME)
        .description("Introspection of the proxy's registered services")
        .tool(
            Tool::new(
                "list-services",
                "List registered services with their tools and prompts",
                SchemaNode::object(),
            )
            .with_hints(ToolHints::READ_ONLY | ToolHints::IDEMPOTENT),
            handler_fn(move |_args: Value, _ctx| {
                let registry = registry.clone();
                async move {
                    let registry = registry
                        .upgrade()
                        .ok_or_else(|| HandlerError::failed("service registry is shutting down"))?;
                    let services = registry.services().await;
                    Ok(ToolOutput::json(json!({
                        "count": services.len(),
                        "services": services,
                    })))
                }
            }),
        )
        .build()
}
