// ABOUTME: Protocol adapter mapping JSON-RPC methods onto registry and dispatcher calls
// ABOUTME: Owns version negotiation, batching, notifications, and response framing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! # MCP Protocol Adapter
//!
//! The single place request/response framing lives. Transports hand raw
//! bytes (or an already-decoded [`JsonRpcRequest`]) plus the version the
//! transport declared, and get back the response to write, if any.
//!
//! Version checks: `initialize` must carry a supported `protocolVersion`,
//! which is echoed back. Any request may also declare a version through the
//! transport header or `params._meta.protocolVersion`; an unsupported
//! declaration fails with `UnsupportedProtocolVersion`.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use futures_util::future::join_all;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::config::ServerConfig;
use crate::constants::methods;
use crate::dispatcher::{RequestDispatcher, ToolCall};
use crate::errors::{AppError, AppResult, ErrorCode};
use crate::jsonrpc::{JsonRpcPayload, JsonRpcRequest, JsonRpcResponse};
use crate::services::ServiceRegistry;

use super::capabilities::CapabilityDescriptor;
use super::schema::{
    CallToolParams, GetPromptParams, GetPromptResult, HealthReport, PromptSchema, ToolSchema,
};

/// Maps transport requests onto the registry and dispatcher
pub struct ProtocolAdapter {
    config: Arc<ServerConfig>,
    descriptor: CapabilityDescriptor,
    registry: Arc<ServiceRegistry>,
    dispatcher: RequestDispatcher,
    started_at: Instant,
}

impl ProtocolAdapter {
    /// Create an adapter over an initialized registry
    #[must_use]
    pub fn new(config: Arc<ServerConfig>, registry: Arc<ServiceRegistry>) -> Self {
        let descriptor = CapabilityDescriptor::from_config(&config);
        let dispatcher = RequestDispatcher::new(Arc::clone(&registry), config.tool_timeout);
        Self {
            config,
            descriptor,
            registry,
            dispatcher,
            started_at: Instant::now(),
        }
    }

    /// Startup configuration
    #[must_use]
    pub const fn config(&self) -> &Arc<ServerConfig> {
        &self.config
    }

    /// Capability descriptor advertised on negotiation
    #[must_use]
    pub const fn descriptor(&self) -> &CapabilityDescriptor {
        &self.descriptor
    }

    /// Registry the adapter serves
    #[must_use]
    pub const fn registry(&self) -> &Arc<ServiceRegistry> {
        &self.registry
    }

    /// Dispatcher executing tool calls
    #[must_use]
    pub const fn dispatcher(&self) -> &RequestDispatcher {
        &self.dispatcher
    }

    /// Handle raw transport bytes
    ///
    /// Returns `None` when nothing should be written back (notifications,
    /// or a batch made only of notifications).
    pub async fn handle_payload(&self, bytes: &[u8], header_version: Option<&str>) -> Option<Value> {
        match JsonRpcPayload::parse(bytes) {
            Err(e) => {
                warn!(error = %e, "Rejected undecodable payload");
                to_wire(&JsonRpcResponse::from_app_error(None, &e))
            }
            Ok(JsonRpcPayload::Single(value)) => {
                let response = self.handle_value(value, header_version).await?;
                to_wire(&response)
            }
            Ok(JsonRpcPayload::Batch(items)) => {
                debug!(batch_size = items.len(), "Handling batch");
                let responses: Vec<Value> = join_all(
                    items
                        .into_iter()
                        .map(|item| self.handle_value(item, header_version)),
                )
                .await
                .into_iter()
                .flatten()
                .filter_map(|response| to_wire(&response))
                .collect();
                if responses.is_empty() {
                    None
                } else {
                    Some(Value::Array(responses))
                }
            }
        }
    }

    async fn handle_value(
        &self,
        value: Value,
        header_version: Option<&str>,
    ) -> Option<JsonRpcResponse> {
        match JsonRpcRequest::from_value(value) {
            Ok(request) => self.handle_request(request, header_version).await,
            Err((id, e)) => Some(JsonRpcResponse::from_app_error(id, &e)),
        }
    }

    /// Handle one decoded request
    pub async fn handle_request(
        &self,
        request: JsonRpcRequest,
        header_version: Option<&str>,
    ) -> Option<JsonRpcResponse> {
        if request.method.starts_with(methods::NOTIFICATION_PREFIX) {
            debug!(method = %request.method, "Notification received");
            return None;
        }

        let id = request.id.clone();
        let result = self.route(&request, header_version).await;

        if request.is_notification() {
            if let Err(e) = &result {
                debug!(method = %request.method, error = %e, "Dropped error for request without id");
            }
            return None;
        }

        Some(match result {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err(e) => JsonRpcResponse::from_app_error(id, &e),
        })
    }

    async fn route(&self, request: &JsonRpcRequest, header_version: Option<&str>) -> AppResult<Value> {
        self.check_declared_version(request, header_version)?;

        match request.method.as_str() {
            methods::INITIALIZE => self.initialize(request.params.as_ref()),
            methods::PING => Ok(json!({})),
            methods::HEALTH => serialize(&self.health().await),
            methods::TOOLS_LIST => self.tools_list().await,
            methods::PROMPTS_LIST => self.prompts_list().await,
            methods::TOOLS_CALL => self.tools_call(request).await,
            methods::PROMPTS_GET => self.prompts_get(request).await,
            other => Err(AppError::method_not_found(other)),
        }
    }

    fn check_declared_version(
        &self,
        request: &JsonRpcRequest,
        header_version: Option<&str>,
    ) -> AppResult<()> {
        let meta_version = request
            .params
            .as_ref()
            .and_then(|p| p.get("_meta"))
            .and_then(|m| m.get("protocolVersion"))
            .and_then(Value::as_str);

        for version in [header_version, meta_version].into_iter().flatten() {
            self.require_supported(version)?;
        }
        Ok(())
    }

    fn require_supported(&self, version: &str) -> AppResult<()> {
        if self.descriptor.supports(version) {
            return Ok(());
        }
        warn!(requested = %version, "Unsupported protocol version");
        Err(AppError::new(
            ErrorCode::UnsupportedProtocolVersion,
            format!("Protocol version '{version}' is not supported"),
        )
        .with_details(json!({
            "requested": version,
            "supported": self.descriptor.supported_protocol_versions,
        })))
    }

    fn initialize(&self, params: Option<&Value>) -> AppResult<Value> {
        let requested = params
            .and_then(|p| p.get("protocolVersion"))
            .and_then(Value::as_str);

        let negotiated = match requested {
            Some(version) => {
                self.require_supported(version)?;
                version
            }
            None => self.descriptor.protocol_version.as_str(),
        };

        info!(protocol_version = %negotiated, "Client initialized");
        serialize(&self.descriptor.initialize_response(negotiated))
    }

    /// Static service metadata plus live registry counts
    pub async fn health(&self) -> HealthReport {
        let services: Vec<String> = self
            .registry
            .services()
            .await
            .into_iter()
            .map(|s| s.name)
            .collect();
        HealthReport {
            status: "healthy".to_owned(),
            descriptor: self.descriptor.clone(),
            service_count: services.len(),
            services,
            timestamp: Utc::now().to_rfc3339(),
            uptime_seconds: self.started_at.elapsed().as_secs(),
        }
    }

    async fn tools_list(&self) -> AppResult<Value> {
        let tools: Vec<ToolSchema> = self
            .registry
            .list_tools()
            .await
            .into_iter()
            .map(ToolSchema::from)
            .collect();
        debug!(tool_count = tools.len(), "Listed tools");
        Ok(json!({ "tools": tools }))
    }

    async fn prompts_list(&self) -> AppResult<Value> {
        let prompts: Vec<PromptSchema> = self
            .registry
            .list_prompts()
            .await
            .into_iter()
            .map(PromptSchema::from)
            .collect();
        Ok(json!({ "prompts": prompts }))
    }

    async fn tools_call(&self, request: &JsonRpcRequest) -> AppResult<Value> {
        let params: CallToolParams = decode_params(request)?;
        let mut call = ToolCall::new(params.name, params.arguments);
        if let Some(id) = request.id.as_ref().filter(|id| !id.is_null()) {
            call = call.with_request_id(id.as_str().map_or_else(|| id.to_string(), str::to_owned));
        }
        let output = self.dispatcher.dispatch(call).await?;
        serialize(&output)
    }

    async fn prompts_get(&self, request: &JsonRpcRequest) -> AppResult<Value> {
        let params: GetPromptParams = decode_params(request)?;
        let rendered = self
            .dispatcher
            .render_prompt(&params.name, params.arguments)
            .await?;
        serialize(&GetPromptResult::from(rendered))
    }
}

fn decode_params<T: DeserializeOwned>(request: &JsonRpcRequest) -> AppResult<T> {
    let params = request
        .params
        .clone()
        .ok_or_else(|| AppError::invalid_params(format!("Missing params for {}", request.method)))?;
    serde_json::from_value(params).map_err(|e| {
        AppError::invalid_params(format!("Invalid params for {}: {e}", request.method))
    })
}

fn serialize<T: Serialize>(value: &T) -> AppResult<Value> {
    serde_json::to_value(value)
        .map_err(|e| AppError::internal(format!("Failed to serialize result: {e}")))
}

fn to_wire(response: &JsonRpcResponse) -> Option<Value> {
    match serde_json::to_value(response) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(error = %e, "Failed to serialize response");
            None
        }
    }
}
