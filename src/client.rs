// ABOUTME: HTTP client for orchestration layers submitting tool calls to the proxy
// ABOUTME: Wraps reqwest and the translator so provider function calls become tools/call requests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! # Proxy Client
//!
//! An orchestration layer receives function calls from a chat-completion
//! provider, translates them with [`crate::translator`], and submits them
//! here like any other caller.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use reqwest::{Client, ClientBuilder};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::debug;

use crate::constants::{headers, methods, protocol::DEFAULT_PROTOCOL_VERSION};
use crate::errors::{AppError, AppResult, ErrorCode};
use crate::jsonrpc::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};
use crate::mcp::schema::ToolSchema;
use crate::tools::ToolOutput;
use crate::translator::{from_provider_call, ProviderFunctionCall, ToolCallRequest};

/// JSON-RPC client for a running proxy
#[derive(Debug)]
pub struct ProxyClient {
    http: Client,
    endpoint: String,
    protocol_version: String,
    next_id: AtomicU64,
}

impl ProxyClient {
    /// Client for the endpoint URL (e.g. `http://127.0.0.1:8081/mcp`)
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        let http = ClientBuilder::new()
            .timeout(Duration::from_secs(60))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self::with_client(http, endpoint)
    }

    /// Client reusing an existing connection pool
    #[must_use]
    pub fn with_client(http: Client, endpoint: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
            protocol_version: DEFAULT_PROTOCOL_VERSION.to_owned(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Declare a different protocol version on every request
    #[must_use]
    pub fn with_protocol_version(mut self, version: impl Into<String>) -> Self {
        self.protocol_version = version.into();
        self
    }

    /// Endpoint URL
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Negotiate the protocol version
    ///
    /// # Errors
    ///
    /// Returns the proxy's error, or `InternalError` on transport failure
    pub async fn initialize(&self) -> AppResult<Value> {
        self.request(
            methods::INITIALIZE,
            Some(json!({
                "protocolVersion": self.protocol_version,
                "capabilities": {},
                "clientInfo": { "name": "tool-proxy-client", "version": env!("CARGO_PKG_VERSION") },
            })),
        )
        .await
    }

    /// Discover every tool the proxy exposes
    ///
    /// # Errors
    ///
    /// Returns the proxy's error, or `InternalError` on transport failure
    pub async fn list_tools(&self) -> AppResult<Vec<ToolSchema>> {
        let result = self.request(methods::TOOLS_LIST, None).await?;
        decode(result.get("tools").cloned().unwrap_or_else(|| json!([])))
    }

    /// Submit a translated tool call
    ///
    /// # Errors
    ///
    /// Returns the proxy's error, or `InternalError` on transport failure
    pub async fn call_tool(&self, call: &ToolCallRequest) -> AppResult<ToolOutput> {
        let result = self
            .request(
                methods::TOOLS_CALL,
                Some(json!({ "name": call.tool_name, "arguments": call.to_arguments() })),
            )
            .await?;
        decode(result)
    }

    /// Translate a provider function call and submit it
    ///
    /// # Errors
    ///
    /// Returns `MalformedArguments` when the blob does not decode, otherwise
    /// as [`Self::call_tool`]
    pub async fn call_provider_function(&self, call: &ProviderFunctionCall) -> AppResult<ToolOutput> {
        let request = from_provider_call(call)?;
        self.call_tool(&request).await
    }

    /// Send one request and unwrap its result
    ///
    /// # Errors
    ///
    /// Returns the proxy's error, or `InternalError` on transport failure
    pub async fn request(&self, method: &str, params: Option<Value>) -> AppResult<Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = JsonRpcRequest::with_id(method, params, Value::from(id));
        debug!(method = %method, id, endpoint = %self.endpoint, "Sending proxy request");

        let response = self
            .http
            .post(&self.endpoint)
            .header(headers::PROTOCOL_VERSION, &self.protocol_version)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::internal(format!("Proxy request failed: {e}")).with_source(e))?;

        let status = response.status();
        let body: JsonRpcResponse = response.json().await.map_err(|e| {
            AppError::internal(format!("Invalid proxy response (HTTP {status}): {e}")).with_source(e)
        })?;

        match (body.result, body.error) {
            (_, Some(error)) => Err(remote_error(error)),
            (Some(result), None) => Ok(result),
            (None, None) => Err(AppError::internal("Proxy response carried neither result nor error")),
        }
    }
}

/// Rebuild a taxonomy error from its wire form
fn remote_error(error: JsonRpcError) -> AppError {
    let code = error.error_code().unwrap_or(ErrorCode::InternalError);
    let converted = AppError::new(code, error.message);
    match error.data {
        Some(data) => converted.with_details(data),
        None => converted,
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> AppResult<T> {
    serde_json::from_value(value)
        .map_err(|e| AppError::internal(format!("Unexpected proxy result shape: {e}")))
}
