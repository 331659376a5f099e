// ABOUTME: JSON-RPC 2.0 framing for the proxy endpoint: requests, responses, batches
// ABOUTME: Converts AppError into wire errors carrying the taxonomy kind and details
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! # JSON-RPC 2.0 Foundation
//!
//! Shared request, response, and error types used by every transport. The
//! protocol adapter never sees raw bytes: transports hand it a parsed
//! [`JsonRpcPayload`], and each element becomes a [`JsonRpcRequest`] or an
//! immediate `InvalidRequest` response.
//!
//! ## Usage
//!
//! ```rust
//! use tool_proxy::jsonrpc::{JsonRpcRequest, JsonRpcResponse};
//! # use serde_json::json;
//!
//! let request = JsonRpcRequest::new("tools/list", None);
//! let response = JsonRpcResponse::success(request.id.clone(), json!({"tools": []}));
//! assert!(response.is_success());
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Map, Value};

use crate::errors::{AppError, AppResult, ErrorCode};

pub use tool_proxy_core::constants::protocol::JSONRPC_VERSION;

/// JSON-RPC 2.0 Request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    /// JSON-RPC version (always "2.0")
    pub jsonrpc: String,

    /// Method name to invoke
    pub method: String,

    /// Optional parameters for the method
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,

    /// Request identifier; absent for notifications
    ///
    /// An explicit `"id": null` is kept as `Some(Value::Null)` and answered.
    #[serde(
        default,
        deserialize_with = "present_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<Value>,
}

/// A present `id` member is `Some` even when it is `null`
fn present_id<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// JSON-RPC 2.0 Response
///
/// Exactly one of `result` or `error` is present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    /// JSON-RPC version (always "2.0")
    pub jsonrpc: String,

    /// Result of the method call (mutually exclusive with error)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,

    /// Error information (mutually exclusive with result)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,

    /// Request identifier for correlation
    pub id: Option<Value>,
}

/// JSON-RPC 2.0 Error Object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    /// Numeric error code
    pub code: i32,

    /// Human-readable error message
    pub message: String,

    /// `{kind, ...details}` for proxy errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcRequest {
    /// Create a new JSON-RPC request with id `1`
    #[must_use]
    pub fn new(method: impl Into<String>, params: Option<Value>) -> Self {
        Self::with_id(method, params, Value::from(1))
    }

    /// Create a new request with a specific ID
    #[must_use]
    pub fn with_id(method: impl Into<String>, params: Option<Value>, id: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_owned(),
            method: method.into(),
            params,
            id: Some(id),
        }
    }

    /// Create a notification (no ID, no response expected)
    #[must_use]
    pub fn notification(method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_owned(),
            method: method.into(),
            params,
            id: None,
        }
    }

    /// Whether the caller expects no response
    #[must_use]
    pub const fn is_notification(&self) -> bool {
        self.id.is_none()
    }

    /// Decode one element of a payload into a request
    ///
    /// # Errors
    ///
    /// Returns the best-effort request id together with an `InvalidRequest`
    /// error when the value is not a JSON-RPC 2.0 request object.
    pub fn from_value(value: Value) -> Result<Self, (Option<Value>, AppError)> {
        let id = value.get("id").cloned();
        let request: Self = serde_json::from_value(value).map_err(|e| {
            (
                id.clone(),
                AppError::invalid_request(format!("Not a JSON-RPC request: {e}")),
            )
        })?;
        request.check_envelope().map_err(|e| (id, e))?;
        Ok(request)
    }

    fn check_envelope(&self) -> AppResult<()> {
        if self.jsonrpc != JSONRPC_VERSION {
            return Err(AppError::invalid_request(format!(
                "Unsupported jsonrpc version '{}'",
                self.jsonrpc
            )));
        }
        if self.method.trim().is_empty() {
            return Err(AppError::invalid_request("Method must not be empty"));
        }
        if let Some(params) = &self.params {
            if !params.is_object() && !params.is_array() {
                return Err(AppError::invalid_request(
                    "Params must be an object or an array",
                ));
            }
        }
        Ok(())
    }
}

impl JsonRpcResponse {
    /// Create a success response
    #[must_use]
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_owned(),
            result: Some(result),
            error: None,
            id,
        }
    }

    /// Create an error response
    #[must_use]
    pub fn error(id: Option<Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_owned(),
            result: None,
            error: Some(JsonRpcError::new(code, message)),
            id,
        }
    }

    /// Create an error response from a proxy error
    #[must_use]
    pub fn from_app_error(id: Option<Value>, error: &AppError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_owned(),
            result: None,
            error: Some(JsonRpcError::from(error)),
            id,
        }
    }

    /// Check if this is a success response
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.error.is_none() && self.result.is_some()
    }

    /// Check if this is an error response
    #[must_use]
    pub const fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

impl JsonRpcError {
    /// Create a new error
    #[must_use]
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// Taxonomy code, when the numeric code belongs to the proxy taxonomy
    #[must_use]
    pub const fn error_code(&self) -> Option<ErrorCode> {
        ErrorCode::from_jsonrpc_code(self.code)
    }

    /// Taxonomy name carried in `data.kind`
    #[must_use]
    pub fn kind(&self) -> Option<&str> {
        self.data.as_ref()?.get("kind")?.as_str()
    }
}

impl From<&AppError> for JsonRpcError {
    fn from(error: &AppError) -> Self {
        let mut data = Map::new();
        data.insert("kind".to_owned(), json!(error.code.as_str()));
        match &error.details {
            Some(Value::Object(details)) => {
                for (key, value) in details {
                    data.insert(key.clone(), value.clone());
                }
            }
            Some(other) => {
                data.insert("details".to_owned(), other.clone());
            }
            None => {}
        }
        Self {
            code: error.code.jsonrpc_code(),
            message: error.message.clone(),
            data: Some(Value::Object(data)),
        }
    }
}

/// A decoded transport payload: one request value or a batch
#[derive(Debug, Clone)]
pub enum JsonRpcPayload {
    /// A single request object
    Single(Value),
    /// A non-empty batch of request objects
    Batch(Vec<Value>),
}

impl JsonRpcPayload {
    /// Parse raw transport bytes
    ///
    /// # Errors
    ///
    /// Returns `ParseError` for invalid JSON and `InvalidRequest` for an empty
    /// batch or a payload that is neither an object nor an array.
    pub fn parse(bytes: &[u8]) -> AppResult<Self> {
        let value: Value = serde_json::from_slice(bytes)
            .map_err(|e| AppError::new(ErrorCode::ParseError, format!("Invalid JSON: {e}")))?;
        match value {
            Value::Array(items) if items.is_empty() => {
                Err(AppError::invalid_request("Empty batch"))
            }
            Value::Array(items) => Ok(Self::Batch(items)),
            Value::Object(_) => Ok(Self::Single(value)),
            _ => Err(AppError::invalid_request(
                "Payload must be a request object or a batch",
            )),
        }
    }
}
