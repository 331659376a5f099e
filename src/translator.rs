// ABOUTME: Converts LLM provider function calls into ordered tool-call requests
// ABOUTME: Pure functions used by orchestration clients, never by the dispatcher
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! # Tool-Call Translator
//!
//! Providers such as OpenAI-compatible chat APIs return a function name
//! and a JSON-encoded argument string. The proxy's orchestration-facing
//! shape is [`ToolCallRequest`], whose parameters keep the order in which
//! the model emitted them.
//!
//! ```rust
//! use tool_proxy::translator::{from_provider_call, ProviderFunctionCall};
//!
//! let call = ProviderFunctionCall::new("add-numbers", r#"{"a":1,"b":2}"#);
//! let request = from_provider_call(&call).unwrap();
//! assert_eq!(request.parameters[0].parameter_name, "a");
//! assert_eq!(request.to_arguments().to_string(), r#"{"a":1,"b":2}"#);
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use thiserror::Error;
use tracing::debug;

use crate::constants::methods;
use crate::errors::{AppError, ErrorCode};
use crate::jsonrpc::JsonRpcRequest;
use crate::validation::SchemaType;

/// Function call as emitted by a chat-completion provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderFunctionCall {
    /// Function (tool) name
    pub name: String,
    /// JSON-encoded argument object
    #[serde(default)]
    pub arguments: String,
}

impl ProviderFunctionCall {
    /// Create a provider call
    #[must_use]
    pub fn new(name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: arguments.into(),
        }
    }
}

/// OpenAI-style tool call envelope (`{id, type, function}`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderToolCall {
    /// Provider-assigned call id
    pub id: String,
    /// Always `"function"` for current providers
    #[serde(rename = "type", default = "function_type")]
    pub call_type: String,
    /// The function being called
    pub function: ProviderFunctionCall,
}

fn function_type() -> String {
    "function".to_owned()
}

/// One named argument, in emission order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCallParameter {
    /// Argument name
    pub parameter_name: String,
    /// Argument value
    pub parameter_value: Value,
}

/// Normalized tool invocation independent of the provider's wire shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCallRequest {
    /// Tool to invoke
    pub tool_name: String,
    /// Ordered parameter list
    pub parameters: Vec<ToolCallParameter>,
}

impl ToolCallRequest {
    /// Re-assemble the parameters into an argument object, preserving order
    #[must_use]
    pub fn to_arguments(&self) -> Value {
        let map: Map<String, Value> = self
            .parameters
            .iter()
            .map(|p| (p.parameter_name.clone(), p.parameter_value.clone()))
            .collect();
        Value::Object(map)
    }

    /// Build the `tools/call` request submitting this call to the proxy
    #[must_use]
    pub fn into_jsonrpc_request(self, id: Value) -> JsonRpcRequest {
        let arguments = self.to_arguments();
        JsonRpcRequest::with_id(
            methods::TOOLS_CALL,
            Some(json!({ "name": self.tool_name, "arguments": arguments })),
            id,
        )
    }
}

/// Decode failures for provider argument blobs
#[derive(Debug, Error)]
pub enum TranslatorError {
    /// Blob is not valid JSON
    #[error("arguments for '{tool}' are not valid JSON: {source}")]
    InvalidJson {
        /// Function name from the provider call
        tool: String,
        /// Decoder error
        #[source]
        source: serde_json::Error,
    },
    /// Blob is JSON but not an object
    #[error("arguments for '{tool}' must be a JSON object, got {found}")]
    NotAnObject {
        /// Function name from the provider call
        tool: String,
        /// JSON type that was found
        found: &'static str,
    },
}

impl From<TranslatorError> for AppError {
    fn from(error: TranslatorError) -> Self {
        let tool = match &error {
            TranslatorError::InvalidJson { tool, .. } | TranslatorError::NotAnObject { tool, .. } => {
                tool.clone()
            }
        };
        Self::new(ErrorCode::MalformedArguments, error.to_string())
            .with_details(json!({ "tool": tool }))
    }
}

/// Translate one provider function call
///
/// An empty or whitespace-only blob means "no arguments".
///
/// # Errors
///
/// Returns [`TranslatorError`] when the blob is not a JSON object
pub fn from_provider_call(call: &ProviderFunctionCall) -> Result<ToolCallRequest, TranslatorError> {
    let blob = call.arguments.trim();
    let parameters = if blob.is_empty() {
        Vec::new()
    } else {
        let decoded: Value =
            serde_json::from_str(blob).map_err(|source| TranslatorError::InvalidJson {
                tool: call.name.clone(),
                source,
            })?;
        match decoded {
            Value::Object(map) => map
                .into_iter()
                .map(|(parameter_name, parameter_value)| ToolCallParameter {
                    parameter_name,
                    parameter_value,
                })
                .collect(),
            other => {
                return Err(TranslatorError::NotAnObject {
                    tool: call.name.clone(),
                    found: SchemaType::name_of(&other),
                })
            }
        }
    };

    debug!(
        function_name = %call.name,
        parameter_count = parameters.len(),
        "Translated provider function call"
    );
    Ok(ToolCallRequest {
        tool_name: call.name.clone(),
        parameters,
    })
}

/// Translate every call in a provider response, stopping at the first failure
///
/// # Errors
///
/// Returns the first [`TranslatorError`] encountered
pub fn from_provider_tool_calls(
    calls: &[ProviderToolCall],
) -> Result<Vec<ToolCallRequest>, TranslatorError> {
    calls
        .iter()
        .map(|call| {
            debug!(tool_call_id = %call.id, tool_call_type = %call.call_type, "Converting tool call");
            from_provider_call(&call.function)
        })
        .collect()
}
