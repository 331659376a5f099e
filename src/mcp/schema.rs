// ABOUTME: Wire shapes for MCP results: initialize, tools/list, prompts/list, prompts/get
// ABOUTME: Maps registry listings and dispatcher outputs onto protocol JSON
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! MCP Protocol Schema Definitions
//!
//! Type-safe result bodies so the adapter never assembles protocol JSON by
//! hand. Each listed tool and prompt carries its owning `service` alongside
//! the standard MCP fields.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::dispatcher::RenderedPrompt;
use crate::mcp::capabilities::CapabilityDescriptor;
use crate::services::{ListedPrompt, ListedTool};
use crate::tools::ToolAnnotations;
use crate::validation::SchemaNode;

/// Server Information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerInfo {
    /// Server name
    pub name: String,
    /// Server version
    pub version: String,
}

/// Tools capability
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolsCapability {
    /// Whether the server emits list-changed notifications
    #[serde(rename = "listChanged", skip_serializing_if = "Option::is_none")]
    pub list_changed: Option<bool>,
}

/// Prompts capability
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptsCapability {
    /// Whether the server emits list-changed notifications
    #[serde(rename = "listChanged", skip_serializing_if = "Option::is_none")]
    pub list_changed: Option<bool>,
}

/// Server capabilities advertised during negotiation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerCapabilities {
    /// Prompt support
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompts: Option<PromptsCapability>,
    /// Tool support
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<ToolsCapability>,
}

/// Result of `initialize`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitializeResponse {
    /// Negotiated protocol version
    #[serde(rename = "protocolVersion")]
    pub protocol_version: String,
    /// Server identity
    #[serde(rename = "serverInfo")]
    pub server_info: ServerInfo,
    /// Advertised capabilities
    pub capabilities: ServerCapabilities,
    /// Free-form usage hint for the client
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

/// One entry of `tools/list`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSchema {
    /// Caller-visible name
    pub name: String,
    /// Tool description
    pub description: String,
    /// Argument schema
    #[serde(rename = "inputSchema")]
    pub input_schema: SchemaNode,
    /// Behavioral hints
    pub annotations: ToolAnnotations,
    /// Owning service
    pub service: String,
}

impl From<ListedTool> for ToolSchema {
    fn from(listed: ListedTool) -> Self {
        Self {
            name: listed.name,
            description: listed.tool.description.clone(),
            input_schema: listed.tool.input_schema.clone(),
            annotations: listed.tool.hints.annotations(),
            service: listed.service,
        }
    }
}

/// Declared prompt argument
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptArgument {
    /// Argument name
    pub name: String,
    /// Argument description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether the argument must be supplied
    pub required: bool,
}

/// One entry of `prompts/list`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptSchema {
    /// Caller-visible name
    pub name: String,
    /// Display title
    pub title: String,
    /// Prompt description
    pub description: String,
    /// Arguments derived from the schema's properties
    pub arguments: Vec<PromptArgument>,
    /// Full argument schema
    #[serde(rename = "inputSchema")]
    pub input_schema: SchemaNode,
    /// Owning service
    pub service: String,
}

impl From<ListedPrompt> for PromptSchema {
    fn from(listed: ListedPrompt) -> Self {
        let schema = &listed.prompt.input_schema;
        let arguments = schema
            .properties
            .iter()
            .map(|(name, property)| PromptArgument {
                name: name.clone(),
                description: property.description.clone(),
                required: schema.required.contains(name),
            })
            .collect();
        Self {
            name: listed.name,
            title: listed.prompt.title.clone(),
            description: listed.prompt.description.clone(),
            arguments,
            input_schema: schema.clone(),
            service: listed.service,
        }
    }
}

/// Text content block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextContent {
    /// Always `"text"`
    #[serde(rename = "type")]
    pub content_type: String,
    /// Text body
    pub text: String,
}

/// One message of a rendered prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptMessage {
    /// Speaker role
    pub role: String,
    /// Message body
    pub content: TextContent,
}

/// Result of `prompts/get`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetPromptResult {
    /// Prompt description
    pub description: String,
    /// Rendered messages
    pub messages: Vec<PromptMessage>,
}

impl From<RenderedPrompt> for GetPromptResult {
    fn from(rendered: RenderedPrompt) -> Self {
        Self {
            description: rendered.prompt.description.clone(),
            messages: vec![PromptMessage {
                role: "user".to_owned(),
                content: TextContent {
                    content_type: "text".to_owned(),
                    text: rendered.text,
                },
            }],
        }
    }
}

/// Parameters of `tools/call`
#[derive(Debug, Clone, Deserialize)]
pub struct CallToolParams {
    /// Tool name, bare or service-qualified
    pub name: String,
    /// Argument object; absent means `{}`
    #[serde(default)]
    pub arguments: Value,
}

/// Parameters of `prompts/get`
#[derive(Debug, Clone, Deserialize)]
pub struct GetPromptParams {
    /// Prompt name, bare or service-qualified
    pub name: String,
    /// Argument object; absent means `{}`
    #[serde(default)]
    pub arguments: Value,
}

/// Result of the `health` method and `GET /health`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    /// Always `"healthy"` while the process answers
    pub status: String,
    /// Static capability metadata
    #[serde(flatten)]
    pub descriptor: CapabilityDescriptor,
    /// Registered service names, in registration order
    pub services: Vec<String>,
    /// Number of registered services
    pub service_count: usize,
    /// RFC 3339 time the report was produced
    pub timestamp: String,
    /// Seconds since the adapter was constructed
    pub uptime_seconds: u64,
}
