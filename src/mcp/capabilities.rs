// ABOUTME: Process-wide capability descriptor returned on negotiation and health checks
// ABOUTME: Built once from ServerConfig and read-only afterwards
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use serde::{Deserialize, Serialize};

use crate::config::ServerConfig;
use crate::constants::{methods, protocol::SERVER_VERSION};

use super::schema::{
    InitializeResponse, PromptsCapability, ServerCapabilities, ServerInfo, ToolsCapability,
};

/// Protocol version, supported methods, and server identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilityDescriptor {
    /// Server identity
    pub server_info: ServerInfo,
    /// Human-readable description
    pub description: String,
    /// Advertised protocol version
    pub protocol_version: String,
    /// Every version the server accepts
    pub supported_protocol_versions: Vec<String>,
    /// Request methods the server answers
    pub supported_methods: Vec<String>,
    /// MCP capability flags
    pub capabilities: ServerCapabilities,
}

impl CapabilityDescriptor {
    /// Build the descriptor from startup configuration
    #[must_use]
    pub fn from_config(config: &ServerConfig) -> Self {
        Self {
            server_info: ServerInfo {
                name: config.server_name.clone(),
                version: SERVER_VERSION.to_owned(),
            },
            description: config.server_description.clone(),
            protocol_version: config.protocol_version.clone(),
            supported_protocol_versions: config.supported_protocol_versions.clone(),
            supported_methods: methods::SUPPORTED.iter().map(|m| (*m).to_owned()).collect(),
            capabilities: ServerCapabilities {
                prompts: Some(PromptsCapability {
                    list_changed: Some(false),
                }),
                tools: Some(ToolsCapability {
                    list_changed: Some(false),
                }),
            },
        }
    }

    /// Whether `version` is in the accepted set
    #[must_use]
    pub fn supports(&self, version: &str) -> bool {
        self.supported_protocol_versions.iter().any(|v| v == version)
    }

    /// `initialize` result for an accepted client version
    #[must_use]
    pub fn initialize_response(&self, negotiated_version: &str) -> InitializeResponse {
        InitializeResponse {
            protocol_version: negotiated_version.to_owned(),
            server_info: self.server_info.clone(),
            capabilities: self.capabilities.clone(),
            instructions: Some(self.description.clone()),
        }
    }
}
