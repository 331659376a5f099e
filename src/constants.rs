// ABOUTME: Re-exports protocol constants, error codes, and defaults from the core crate
// ABOUTME: Adds environment variable names read by the configuration loader
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! # Constants Module
//!
//! Compile-time constants live in `tool_proxy_core::constants`; this module
//! re-exports them and names the environment variables the proxy reads.

pub use tool_proxy_core::constants::{
    defaults, errors, headers, methods, protocol, QUALIFIED_NAME_SEPARATOR,
};

/// Environment variable names
pub mod env_vars {
    /// Bind address
    pub const HTTP_HOST: &str = "HTTP_HOST";
    /// Bind port
    pub const HTTP_PORT: &str = "HTTP_PORT";
    /// Path the protocol endpoint is mounted on
    pub const BASE_PATH: &str = "MCP_BASE_PATH";
    /// Per-call handler budget in seconds
    pub const TOOL_TIMEOUT_SECS: &str = "TOOL_TIMEOUT_SECS";
    /// Advertised protocol version
    pub const PROTOCOL_VERSION: &str = "MCP_PROTOCOL_VERSION";
    /// Comma-separated accepted protocol versions
    pub const SUPPORTED_PROTOCOL_VERSIONS: &str = "MCP_SUPPORTED_PROTOCOL_VERSIONS";
    /// Server name
    pub const SERVER_NAME: &str = "SERVER_NAME";
    /// Server description
    pub const SERVER_DESCRIPTION: &str = "SERVER_DESCRIPTION";
    /// `reject` or `namespace`
    pub const COLLISION_POLICY: &str = "TOOL_COLLISION_POLICY";
    /// `http` or `stdio`
    pub const TRANSPORT: &str = "MCP_TRANSPORT";
    /// HTTP body limit in bytes
    pub const MAX_REQUEST_SIZE: &str = "MCP_MAX_REQUEST_SIZE";
}
