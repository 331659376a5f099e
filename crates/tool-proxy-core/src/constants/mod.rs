// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Protocol identifiers, JSON-RPC error codes, method names, and defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! Constants module
//!
//! Constants are grouped into logical domains rather than being in a single large file.

/// JSON-RPC error codes used on the wire
pub mod errors;
/// Protocol version and server identification constants
pub mod protocol;

/// Protocol method names handled by the adapter
pub mod methods {
    /// Capability negotiation
    pub const INITIALIZE: &str = "initialize";
    /// Liveness check with empty result
    pub const PING: &str = "ping";
    /// Static service metadata probe
    pub const HEALTH: &str = "health";
    /// Tool discovery
    pub const TOOLS_LIST: &str = "tools/list";
    /// Tool invocation
    pub const TOOLS_CALL: &str = "tools/call";
    /// Prompt discovery
    pub const PROMPTS_LIST: &str = "prompts/list";
    /// Prompt retrieval
    pub const PROMPTS_GET: &str = "prompts/get";
    /// Prefix shared by all client notifications
    pub const NOTIFICATION_PREFIX: &str = "notifications/";

    /// Every request method the adapter answers, in advertisement order
    pub const SUPPORTED: &[&str] = &[
        INITIALIZE,
        PING,
        HEALTH,
        TOOLS_LIST,
        TOOLS_CALL,
        PROMPTS_LIST,
        PROMPTS_GET,
    ];
}

/// Default configuration values
pub mod defaults {
    /// Default bind address
    pub const HTTP_HOST: &str = "127.0.0.1";
    /// Default HTTP port
    pub const HTTP_PORT: u16 = 8081;
    /// Default path the protocol endpoint is mounted on
    pub const BASE_PATH: &str = "/mcp";
    /// Default per-call handler budget in seconds
    pub const TOOL_TIMEOUT_SECS: u64 = 30;
    /// Largest per-call budget the configuration accepts (one day)
    pub const MAX_TOOL_TIMEOUT_SECS: u64 = 86_400;
    /// Default maximum HTTP request body in bytes
    pub const MAX_REQUEST_SIZE: usize = 1_048_576;
    /// Default server name reported in initialize and health responses
    pub const SERVER_NAME: &str = "tool-proxy";
    /// Default server description
    pub const SERVER_DESCRIPTION: &str =
        "Aggregating proxy exposing pluggable tool services over one protocol endpoint";
}

/// HTTP header names used by the transport
pub mod headers {
    /// Header a client uses to declare the negotiated protocol version
    pub const PROTOCOL_VERSION: &str = "mcp-protocol-version";
    /// Request correlation header
    pub const REQUEST_ID: &str = "x-request-id";
}

/// Separator between service and tool in a qualified name (`service.tool`)
pub const QUALIFIED_NAME_SEPARATOR: char = '.';
