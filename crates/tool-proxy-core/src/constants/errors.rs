// ABOUTME: JSON-RPC error code constants for standard and proxy-specific failures
// ABOUTME: Proxy-specific codes live in the JSON-RPC server-error range
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

/// Parse error - invalid JSON
pub const ERROR_PARSE: i32 = -32700;
/// Invalid Request - not a valid JSON-RPC request object
pub const ERROR_INVALID_REQUEST: i32 = -32600;
/// Method (or tool/prompt) not found
pub const ERROR_METHOD_NOT_FOUND: i32 = -32601;
/// Invalid params - schema validation failure
pub const ERROR_INVALID_PARAMS: i32 = -32602;
/// Internal error - handler failure
pub const ERROR_INTERNAL_ERROR: i32 = -32603;

/// Handler exceeded its execution budget
pub const ERROR_TIMEOUT: i32 = -32001;
/// Declared protocol version is not supported
pub const ERROR_UNSUPPORTED_PROTOCOL_VERSION: i32 = -32002;
/// Tool or prompt name resolves to more than one service
pub const ERROR_AMBIGUOUS_TOOL: i32 = -32003;
/// Provider function-call arguments could not be decoded
pub const ERROR_MALFORMED_ARGUMENTS: i32 = -32004;
/// A service with the same name is already registered
pub const ERROR_DUPLICATE_SERVICE_NAME: i32 = -32005;
/// Service declarations are inconsistent (tool without handler, bad schema)
pub const ERROR_INVALID_SERVICE: i32 = -32006;
/// Service to unregister does not exist
pub const ERROR_SERVICE_NOT_FOUND: i32 = -32007;
/// Configuration could not be loaded
pub const ERROR_CONFIG: i32 = -32010;
