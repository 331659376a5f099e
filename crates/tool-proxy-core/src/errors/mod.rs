// ABOUTME: Unified error taxonomy shared by the registry, dispatcher, translator, and adapter
// ABOUTME: Defines ErrorCode, AppError, and AppResult with their JSON-RPC code mapping
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! # Unified Error Handling System
//!
//! Every failure the proxy reports is an [`AppError`]: a taxonomy code, a human
//! message, and optional structured details. The callers of the proxy are
//! programs, so the code is what they branch on; the message is for logs.
//!
//! Each [`ErrorCode`] maps to exactly one JSON-RPC numeric code so the
//! transports never need their own tables.

use std::error::Error as StdError;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::constants::errors::{
    ERROR_AMBIGUOUS_TOOL, ERROR_CONFIG, ERROR_DUPLICATE_SERVICE_NAME, ERROR_INTERNAL_ERROR,
    ERROR_INVALID_PARAMS, ERROR_INVALID_REQUEST, ERROR_INVALID_SERVICE, ERROR_MALFORMED_ARGUMENTS,
    ERROR_METHOD_NOT_FOUND, ERROR_PARSE, ERROR_SERVICE_NOT_FOUND, ERROR_TIMEOUT,
    ERROR_UNSUPPORTED_PROTOCOL_VERSION,
};

/// Error taxonomy of the proxy
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    /// Unknown method, tool, or prompt name
    MethodNotFound,
    /// Arguments failed schema validation
    InvalidParams,
    /// A bare tool or prompt name matches more than one service
    AmbiguousTool,
    /// A service with the same name is already registered
    DuplicateServiceName,
    /// Service declarations are inconsistent
    InvalidService,
    /// The service to unregister does not exist
    ServiceNotFound,
    /// A handler failed or panicked
    InternalError,
    /// A handler exceeded its execution budget
    Timeout,
    /// The declared protocol version is not supported
    UnsupportedProtocolVersion,
    /// Provider function-call arguments are not structured data
    MalformedArguments,
    /// The transport payload is not valid JSON
    ParseError,
    /// The payload is JSON but not a valid JSON-RPC request
    InvalidRequest,
    /// Startup configuration is missing or invalid
    ConfigError,
}

impl ErrorCode {
    /// JSON-RPC numeric code for this error
    #[must_use]
    pub const fn jsonrpc_code(self) -> i32 {
        match self {
            Self::MethodNotFound => ERROR_METHOD_NOT_FOUND,
            Self::InvalidParams => ERROR_INVALID_PARAMS,
            Self::AmbiguousTool => ERROR_AMBIGUOUS_TOOL,
            Self::DuplicateServiceName => ERROR_DUPLICATE_SERVICE_NAME,
            Self::InvalidService => ERROR_INVALID_SERVICE,
            Self::ServiceNotFound => ERROR_SERVICE_NOT_FOUND,
            Self::InternalError => ERROR_INTERNAL_ERROR,
            Self::Timeout => ERROR_TIMEOUT,
            Self::UnsupportedProtocolVersion => ERROR_UNSUPPORTED_PROTOCOL_VERSION,
            Self::MalformedArguments => ERROR_MALFORMED_ARGUMENTS,
            Self::ParseError => ERROR_PARSE,
            Self::InvalidRequest => ERROR_INVALID_REQUEST,
            Self::ConfigError => ERROR_CONFIG,
        }
    }

    /// Reverse lookup from a JSON-RPC numeric code
    #[must_use]
    pub const fn from_jsonrpc_code(code: i32) -> Option<Self> {
        match code {
            ERROR_METHOD_NOT_FOUND => Some(Self::MethodNotFound),
            ERROR_INVALID_PARAMS => Some(Self::InvalidParams),
            ERROR_AMBIGUOUS_TOOL => Some(Self::AmbiguousTool),
            ERROR_DUPLICATE_SERVICE_NAME => Some(Self::DuplicateServiceName),
            ERROR_INVALID_SERVICE => Some(Self::InvalidService),
            ERROR_SERVICE_NOT_FOUND => Some(Self::ServiceNotFound),
            ERROR_INTERNAL_ERROR => Some(Self::InternalError),
            ERROR_TIMEOUT => Some(Self::Timeout),
            ERROR_UNSUPPORTED_PROTOCOL_VERSION => Some(Self::UnsupportedProtocolVersion),
            ERROR_MALFORMED_ARGUMENTS => Some(Self::MalformedArguments),
            ERROR_PARSE => Some(Self::ParseError),
            ERROR_INVALID_REQUEST => Some(Self::InvalidRequest),
            ERROR_CONFIG => Some(Self::ConfigError),
            _ => None,
        }
    }

    /// Stable taxonomy name used as `data.kind` on the wire
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MethodNotFound => "MethodNotFound",
            Self::InvalidParams => "InvalidParams",
            Self::AmbiguousTool => "AmbiguousTool",
            Self::DuplicateServiceName => "DuplicateServiceName",
            Self::InvalidService => "InvalidService",
            Self::ServiceNotFound => "NotFound",
            Self::InternalError => "InternalError",
            Self::Timeout => "Timeout",
            Self::UnsupportedProtocolVersion => "UnsupportedProtocolVersion",
            Self::MalformedArguments => "MalformedArguments",
            Self::ParseError => "ParseError",
            Self::InvalidRequest => "InvalidRequest",
            Self::ConfigError => "ConfigError",
        }
    }

    /// Short description of this error class
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::MethodNotFound => "Method not found",
            Self::InvalidParams => "Invalid params",
            Self::AmbiguousTool => "Ambiguous tool name",
            Self::DuplicateServiceName => "Duplicate service name",
            Self::InvalidService => "Invalid service",
            Self::ServiceNotFound => "Service not found",
            Self::InternalError => "Internal error",
            Self::Timeout => "Handler timed out",
            Self::UnsupportedProtocolVersion => "Unsupported protocol version",
            Self::MalformedArguments => "Malformed arguments",
            Self::ParseError => "Parse error",
            Self::InvalidRequest => "Invalid request",
            Self::ConfigError => "Configuration error",
        }
    }
}

/// Unified error type for the proxy
#[derive(Debug, Error)]
#[error("{}: {message}", .code.description())]
pub struct AppError {
    /// Taxonomy code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Structured context (violated fields, colliding names, ...)
    pub details: Option<Value>,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn StdError + Send + Sync>>,
}

impl AppError {
    /// Create a new error with the given code and message
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
            source: None,
        }
    }

    /// Attach structured details
    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Add a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Unknown tool, prompt, or method
    #[must_use]
    pub fn method_not_found(name: &str) -> Self {
        Self::new(ErrorCode::MethodNotFound, format!("Unknown method or tool: {name}"))
    }

    /// Schema validation failure
    #[must_use]
    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidParams, message)
    }

    /// Handler or internal failure
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Malformed JSON-RPC request
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    /// Configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::new(ErrorCode::ParseError, error.to_string()).with_source(error)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;
