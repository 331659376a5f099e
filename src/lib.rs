// ABOUTME: Main library entry point for the tool proxy
// ABOUTME: Aggregates pluggable tool services behind one MCP-compatible JSON-RPC endpoint
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

#![recursion_limit = "256"]
#![deny(unsafe_code)]

//! # Tool Proxy
//!
//! A gateway that aggregates independently-authored services, each exposing
//! a set of callable tools and optional prompt templates, behind a single
//! JSON-RPC endpoint speaking the Model Context Protocol.
//!
//! ## Architecture
//!
//! Requests flow `transport → protocol adapter → dispatcher → (validator →
//! registry lookup → handler) → protocol adapter → transport`:
//!
//! - **validation**: structural JSON-schema checks reporting every violation
//! - **tools**: tool and prompt descriptors, the `Invocable` handler seam
//! - **services**: the pluggable service model and the `ServiceRegistry`
//! - **dispatcher**: resolve, validate, and execute with isolation and timeouts
//! - **translator**: LLM provider function calls to `ToolCallRequest`
//! - **mcp**: capability descriptor and the protocol adapter
//! - **routes** / **transport**: HTTP and stdio framing
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tool_proxy::config::ServerConfig;
//! use tool_proxy::errors::AppResult;
//! use tool_proxy::mcp::ProtocolAdapter;
//! use tool_proxy::services::{builtin, ServiceRegistry};
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let config = ServerConfig::from_env()?;
//!     let registry = Arc::new(ServiceRegistry::new(config.collision_policy));
//!     registry.initialize(builtin::default_services(&registry)).await?;
//!     let adapter = ProtocolAdapter::new(Arc::new(config), registry);
//!     println!("{} tools registered", adapter.registry().list_tools().await.len());
//!     Ok(())
//! }
//! ```

/// Orchestration client submitting tool calls to a running proxy
pub mod client;

/// Environment-based server configuration
pub mod config;

/// Re-exported constants from the core crate
pub mod constants;

/// Resolve, validate, and execute tool calls with isolation and timeouts
pub mod dispatcher;

/// Unified error handling (re-exported from the core crate)
pub mod errors;

/// JSON-RPC 2.0 framing types
pub mod jsonrpc;

/// Structured logging setup
pub mod logging;

/// Model Context Protocol adapter and capability descriptor
pub mod mcp;

/// HTTP routes for the protocol endpoint and health probe
pub mod routes;

/// Server lifecycle: startup, transports, graceful shutdown
pub mod server;

/// Service model, registry, and built-in services
pub mod services;

/// Tool and prompt descriptors, handler traits, invocation context
pub mod tools;

/// Conversion of LLM provider function calls into tool-call requests
pub mod translator;

/// Line-delimited stdio transport
pub mod transport;

/// Structural JSON-schema validation
pub mod validation;
