// ABOUTME: Protocol constants for version and server identification
// ABOUTME: Pure compile-time constants without runtime configuration dependencies
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! Protocol constants for MCP and JSON-RPC
//!
//! Runtime-configurable protocol values (advertised version, accepted versions)
//! live in the main crate's configuration; these are the compiled-in defaults.

/// JSON-RPC version (standard, not configurable)
pub const JSONRPC_VERSION: &str = "2.0";

/// Server version from Cargo.toml
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Protocol version advertised when none is configured
pub const DEFAULT_PROTOCOL_VERSION: &str = "2025-06-18";

/// Protocol versions accepted when none are configured, newest first
pub const DEFAULT_SUPPORTED_VERSIONS: &[&str] = &["2025-06-18", "2025-03-26", "2024-11-05"];
