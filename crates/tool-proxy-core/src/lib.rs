// ABOUTME: Core types and constants for the tool proxy
// ABOUTME: Foundation crate with the error taxonomy and protocol constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

#![deny(unsafe_code)]

//! # Tool Proxy Core
//!
//! Foundation crate shared by every layer of the tool proxy. It is designed to
//! change infrequently, enabling incremental compilation benefits in the workspace.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError` and `ErrorCode`
//! - **constants**: Protocol identifiers, JSON-RPC error codes, and defaults

/// Unified error handling with the proxy error taxonomy
pub mod errors;

/// Protocol, error-code, and default-value constants organized by domain
pub mod constants;
