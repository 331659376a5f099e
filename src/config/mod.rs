// ABOUTME: Configuration management module for server settings
// ABOUTME: Environment-first configuration loaded once at startup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! Configuration module for the tool proxy
//!
//! - **Environment**: Server configuration from environment variables

/// Environment and server configuration
pub mod environment;

pub use environment::{ServerConfig, TransportMode};
