// ABOUTME: Tests for environment-driven server configuration
// ABOUTME: Validates defaults, overrides, version folding, and rejection of invalid values
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use std::env;
use std::time::Duration;

use serial_test::serial;
use tool_proxy::config::{ServerConfig, TransportMode};
use tool_proxy::errors::ErrorCode;
use tool_proxy::services::CollisionPolicy;

const VARS: &[&str] = &[
    "HTTP_HOST",
    "HTTP_PORT",
    "MCP_BASE_PATH",
    "TOOL_TIMEOUT_SECS",
    "MCP_PROTOCOL_VERSION",
    "MCP_SUPPORTED_PROTOCOL_VERSIONS",
    "SERVER_NAME",
    "SERVER_DESCRIPTION",
    "TOOL_COLLISION_POLICY",
    "MCP_TRANSPORT",
    "MCP_MAX_REQUEST_SIZE",
];

fn clear_env() {
    for var in VARS {
        env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_defaults_without_environment() {
    clear_env();
    let config = ServerConfig::from_env().unwrap();

    assert_eq!(config.http_host, "127.0.0.1");
    assert_eq!(config.http_port, 8081);
    assert_eq!(config.base_path, "/mcp");
    assert_eq!(config.tool_timeout, Duration::from_secs(30));
    assert_eq!(config.protocol_version, "2025-06-18");
    assert_eq!(config.collision_policy, CollisionPolicy::Reject);
    assert_eq!(config.transport, TransportMode::Http);
    assert_eq!(config.bind_address(), "127.0.0.1:8081");
}

#[test]
#[serial]
fn test_environment_overrides() {
    clear_env();
    env::set_var("HTTP_PORT", "9090");
    env::set_var("MCP_BASE_PATH", "/rpc/");
    env::set_var("TOOL_TIMEOUT_SECS", "5");
    env::set_var("TOOL_COLLISION_POLICY", "Namespace");
    env::set_var("MCP_TRANSPORT", "stdio");
    env::set_var("SERVER_NAME", "gateway");

    let config = ServerConfig::from_env().unwrap();
    clear_env();

    assert_eq!(config.http_port, 9090);
    assert_eq!(config.base_path, "/rpc");
    assert_eq!(config.tool_timeout, Duration::from_secs(5));
    assert_eq!(config.collision_policy, CollisionPolicy::Namespace);
    assert_eq!(config.transport, TransportMode::Stdio);
    assert_eq!(config.server_name, "gateway");
}

#[test]
#[serial]
fn test_advertised_version_always_supported() {
    clear_env();
    env::set_var("MCP_PROTOCOL_VERSION", "2099-12-31");
    env::set_var("MCP_SUPPORTED_PROTOCOL_VERSIONS", "2025-06-18, 2025-03-26");

    let config = ServerConfig::from_env().unwrap();
    clear_env();

    assert_eq!(
        config.supported_protocol_versions,
        vec!["2099-12-31", "2025-06-18", "2025-03-26"]
    );
    assert!(!config.supports_protocol_version("2024-11-05"));
}

#[test]
#[serial]
fn test_invalid_port_is_config_error() {
    clear_env();
    env::set_var("HTTP_PORT", "eighty");
    let err = ServerConfig::from_env().unwrap_err();
    clear_env();

    assert_eq!(err.code, ErrorCode::ConfigError);
    assert!(err.message.contains("HTTP_PORT"));
}

#[test]
#[serial]
fn test_invalid_policy_is_config_error() {
    clear_env();
    env::set_var("TOOL_COLLISION_POLICY", "first-wins");
    let err = ServerConfig::from_env().unwrap_err();
    clear_env();

    assert_eq!(err.code, ErrorCode::ConfigError);
}

#[test]
#[serial]
fn test_zero_timeout_rejected() {
    clear_env();
    env::set_var("TOOL_TIMEOUT_SECS", "0");
    let err = ServerConfig::from_env().unwrap_err();
    clear_env();

    assert_eq!(err.code, ErrorCode::ConfigError);
}

#[test]
#[serial]
fn test_oversized_timeout_rejected() {
    clear_env();
    env::set_var("TOOL_TIMEOUT_SECS", "18446744073709551615");
    let err = ServerConfig::from_env().unwrap_err();
    clear_env();

    assert_eq!(err.code, ErrorCode::ConfigError);
    assert!(err.message.contains("maximum"));
}

#[test]
fn test_timeout_at_maximum_accepted() {
    let config = ServerConfig {
        tool_timeout: Duration::from_secs(86_400),
        ..ServerConfig::default()
    }
    .normalized()
    .unwrap();
    assert_eq!(config.tool_timeout, Duration::from_secs(86_400));
}

#[test]
fn test_relative_base_path_rejected() {
    let err = ServerConfig {
        base_path: "mcp".to_owned(),
        ..ServerConfig::default()
    }
    .normalized()
    .unwrap_err();
    assert_eq!(err.code, ErrorCode::ConfigError);
}
