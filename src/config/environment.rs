// ABOUTME: Environment configuration for the proxy process
// ABOUTME: Parses bind address, base path, timeouts, protocol versions, and collision policy
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! Environment-based configuration loaded once at startup

use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::constants::{defaults, env_vars, protocol};
use crate::errors::{AppError, AppResult};
use crate::services::CollisionPolicy;

/// Transport the proxy serves the protocol over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    /// JSON-RPC over HTTP POST
    #[default]
    Http,
    /// Line-delimited JSON-RPC over stdin/stdout
    Stdio,
}

impl FromStr for TransportMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "http" => Ok(Self::Http),
            "stdio" => Ok(Self::Stdio),
            other => Err(AppError::config(format!(
                "Invalid transport '{other}' (expected 'http' or 'stdio')"
            ))),
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http => write!(f, "http"),
            Self::Stdio => write!(f, "stdio"),
        }
    }
}

/// Process-wide configuration, read-only after startup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address
    pub http_host: String,
    /// Bind port
    pub http_port: u16,
    /// Path the protocol endpoint is mounted on
    pub base_path: String,
    /// Per-call handler budget
    pub tool_timeout: Duration,
    /// Advertised protocol version
    pub protocol_version: String,
    /// Accepted protocol versions; always contains `protocol_version`
    pub supported_protocol_versions: Vec<String>,
    /// Server name reported in initialize and health responses
    pub server_name: String,
    /// Server description
    pub server_description: String,
    /// How the registry treats tool names declared by more than one service
    pub collision_policy: CollisionPolicy,
    /// Transport to serve
    pub transport: TransportMode,
    /// HTTP body limit in bytes
    pub max_request_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_host: defaults::HTTP_HOST.to_owned(),
            http_port: defaults::HTTP_PORT,
            base_path: defaults::BASE_PATH.to_owned(),
            tool_timeout: Duration::from_secs(defaults::TOOL_TIMEOUT_SECS),
            protocol_version: protocol::DEFAULT_PROTOCOL_VERSION.to_owned(),
            supported_protocol_versions: protocol::DEFAULT_SUPPORTED_VERSIONS
                .iter()
                .map(|v| (*v).to_owned())
                .collect(),
            server_name: defaults::SERVER_NAME.to_owned(),
            server_description: defaults::SERVER_DESCRIPTION.to_owned(),
            collision_policy: CollisionPolicy::default(),
            transport: TransportMode::default(),
            max_request_size: defaults::MAX_REQUEST_SIZE,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if any variable is present but invalid
    pub fn from_env() -> AppResult<Self> {
        info!("Loading configuration from environment variables");

        let protocol_version = env_var_or(
            env_vars::PROTOCOL_VERSION,
            protocol::DEFAULT_PROTOCOL_VERSION,
        );
        let supported_protocol_versions = env::var(env_vars::SUPPORTED_PROTOCOL_VERSIONS)
            .map_or_else(
                |_| {
                    protocol::DEFAULT_SUPPORTED_VERSIONS
                        .iter()
                        .map(|v| (*v).to_owned())
                        .collect()
                },
                |raw| parse_version_list(&raw),
            );

        let config = Self {
            http_host: env_var_or(env_vars::HTTP_HOST, defaults::HTTP_HOST),
            http_port: parse_env(env_vars::HTTP_PORT, defaults::HTTP_PORT)?,
            base_path: env_var_or(env_vars::BASE_PATH, defaults::BASE_PATH),
            tool_timeout: Duration::from_secs(parse_env(
                env_vars::TOOL_TIMEOUT_SECS,
                defaults::TOOL_TIMEOUT_SECS,
            )?),
            protocol_version,
            supported_protocol_versions,
            server_name: env_var_or(env_vars::SERVER_NAME, defaults::SERVER_NAME),
            server_description: env_var_or(
                env_vars::SERVER_DESCRIPTION,
                defaults::SERVER_DESCRIPTION,
            ),
            collision_policy: parse_env(env_vars::COLLISION_POLICY, CollisionPolicy::default())?,
            transport: parse_env(env_vars::TRANSPORT, TransportMode::default())?,
            max_request_size: parse_env(env_vars::MAX_REQUEST_SIZE, defaults::MAX_REQUEST_SIZE)?,
        }
        .normalized()?;

        debug!(
            http_port = config.http_port,
            base_path = %config.base_path,
            protocol_version = %config.protocol_version,
            collision_policy = %config.collision_policy,
            transport = %config.transport,
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Validate the configuration and fold the advertised version into the supported set
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` on an empty protocol version, a zero or oversized
    /// timeout, or a base path that does not start with `/`
    pub fn normalized(mut self) -> AppResult<Self> {
        if self.protocol_version.trim().is_empty() {
            return Err(AppError::config("Protocol version must not be empty"));
        }
        if self.tool_timeout.is_zero() {
            return Err(AppError::config("Tool timeout must be greater than zero"));
        }
        if self.tool_timeout > Duration::from_secs(defaults::MAX_TOOL_TIMEOUT_SECS) {
            return Err(AppError::config(format!(
                "Tool timeout of {}s exceeds the {}s maximum",
                self.tool_timeout.as_secs(),
                defaults::MAX_TOOL_TIMEOUT_SECS
            )));
        }
        if !self.base_path.starts_with('/') {
            return Err(AppError::config(format!(
                "Base path '{}' must start with '/'",
                self.base_path
            )));
        }
        if self.base_path.len() > 1 && self.base_path.ends_with('/') {
            self.base_path.pop();
        }
        if !self.supports_protocol_version(&self.protocol_version) {
            self.supported_protocol_versions
                .insert(0, self.protocol_version.clone());
        }
        Ok(self)
    }

    /// Whether a client-declared protocol version is accepted
    #[must_use]
    pub fn supports_protocol_version(&self, version: &str) -> bool {
        self.supported_protocol_versions.iter().any(|v| v == version)
    }

    /// `host:port` string the HTTP listener binds to
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.http_host, self.http_port)
    }
}

fn parse_version_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Parse an environment variable, using the default when unset
fn parse_env<T>(key: &str, default: T) -> AppResult<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::config(format!("Invalid {key} value '{raw}': {e}"))),
        Err(_) => Ok(default),
    }
}

/// Get environment variable or default value
fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}
