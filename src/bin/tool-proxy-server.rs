// ABOUTME: Tool proxy server binary: loads configuration, initializes logging, runs a transport
// ABOUTME: CLI flags override environment configuration for port, base path, and transport
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

#![recursion_limit = "256"]

//! # Tool Proxy Server Binary
//!
//! Starts the proxy with the built-in services registered. HTTP is the
//! default transport; `--stdio` speaks line-delimited JSON-RPC on
//! stdin/stdout and moves logging to stderr.

use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tool_proxy::config::{ServerConfig, TransportMode};
use tool_proxy::errors::AppResult;
use tool_proxy::logging::{LogWriter, LoggingConfig};
use tool_proxy::server::ProxyServer;
use tool_proxy::services::CollisionPolicy;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "tool-proxy-server")]
#[command(about = "Tool proxy - one MCP endpoint in front of pluggable tool services")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Override bind address
    #[arg(long)]
    http_host: Option<String>,

    /// Override the path the protocol endpoint is mounted on
    #[arg(long)]
    base_path: Option<String>,

    /// Override the per-call handler budget in seconds
    #[arg(long)]
    tool_timeout_secs: Option<u64>,

    /// Override the tool-name collision policy (reject or namespace)
    #[arg(long)]
    collision_policy: Option<CollisionPolicy>,

    /// Serve line-delimited JSON-RPC over stdin/stdout instead of HTTP
    #[arg(long)]
    stdio: bool,
}

impl Args {
    fn apply(self, mut config: ServerConfig) -> AppResult<ServerConfig> {
        if let Some(http_port) = self.http_port {
            config.http_port = http_port;
        }
        if let Some(http_host) = self.http_host {
            config.http_host = http_host;
        }
        if let Some(base_path) = self.base_path {
            config.base_path = base_path;
        }
        if let Some(secs) = self.tool_timeout_secs {
            config.tool_timeout = Duration::from_secs(secs);
        }
        if let Some(policy) = self.collision_policy {
            config.collision_policy = policy;
        }
        if self.stdio {
            config.transport = TransportMode::Stdio;
        }
        config.normalized()
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = args.apply(ServerConfig::from_env()?)?;

    let writer = match config.transport {
        TransportMode::Http => LogWriter::Stdout,
        TransportMode::Stdio => LogWriter::Stderr,
    };
    LoggingConfig::from_env().with_writer(writer).init()?;

    info!(
        transport = %config.transport,
        address = %config.bind_address(),
        base_path = %config.base_path,
        timeout_secs = config.tool_timeout.as_secs(),
        "Starting tool proxy"
    );

    let server = ProxyServer::bootstrap(config).await?;
    if let Err(e) = server.run().await {
        error!(error = %e, "Tool proxy stopped with an error");
        return Err(e.into());
    }

    info!("Tool proxy stopped");
    Ok(())
}
