// ABOUTME: HTTP route organization for the proxy: protocol endpoint and health checks
// ABOUTME: Builds the axum Router with tracing, CORS, request-id, and body-limit layers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! Route module for the tool proxy
//!
//! Each domain module contains only route definitions and thin handler
//! functions that delegate to the [`ProtocolAdapter`].

/// Health check and readiness routes
pub mod health;
/// Model Context Protocol (MCP) endpoint
pub mod mcp;

use std::sync::Arc;

use axum::Router;
use http::{header::HeaderName, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::constants::headers;
use crate::mcp::ProtocolAdapter;

pub use health::HealthRoutes;
pub use mcp::McpRoutes;

/// Shared state handed to every route
pub type AppState = Arc<ProtocolAdapter>;

/// Build the complete HTTP router
#[must_use]
pub fn router(adapter: AppState) -> Router {
    let config = Arc::clone(adapter.config());
    let request_id = HeaderName::from_static(headers::REQUEST_ID);

    Router::new()
        .merge(McpRoutes::routes(&config.base_path))
        .merge(HealthRoutes::routes())
        .with_state(adapter)
        .layer(RequestBodyLimitLayer::new(config.max_request_size))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
        .layer(setup_cors())
}

/// CORS policy for browser-based MCP clients
#[must_use]
pub fn setup_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_headers([
            HeaderName::from_static("content-type"),
            HeaderName::from_static("accept"),
            HeaderName::from_static("origin"),
            HeaderName::from_static(headers::PROTOCOL_VERSION),
            HeaderName::from_static(headers::REQUEST_ID),
        ])
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
}
