// ABOUTME: MCP route handler accepting JSON-RPC payloads over HTTP POST
// ABOUTME: Reads the protocol-version header and answers 202 for notification-only payloads
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! MCP protocol routes

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use tracing::debug;

use crate::constants::headers;

use super::AppState;

/// MCP routes implementation
pub struct McpRoutes;

impl McpRoutes {
    /// Mount the protocol endpoint at `base_path`
    pub fn routes(base_path: &str) -> Router<AppState> {
        Router::new().route(base_path, post(Self::handle_mcp_request))
    }

    async fn handle_mcp_request(
        State(adapter): State<AppState>,
        request_headers: HeaderMap,
        body: Bytes,
    ) -> Response {
        // A header that is not valid UTF-8 is still a declaration, just an unsupported one
        let declared_version = request_headers
            .get(headers::PROTOCOL_VERSION)
            .map(|value| value.to_str().unwrap_or_default());

        debug!(
            body_bytes = body.len(),
            protocol_version = declared_version.unwrap_or("-"),
            "MCP request"
        );

        match adapter.handle_payload(&body, declared_version).await {
            Some(response) => (StatusCode::OK, Json(response)).into_response(),
            None => StatusCode::ACCEPTED.into_response(),
        }
    }
}
