// ABOUTME: Health check route handlers for liveness and readiness probes
// ABOUTME: Returns the static capability descriptor plus live registry counts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! Health check routes for service monitoring

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde_json::{json, Value};

use crate::mcp::HealthReport;

use super::AppState;

/// Health routes implementation
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create all health check routes
    pub fn routes() -> Router<AppState> {
        Router::new()
            .route("/health", get(Self::health_handler))
            .route("/ready", get(Self::ready_handler))
    }

    async fn health_handler(State(adapter): State<AppState>) -> Json<HealthReport> {
        Json(adapter.health().await)
    }

    /// Ready once at least one service is registered
    async fn ready_handler(State(adapter): State<AppState>) -> (StatusCode, Json<Value>) {
        let services = adapter.registry().service_count().await;
        let status = if services > 0 {
            StatusCode::OK
        } else {
            StatusCode::SERVICE_UNAVAILABLE
        };
        (
            status,
            Json(json!({
                "status": if services > 0 { "ready" } else { "not_ready" },
                "services": services,
                "timestamp": Utc::now().to_rfc3339(),
            })),
        )
    }
}
