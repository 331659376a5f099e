// ABOUTME: Per-invocation context handed to every tool handler
// ABOUTME: Carries request correlation, the deadline, and a cancellation token
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! # Invocation Context
//!
//! The dispatcher builds one [`InvocationContext`] per call. Handlers that do
//! long-running work should watch [`InvocationContext::cancelled`]: when the
//! budget runs out the dispatcher cancels the token before abandoning the task.

use std::fmt;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Context provided to every handler invocation
#[derive(Clone)]
pub struct InvocationContext {
    /// Correlation id for logs; the JSON-RPC id when one was supplied
    pub request_id: String,
    /// Owning service
    pub service: String,
    /// Tool or prompt name as declared by the service
    pub tool: String,
    /// Point in time after which the result is no longer awaited
    pub deadline: Instant,
    /// Cancelled when the deadline passes or the caller goes away
    pub cancellation: CancellationToken,
}

impl InvocationContext {
    /// Create a context with a fresh request id and the given budget
    #[must_use]
    pub fn new(service: impl Into<String>, tool: impl Into<String>, budget: Duration) -> Self {
        Self {
            request_id: Uuid::new_v4().to_string(),
            service: service.into(),
            tool: tool.into(),
            deadline: deadline_after(budget),
            cancellation: CancellationToken::new(),
        }
    }

    /// Set request ID for tracing
    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = request_id.into();
        self
    }

    /// Time left before the deadline
    #[must_use]
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    /// Whether the invocation has been cancelled
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    /// Resolves once the invocation is cancelled
    pub async fn cancelled(&self) {
        self.cancellation.cancelled().await;
    }
}

/// Roughly thirty years, the same horizon tokio uses for "never"
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// `now + budget`, clamped so an oversized budget cannot overflow `Instant`
fn deadline_after(budget: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(budget.min(FAR_FUTURE)).unwrap_or(now)
}

impl fmt::Debug for InvocationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InvocationContext")
            .field("request_id", &self.request_id)
            .field("service", &self.service)
            .field("tool", &self.tool)
            .field("remaining_ms", &self.remaining().as_millis())
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}
