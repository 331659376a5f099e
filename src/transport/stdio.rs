// ABOUTME: Stdio transport reading one JSON-RPC payload per line
// ABOUTME: Each line runs on its own task; responses go through a shared writer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! # Stdio Transport
//!
//! Stdout is the protocol channel, so logging must go to stderr when this
//! transport is active. Lines are dispatched concurrently; responses may be
//! written in a different order than requests arrived, which JSON-RPC ids
//! account for.

use std::sync::Arc;

use serde_json::Value;
use tokio::io::{
    stdin, stdout, AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader,
};
use tokio::sync::Mutex;
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, error, info, warn};

use crate::errors::{AppError, AppResult};
use crate::mcp::ProtocolAdapter;

/// Serve the adapter over the process's stdin and stdout until stdin closes
///
/// # Errors
///
/// Returns an error if stdin cannot be read
pub async fn serve_stdio(adapter: Arc<ProtocolAdapter>) -> AppResult<()> {
    info!("Starting stdio transport");
    serve_lines(adapter, BufReader::new(stdin()), stdout()).await
}

/// Serve the adapter over an arbitrary line reader and writer
///
/// Returns once the reader reaches end of input and every in-flight line
/// has been answered.
///
/// # Errors
///
/// Returns an error if the reader fails
pub async fn serve_lines<R, W>(adapter: Arc<ProtocolAdapter>, reader: R, writer: W) -> AppResult<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let writer = Arc::new(Mutex::new(writer));
    let mut lines = reader.lines();
    let mut in_flight = JoinSet::new();
    let mut received = 0_u64;

    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|e| AppError::internal(format!("Failed to read input: {e}")).with_source(e))?
    {
        if line.trim().is_empty() {
            continue;
        }
        received += 1;

        let adapter = Arc::clone(&adapter);
        let writer = Arc::clone(&writer);
        in_flight.spawn(async move {
            if let Some(response) = adapter.handle_payload(line.as_bytes(), None).await {
                write_response(&writer, &response).await;
            }
        });

        while let Some(finished) = in_flight.try_join_next() {
            log_task_result(finished);
        }
    }

    debug!(lines = received, "Input closed, draining in-flight requests");
    while let Some(finished) = in_flight.join_next().await {
        log_task_result(finished);
    }
    info!(lines = received, "Stdio transport stopped");
    Ok(())
}

async fn write_response<W>(writer: &Mutex<W>, response: &Value)
where
    W: AsyncWrite + Unpin,
{
    let mut line = match serde_json::to_vec(response) {
        Ok(bytes) => bytes,
        Err(e) => {
            error!(error = %e, "Failed to serialize response");
            return;
        }
    };
    line.push(b'\n');

    let mut writer = writer.lock().await;
    if let Err(e) = writer.write_all(&line).await {
        warn!(error = %e, "Failed to write response");
        return;
    }
    if let Err(e) = writer.flush().await {
        warn!(error = %e, "Failed to flush response");
    }
}

fn log_task_result(result: Result<(), JoinError>) {
    if let Err(e) = result {
        error!(error = %e, "Request task failed");
    }
}
