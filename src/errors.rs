// ABOUTME: Re-exports the unified error taxonomy from the core crate
// ABOUTME: Keeps `crate::errors::*` paths stable for every module of the proxy
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! # Unified Error Handling System
//!
//! The error types live in `tool_proxy_core` so that every layer shares one
//! taxonomy. This module re-exports them under the familiar path.

pub use tool_proxy_core::errors::{AppError, AppResult, ErrorCode};
