// ABOUTME: Non-HTTP transports for the protocol adapter
// ABOUTME: Currently line-delimited JSON-RPC over stdio
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

/// Line-delimited JSON-RPC over any async reader/writer pair
pub mod stdio;

pub use stdio::{serve_lines, serve_stdio};
