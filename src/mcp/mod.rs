// ABOUTME: MCP protocol surface: capability descriptor, wire schema, protocol adapter
// ABOUTME: Transports depend on this module; registry and dispatcher stay transport-agnostic
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

/// Capability descriptor built from configuration
pub mod capabilities;
/// Protocol adapter (method routing, version checks, batching)
pub mod protocol;
/// Typed MCP result bodies
pub mod schema;

pub use capabilities::CapabilityDescriptor;
pub use protocol::ProtocolAdapter;
pub use schema::HealthReport;
