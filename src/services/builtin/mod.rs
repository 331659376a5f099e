// ABOUTME: Built-in services registered by the server's explicit init step
// ABOUTME: demo (echo, add-numbers, summarize) and system (list-services)
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use std::sync::Arc;

use super::{Service, ServiceRegistry};

/// Example tools and prompt
pub mod demo;
/// Registry introspection
pub mod system;

/// Services the server registers at startup, in registration order
#[must_use]
pub fn default_services(registry: &Arc<ServiceRegistry>) -> Vec<Service> {
    vec![demo::service(), system::service(registry)]
}
