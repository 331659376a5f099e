// ABOUTME: Pluggable service model: a named bundle of tools, handlers, and prompts
// ABOUTME: Hosts the ServiceRegistry and the built-in services registered at startup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! # Services
//!
//! A [`Service`] is the unit of pluggable registration: a globally unique
//! name, an array of tool descriptors, one handler per tool, and optional
//! prompt descriptors. External teams add capabilities by building a
//! `Service` and handing it to the [`ServiceRegistry`].
//!
//! ```rust
//! use serde_json::Value;
//! use tool_proxy::services::Service;
//! use tool_proxy::tools::{handler_fn, Tool, ToolOutput};
//! use tool_proxy::validation::SchemaNode;
//!
//! let service = Service::builder("weather")
//!     .description("Forecast lookups")
//!     .tool(
//!         Tool::new("forecast", "Forecast for a city", SchemaNode::object()
//!             .required_property("city", SchemaNode::string())),
//!         handler_fn(|_args: Value, _ctx| async { Ok(ToolOutput::text("sunny")) }),
//!     )
//!     .build();
//! assert!(service.problems().is_empty());
//! ```

/// Built-in services registered at startup
pub mod builtin;
/// Process-wide service registry
pub mod registry;

use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::constants::QUALIFIED_NAME_SEPARATOR;
use crate::tools::{Handler, Prompt, Tool};

pub use registry::{
    CollisionPolicy, ListedPrompt, ListedTool, ResolvedPrompt, ResolvedTool, ServiceRegistry,
    ServiceSummary,
};

/// A named bundle of tools, their handlers, and prompts
pub struct Service {
    name: String,
    description: String,
    tools: Vec<Tool>,
    handlers: HashMap<String, Handler>,
    prompts: Vec<Prompt>,
}

impl Service {
    /// Start building a service
    #[must_use]
    pub fn builder(name: impl Into<String>) -> ServiceBuilder {
        ServiceBuilder {
            service: Self {
                name: name.into(),
                description: String::new(),
                tools: Vec::new(),
                handlers: HashMap::new(),
                prompts: Vec::new(),
            },
        }
    }

    /// Assemble a service from independently built parts
    ///
    /// Nothing is checked here; the registry rejects inconsistent parts with
    /// `InvalidService`.
    #[must_use]
    pub fn from_parts(
        name: impl Into<String>,
        tools: Vec<Tool>,
        handlers: HashMap<String, Handler>,
        prompts: Vec<Prompt>,
    ) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            tools,
            handlers,
            prompts,
        }
    }

    /// Globally unique service name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Human-readable description
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Tool descriptors, in declaration order
    #[must_use]
    pub fn tools(&self) -> &[Tool] {
        &self.tools
    }

    /// Prompt descriptors, in declaration order
    #[must_use]
    pub fn prompts(&self) -> &[Prompt] {
        &self.prompts
    }

    /// Handler for a declared tool
    #[must_use]
    pub fn handler(&self, tool: &str) -> Option<&Handler> {
        self.handlers.get(tool)
    }

    /// Consistency problems that make this service unregistrable
    ///
    /// Checks that names are non-empty and free of the qualified-name
    /// separator, that names are unique within the service, that tools and
    /// handlers pair up exactly, and that every input schema is well formed.
    #[must_use]
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        check_name("service", &self.name, &mut problems);

        let mut tool_names = HashSet::new();
        for tool in &self.tools {
            check_name("tool", &tool.name, &mut problems);
            if !tool_names.insert(tool.name.as_str()) {
                problems.push(format!("tool '{}' is declared more than once", tool.name));
            }
            if !self.handlers.contains_key(&tool.name) {
                problems.push(format!("tool '{}' has no handler", tool.name));
            }
            for problem in tool.input_schema.structural_problems() {
                problems.push(format!("tool '{}' input schema: {problem}", tool.name));
            }
        }

        let mut orphans: Vec<&String> = self
            .handlers
            .keys()
            .filter(|name| !tool_names.contains(name.as_str()))
            .collect();
        orphans.sort();
        for name in orphans {
            problems.push(format!("handler '{name}' has no tool declaration"));
        }

        let mut prompt_names = HashSet::new();
        for prompt in &self.prompts {
            check_name("prompt", &prompt.name, &mut problems);
            if !prompt_names.insert(prompt.name.as_str()) {
                problems.push(format!("prompt '{}' is declared more than once", prompt.name));
            }
            for problem in prompt.input_schema.structural_problems() {
                problems.push(format!("prompt '{}' input schema: {problem}", prompt.name));
            }
        }

        problems
    }
}

fn check_name(what: &str, name: &str, problems: &mut Vec<String>) {
    if name.trim().is_empty() {
        problems.push(format!("{what} name must not be empty"));
    } else if name.contains(QUALIFIED_NAME_SEPARATOR) {
        problems.push(format!(
            "{what} name '{name}' must not contain '{QUALIFIED_NAME_SEPARATOR}'"
        ));
    }
}

impl fmt::Debug for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Service")
            .field("name", &self.name)
            .field(
                "tools",
                &self.tools.iter().map(|t| t.name.as_str()).collect::<Vec<_>>(),
            )
            .field(
                "prompts",
                &self.prompts.iter().map(|p| p.name.as_str()).collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}

/// Builder pairing every tool with its handler
pub struct ServiceBuilder {
    service: Service,
}

impl ServiceBuilder {
    /// Set the description
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.service.description = description.into();
        self
    }

    /// Declare a tool together with its handler
    #[must_use]
    pub fn tool(mut self, tool: Tool, handler: Handler) -> Self {
        self.service.handlers.insert(tool.name.clone(), handler);
        self.service.tools.push(tool);
        self
    }

    /// Declare a prompt template
    #[must_use]
    pub fn prompt(mut self, prompt: Prompt) -> Self {
        self.service.prompts.push(prompt);
        self
    }

    /// Finish building
    #[must_use]
    pub fn build(self) -> Service {
        self.service
    }
}
