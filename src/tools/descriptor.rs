// ABOUTME: Immutable tool and prompt descriptors published by services
// ABOUTME: Carries per-tool behavior hints exposed to clients as MCP annotations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! # Tool and Prompt Descriptors
//!
//! Value types a service publishes about itself. They never change after
//! the service is built; the registry hands out clones of them in discovery
//! responses.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::validation::SchemaNode;

bitflags! {
    /// Behavior hints clients use for trust decisions.
    ///
    /// Published on the wire as MCP `annotations`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct ToolHints: u8 {
        /// Tool does not modify its environment
        const READ_ONLY = 0b0001;
        /// Tool talks to an open set of external systems
        const OPEN_WORLD = 0b0010;
        /// Tool may perform destructive updates
        const DESTRUCTIVE = 0b0100;
        /// Repeating a call with the same arguments has no further effect
        const IDEMPOTENT = 0b1000;
    }
}

impl ToolHints {
    /// Wire form of the hints
    #[must_use]
    pub const fn annotations(self) -> ToolAnnotations {
        ToolAnnotations {
            read_only_hint: self.contains(Self::READ_ONLY),
            open_world_hint: self.contains(Self::OPEN_WORLD),
            destructive_hint: self.contains(Self::DESTRUCTIVE),
            idempotent_hint: self.contains(Self::IDEMPOTENT),
        }
    }

    /// Get a description of all enabled hints for logging
    #[must_use]
    pub fn describe(self) -> String {
        let parts: Vec<&str> = self.iter_names().map(|(name, _)| name).collect();
        if parts.is_empty() {
            "none".to_owned()
        } else {
            parts.join(", ")
        }
    }
}

/// MCP tool annotations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolAnnotations {
    /// Tool does not modify its environment
    pub read_only_hint: bool,
    /// Tool interacts with external systems
    pub open_world_hint: bool,
    /// Tool may perform destructive updates
    pub destructive_hint: bool,
    /// Repeated calls have no additional effect
    pub idempotent_hint: bool,
}

impl From<ToolAnnotations> for ToolHints {
    fn from(annotations: ToolAnnotations) -> Self {
        let mut hints = Self::empty();
        hints.set(Self::READ_ONLY, annotations.read_only_hint);
        hints.set(Self::OPEN_WORLD, annotations.open_world_hint);
        hints.set(Self::DESTRUCTIVE, annotations.destructive_hint);
        hints.set(Self::IDEMPOTENT, annotations.idempotent_hint);
        hints
    }
}

/// A named, schema-described callable action
#[derive(Debug, Clone, PartialEq)]
pub struct Tool {
    /// Name, unique within its service
    pub name: String,
    /// What the tool does
    pub description: String,
    /// Arguments schema; the root is always an object schema
    pub input_schema: SchemaNode,
    /// Behavior hints
    pub hints: ToolHints,
}

impl Tool {
    /// Create a tool descriptor with no hints
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: SchemaNode,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
            hints: ToolHints::empty(),
        }
    }

    /// Set behavior hints
    #[must_use]
    pub const fn with_hints(mut self, hints: ToolHints) -> Self {
        self.hints = hints;
        self
    }
}

/// A named, schema-described instruction template
///
/// The template may reference arguments as `{{name}}`.
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    /// Name, unique within its service
    pub name: String,
    /// Short display title
    pub title: String,
    /// What the prompt is for
    pub description: String,
    /// Arguments schema
    pub input_schema: SchemaNode,
    /// Instruction text with `{{argument}}` placeholders
    pub template: String,
}

impl Prompt {
    /// Create a prompt descriptor
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        input_schema: SchemaNode,
        template: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            description: description.into(),
            input_schema,
            template: template.into(),
        }
    }

    /// Substitute `{{name}}` placeholders with argument values
    ///
    /// Strings are inserted verbatim, other values as compact JSON. A missing
    /// argument falls back to the property's schema `default`, else renders empty.
    #[must_use]
    pub fn render(&self, arguments: &Map<String, Value>) -> String {
        let mut rendered = String::with_capacity(self.template.len());
        let mut rest = self.template.as_str();

        while let Some(start) = rest.find("{{") {
            rendered.push_str(&rest[..start]);
            let after_open = &rest[start + 2..];
            let Some(end) = after_open.find("}}") else {
                rendered.push_str(&rest[start..]);
                return rendered;
            };
            let key = after_open[..end].trim();
            let value = arguments.get(key).or_else(|| {
                self.input_schema
                    .properties
                    .get(key)
                    .and_then(|p| p.default.as_ref())
            });
            match value {
                Some(Value::String(text)) => rendered.push_str(text),
                Some(Value::Null) | None => {}
                Some(other) => rendered.push_str(&other.to_string()),
            }
            rest = &after_open[end + 2..];
        }
        rendered.push_str(rest);
        rendered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_annotations_round_trip() {
        let hints = ToolHints::READ_ONLY | ToolHints::IDEMPOTENT;
        let annotations = hints.annotations();
        assert!(annotations.read_only_hint);
        assert!(!annotations.open_world_hint);
        assert_eq!(ToolHints::from(annotations), hints);
        assert_eq!(
            serde_json::to_value(annotations).unwrap()["readOnlyHint"],
            json!(true)
        );
    }

    #[test]
    fn test_render_substitutes_placeholders() {
        let prompt = Prompt::new(
            "p",
            "P",
            "d",
            SchemaNode::object(),
            "Summarize {{ text }} in {{words}} words.{{missing}}",
        );
        let args = json!({"text": "the report", "words": 50});
        let rendered = prompt.render(args.as_object().unwrap());
        assert_eq!(rendered, "Summarize the report in 50 words.");
    }

    #[test]
    fn test_render_uses_schema_default() {
        let mut words = SchemaNode::integer();
        words.default = Some(json!(100));
        let prompt = Prompt::new(
            "p",
            "P",
            "d",
            SchemaNode::object().property("words", words),
            "{{words}} words",
        );
        assert_eq!(prompt.render(&Map::new()), "100 words");
    }

    #[test]
    fn test_render_keeps_unclosed_placeholder() {
        let prompt = Prompt::new("p", "P", "d", SchemaNode::object(), "Hello {{name");
        assert_eq!(prompt.render(&Map::new()), "Hello {{name");
    }
}
