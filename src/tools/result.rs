// ABOUTME: Defines ToolOutput and Content, the success envelope returned by handlers
// ABOUTME: Serializes as the MCP tools/call result with text content blocks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! # Tool Result Types
//!
//! Handlers return a [`ToolOutput`]; the dispatcher passes it through to the
//! protocol adapter, which serializes it as the `tools/call` result.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One content block of a tool result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Content {
    /// Plain text
    Text {
        /// The text
        text: String,
    },
}

impl Content {
    /// Text of the block
    #[must_use]
    pub fn as_text(&self) -> &str {
        match self {
            Self::Text { text } => text,
        }
    }
}

/// Successful result of a tool invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolOutput {
    /// Content blocks, in order
    pub content: Vec<Content>,
    /// Machine-readable copy of the result, when the handler produced JSON
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structured_content: Option<Value>,
    /// Always false; handler failures travel as JSON-RPC errors
    #[serde(default)]
    pub is_error: bool,
}

impl ToolOutput {
    /// Single text block result
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![Content::Text { text: text.into() }],
            structured_content: None,
            is_error: false,
        }
    }

    /// JSON result, rendered as pretty text plus structured content
    #[must_use]
    pub fn json(value: Value) -> Self {
        let text = serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string());
        Self {
            content: vec![Content::Text { text }],
            structured_content: Some(value),
            is_error: false,
        }
    }

    /// Create a result from a serializable value
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be serialized to JSON
    pub fn from_serializable<T: Serialize>(value: &T) -> Result<Self, serde_json::Error> {
        Ok(Self::json(serde_json::to_value(value)?))
    }

    /// Append another content block
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.content.push(Content::Text { text: text.into() });
        self
    }

    /// Concatenated text of all blocks, newline separated
    #[must_use]
    pub fn joined_text(&self) -> String {
        self.content
            .iter()
            .map(Content::as_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}
