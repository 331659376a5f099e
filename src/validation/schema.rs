// ABOUTME: Recursive schema description for tool and prompt arguments
// ABOUTME: Serializes as the JSON-schema subset MCP clients expect in inputSchema
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

use std::collections::BTreeMap;
use std::fmt;

use regex::{Error as RegexError, Regex};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Escape one JSON pointer segment (`~` as `~0`, `/` as `~1`)
pub fn pointer_segment(name: &str) -> String {
    name.replace('~', "~0").replace('/', "~1")
}

/// A `pattern` constraint, compiled once when the schema is built or parsed
///
/// Serializes as its source string. An uncompilable source is kept so that
/// [`SchemaNode::structural_problems`] can report it at registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Pattern {
    source: String,
    compiled: Result<Regex, RegexError>,
}

/// JSON value types a schema node can declare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    /// JSON object
    Object,
    /// JSON string
    String,
    /// Any JSON number
    Number,
    /// Whole JSON number
    Integer,
    /// JSON boolean
    Boolean,
    /// JSON array
    Array,
    /// JSON null
    Null,
}

impl SchemaType {
    /// Whether a runtime value has this type
    #[must_use]
    pub fn matches(self, value: &Value) -> bool {
        match self {
            Self::Object => value.is_object(),
            Self::String => value.is_string(),
            Self::Number => value.is_number(),
            Self::Integer => {
                value.is_i64()
                    || value.is_u64()
                    || value.as_f64().is_some_and(|n| n.is_finite() && n.fract().abs() < f64::EPSILON)
            }
            Self::Boolean => value.is_boolean(),
            Self::Array => value.is_array(),
            Self::Null => value.is_null(),
        }
    }

    /// Name of the JSON type of a runtime value
    #[must_use]
    pub const fn name_of(value: &Value) -> &'static str {
        match value {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }
}

impl Pattern {
    /// Compile a pattern source
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        let compiled = Regex::new(&source);
        Self { source, compiled }
    }

    /// Pattern source as declared
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Compiled expression, `None` when the source does not compile
    #[must_use]
    pub fn regex(&self) -> Option<&Regex> {
        self.compiled.as_ref().ok()
    }

    /// Compile error for an invalid source
    #[must_use]
    pub fn error(&self) -> Option<&RegexError> {
        self.compiled.as_ref().err()
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl From<String> for Pattern {
    fn from(source: String) -> Self {
        Self::new(source)
    }
}

impl From<Pattern> for String {
    fn from(pattern: Pattern) -> Self {
        pattern.source
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Object => "object",
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Null => "null",
        };
        f.write_str(name)
    }
}

/// Structural description of a JSON value
///
/// Covers the subset of JSON Schema that tool declarations use: typed
/// properties, `required`, `items`, `enum`, numeric bounds, string length and
/// pattern, and `additionalProperties: false`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaNode {
    /// Declared type; `None` accepts any value
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<SchemaType>,
    /// Human-readable description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Object properties
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, SchemaNode>,
    /// Properties that must be present
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
    /// `Some(false)` rejects undeclared properties
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<bool>,
    /// Element schema for arrays
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaNode>>,
    /// Allowed values
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,
    /// Inclusive lower bound for numbers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    /// Inclusive upper bound for numbers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    /// Minimum string length in characters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    /// Maximum string length in characters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    /// Regular expression strings must match
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<Pattern>,
    /// Documented default value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl SchemaNode {
    fn typed(schema_type: SchemaType) -> Self {
        Self {
            schema_type: Some(schema_type),
            ..Self::default()
        }
    }

    /// Object schema with no properties
    #[must_use]
    pub fn object() -> Self {
        Self::typed(SchemaType::Object)
    }

    /// String schema
    #[must_use]
    pub fn string() -> Self {
        Self::typed(SchemaType::String)
    }

    /// Number schema
    #[must_use]
    pub fn number() -> Self {
        Self::typed(SchemaType::Number)
    }

    /// Integer schema
    #[must_use]
    pub fn integer() -> Self {
        Self::typed(SchemaType::Integer)
    }

    /// Boolean schema
    #[must_use]
    pub fn boolean() -> Self {
        Self::typed(SchemaType::Boolean)
    }

    /// Array schema with the given element schema
    #[must_use]
    pub fn array(items: Self) -> Self {
        Self {
            items: Some(Box::new(items)),
            ..Self::typed(SchemaType::Array)
        }
    }

    /// Attach a description
    #[must_use]
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Declare an optional property
    #[must_use]
    pub fn property(mut self, name: impl Into<String>, schema: Self) -> Self {
        self.properties.insert(name.into(), schema);
        self
    }

    /// Declare a required property
    #[must_use]
    pub fn required_property(mut self, name: impl Into<String>, schema: Self) -> Self {
        let name = name.into();
        if !self.required.contains(&name) {
            self.required.push(name.clone());
        }
        self.properties.insert(name, schema);
        self
    }

    /// Reject properties that are not declared
    #[must_use]
    pub const fn deny_additional_properties(mut self) -> Self {
        self.additional_properties = Some(false);
        self
    }

    /// Restrict to a fixed set of values
    #[must_use]
    pub fn one_of_values(mut self, values: impl IntoIterator<Item = Value>) -> Self {
        self.enum_values = Some(values.into_iter().collect());
        self
    }

    /// Inclusive numeric bounds
    #[must_use]
    pub const fn range(mut self, minimum: Option<f64>, maximum: Option<f64>) -> Self {
        self.minimum = minimum;
        self.maximum = maximum;
        self
    }

    /// String length bounds in characters
    #[must_use]
    pub const fn length(mut self, min_length: Option<usize>, max_length: Option<usize>) -> Self {
        self.min_length = min_length;
        self.max_length = max_length;
        self
    }

    /// Regular expression strings must match
    #[must_use]
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(Pattern::new(pattern));
        self
    }

    /// Check that a tool or prompt input schema is well formed
    ///
    /// The root must be an object schema, and at every level `required` may
    /// only name declared properties. Bounds must be ordered and patterns must
    /// compile. Returns one message per problem.
    #[must_use]
    pub fn structural_problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.schema_type != Some(SchemaType::Object) {
            problems.push("input schema root must have type 'object'".to_owned());
        }
        self.collect_problems("", &mut problems);
        problems
    }

    fn collect_problems(&self, path: &str, problems: &mut Vec<String>) {
        let at = if path.is_empty() { "/" } else { path };

        for name in &self.required {
            if !self.properties.contains_key(name) {
                problems.push(format!("{at}: required property '{name}' is not declared"));
            }
        }
        if let (Some(min), Some(max)) = (self.minimum, self.maximum) {
            if min > max {
                problems.push(format!("{at}: minimum {min} exceeds maximum {max}"));
            }
        }
        if let (Some(min), Some(max)) = (self.min_length, self.max_length) {
            if min > max {
                problems.push(format!("{at}: minLength {min} exceeds maxLength {max}"));
            }
        }
        if let Some(pattern) = &self.pattern {
            if let Some(e) = pattern.error() {
                problems.push(format!("{at}: invalid pattern '{pattern}': {e}"));
            }
        }

        for (name, child) in &self.properties {
            child.collect_problems(&format!("{path}/{}", pointer_segment(name)), problems);
        }
        if let Some(items) = &self.items {
            items.collect_problems(&format!("{path}/items"), problems);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_serializes_as_json_schema() {
        let schema = SchemaNode::object()
            .required_property("text", SchemaNode::string().describe("Text to echo"))
            .deny_additional_properties();
        assert_eq!(
            serde_json::to_value(&schema).unwrap(),
            json!({
                "type": "object",
                "properties": {"text": {"type": "string", "description": "Text to echo"}},
                "required": ["text"],
                "additionalProperties": false
            })
        );
    }

    #[test]
    fn test_deserializes_plain_json_schema() {
        let schema: SchemaNode = serde_json::from_value(json!({
            "type": "object",
            "properties": {"tags": {"type": "array", "items": {"type": "string"}}},
            "required": ["tags"]
        }))
        .unwrap();
        assert_eq!(schema.properties["tags"].schema_type, Some(SchemaType::Array));
        assert!(schema.structural_problems().is_empty());
    }

    #[test]
    fn test_structural_problems_found_at_depth() {
        let mut nested = SchemaNode::object();
        nested.required.push("ghost".to_owned());
        let schema = SchemaNode::object()
            .property("inner", nested)
            .property("word", SchemaNode::string().pattern("("));
        let problems = schema.structural_problems();
        assert_eq!(problems.len(), 2);
        assert!(problems[0].contains("/inner"));
        assert!(problems[1].contains("/word"));
    }

    #[test]
    fn test_non_object_root_rejected() {
        assert_eq!(SchemaNode::string().structural_problems().len(), 1);
    }

    #[test]
    fn test_integer_matches_whole_floats() {
        assert!(SchemaType::Integer.matches(&json!(3)));
        assert!(SchemaType::Integer.matches(&json!(3.0)));
        assert!(!SchemaType::Integer.matches(&json!(3.5)));
    }
}
