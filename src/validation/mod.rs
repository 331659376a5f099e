// ABOUTME: Structural validation of tool arguments against their declared schema
// ABOUTME: Collects every violated field so callers can fix all problems in one round-trip
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

//! # Schema Validation
//!
//! [`validate`] walks a [`SchemaNode`] and the supplied arguments together and
//! reports every violation with a JSON pointer path (`/a/b/0`, with `~0` and
//! `~1` escaping `~` and `/` inside property names). Unknown
//! properties are accepted unless the object declares
//! `additionalProperties: false`. Bounds, lengths, enums and patterns are
//! checked only when declared.

mod schema;

use std::fmt;

use serde::Serialize;
use serde_json::{json, Map, Value};
use thiserror::Error;

use crate::errors::{AppError, ErrorCode};

use schema::pointer_segment;

pub use schema::{Pattern, SchemaNode, SchemaType};

/// What went wrong at one location in the arguments
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum ViolationKind {
    /// A required property is absent
    #[error("missing required field")]
    MissingRequired,
    /// The value has the wrong JSON type
    #[error("expected {expected}, got {actual}")]
    TypeMismatch {
        /// Declared type
        expected: SchemaType,
        /// Runtime type name
        actual: &'static str,
    },
    /// The value is not one of the declared `enum` values
    #[error("value is not one of {allowed:?}")]
    NotInEnum {
        /// Declared values
        allowed: Vec<Value>,
    },
    /// A numeric bound was crossed
    #[error("value {value} is out of range: {constraint}")]
    OutOfRange {
        /// Offending number
        value: f64,
        /// Violated bound, e.g. `>= 0`
        constraint: String,
    },
    /// A string length bound was crossed
    #[error("length {length} is out of range: {constraint}")]
    LengthOutOfRange {
        /// Length in characters
        length: usize,
        /// Violated bound
        constraint: String,
    },
    /// A string did not match `pattern`
    #[error("value does not match pattern '{pattern}'")]
    PatternMismatch {
        /// Declared pattern
        pattern: String,
    },
    /// A property is present but not declared on a closed object
    #[error("unknown property")]
    UnknownProperty,
}

/// One violated field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    /// JSON pointer to the field (`/a/b/0`)
    pub path: String,
    /// Unescaped property name or array index, the field a caller has to fix
    pub field: String,
    /// What is wrong with it
    #[serde(flatten)]
    pub kind: ViolationKind,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_empty() { "/" } else { &self.path };
        write!(f, "{path}: {}", self.kind)
    }
}

/// Every violation found in one validation pass
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{} invalid field(s): {}", .violations.len(), join_violations(.violations))]
pub struct ValidationError {
    /// Violations in document order
    pub violations: Vec<Violation>,
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationError {
    /// Names of the violated fields, in order
    #[must_use]
    pub fn fields(&self) -> Vec<&str> {
        self.violations.iter().map(|v| v.field.as_str()).collect()
    }
}

impl From<ValidationError> for AppError {
    fn from(error: ValidationError) -> Self {
        let details = json!({ "violations": error.violations });
        Self::new(ErrorCode::InvalidParams, error.to_string()).with_details(details)
    }
}

/// Validate arguments against a schema
///
/// # Errors
///
/// Returns a [`ValidationError`] listing every violated field
pub fn validate(schema: &SchemaNode, arguments: &Value) -> Result<(), ValidationError> {
    let mut violations = Vec::new();
    check(schema, arguments, &Location::root(), &mut violations);
    if violations.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { violations })
    }
}

/// Where a value sits in the arguments
struct Location {
    path: String,
    field: String,
}

impl Location {
    const fn root() -> Self {
        Self {
            path: String::new(),
            field: String::new(),
        }
    }

    fn child(&self, field: &str) -> Self {
        Self {
            path: format!("{}/{}", self.path, pointer_segment(field)),
            field: field.to_owned(),
        }
    }
}

fn violation(at: &Location, kind: ViolationKind) -> Violation {
    Violation {
        path: at.path.clone(),
        field: at.field.clone(),
        kind,
    }
}

fn check(schema: &SchemaNode, value: &Value, at: &Location, out: &mut Vec<Violation>) {
    if let Some(expected) = schema.schema_type {
        if !expected.matches(value) {
            out.push(violation(
                at,
                ViolationKind::TypeMismatch {
                    expected,
                    actual: SchemaType::name_of(value),
                },
            ));
            // Nested checks are meaningless once the type is wrong
            return;
        }
    }

    if let Some(allowed) = &schema.enum_values {
        if !allowed.contains(value) {
            out.push(violation(
                at,
                ViolationKind::NotInEnum {
                    allowed: allowed.clone(),
                },
            ));
        }
    }

    match value {
        Value::Object(map) => check_object(schema, map, at, out),
        Value::Array(items) => {
            if let Some(item_schema) = &schema.items {
                for (index, item) in items.iter().enumerate() {
                    check(item_schema, item, &at.child(&index.to_string()), out);
                }
            }
        }
        Value::Number(number) => {
            if let Some(n) = number.as_f64() {
                check_bounds(schema, n, at, out);
            }
        }
        Value::String(text) => check_string(schema, text, at, out),
        Value::Null | Value::Bool(_) => {}
    }
}

fn check_object(schema: &SchemaNode, map: &Map<String, Value>, at: &Location, out: &mut Vec<Violation>) {
    for name in &schema.required {
        if !map.contains_key(name) {
            out.push(violation(&at.child(name), ViolationKind::MissingRequired));
        }
    }

    for (name, value) in map {
        match schema.properties.get(name) {
            Some(child) => check(child, value, &at.child(name), out),
            None if schema.additional_properties == Some(false) => {
                out.push(violation(&at.child(name), ViolationKind::UnknownProperty));
            }
            None => {}
        }
    }
}

fn check_bounds(schema: &SchemaNode, n: f64, at: &Location, out: &mut Vec<Violation>) {
    if let Some(min) = schema.minimum {
        if n < min {
            out.push(violation(
                at,
                ViolationKind::OutOfRange {
                    value: n,
                    constraint: format!(">= {min}"),
                },
            ));
        }
    }
    if let Some(max) = schema.maximum {
        if n > max {
            out.push(violation(
                at,
                ViolationKind::OutOfRange {
                    value: n,
                    constraint: format!("<= {max}"),
                },
            ));
        }
    }
}

fn check_string(schema: &SchemaNode, text: &str, at: &Location, out: &mut Vec<Violation>) {
    let length = text.chars().count();
    if let Some(min) = schema.min_length {
        if length < min {
            out.push(violation(
                at,
                ViolationKind::LengthOutOfRange {
                    length,
                    constraint: format!(">= {min}"),
                },
            ));
        }
    }
    if let Some(max) = schema.max_length {
        if length > max {
            out.push(violation(
                at,
                ViolationKind::LengthOutOfRange {
                    length,
                    constraint: format!("<= {max}"),
                },
            ));
        }
    }
    if let Some(pattern) = &schema.pattern {
        // Patterns are checked at registration; an uncompilable one is skipped here
        if let Some(re) = pattern.regex() {
            if !re.is_match(text) {
                out.push(violation(
                    at,
                    ViolationKind::PatternMismatch {
                        pattern: pattern.as_str().to_owned(),
                    },
                ));
            }
        }
    }
}
