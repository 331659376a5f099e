// ABOUTME: Tests for structural argument validation against declared tool schemas
// ABOUTME: Verifies every violation is reported with its path and the AppError mapping
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use serde_json::json;
use tool_proxy::errors::{AppError, ErrorCode};
use tool_proxy::validation::{validate, SchemaNode, SchemaType, ViolationKind};

use common::{add_schema, text_schema};

fn profile_schema() -> SchemaNode {
    SchemaNode::object()
        .required_property("name", SchemaNode::string().length(Some(1), Some(20)))
        .required_property("age", SchemaNode::integer().range(Some(0.0), Some(150.0)))
        .property(
            "role",
            SchemaNode::string().one_of_values([json!("admin"), json!("viewer")]),
        )
        .property("email", SchemaNode::string().pattern(r"^[^@\s]+@[^@\s]+$"))
        .property("tags", SchemaNode::array(SchemaNode::string()))
        .deny_additional_properties()
}

#[test]
fn test_valid_arguments_pass() {
    let args = json!({
        "name": "Ada",
        "age": 36,
        "role": "admin",
        "email": "ada@example.com",
        "tags": ["math", "engines"]
    });
    assert!(validate(&profile_schema(), &args).is_ok());
}

#[test]
fn test_missing_required_field_named() {
    let err = validate(&text_schema(), &json!({})).unwrap_err();
    assert_eq!(err.fields(), vec!["text"]);
    assert_eq!(err.violations[0].path, "/text");
    assert_eq!(err.violations[0].kind, ViolationKind::MissingRequired);
}

#[test]
fn test_every_violation_reported_in_one_pass() {
    let args = json!({
        "age": -4,
        "role": "owner",
        "email": "not-an-email",
        "tags": ["ok", 7],
        "extra": true
    });
    let err = validate(&profile_schema(), &args).unwrap_err();
    let fields = err.fields();

    assert!(fields.contains(&"name"), "missing required: {fields:?}");
    assert!(fields.contains(&"age"), "out of range: {fields:?}");
    assert!(fields.contains(&"role"), "enum: {fields:?}");
    assert!(fields.contains(&"email"), "pattern: {fields:?}");
    assert!(fields.contains(&"1"), "array item: {fields:?}");
    assert!(fields.contains(&"extra"), "unknown property: {fields:?}");
    assert_eq!(err.violations.len(), 6);
}

#[test]
fn test_type_mismatch_reports_both_types() {
    let err = validate(&add_schema(), &json!({"a": "two", "b": 3})).unwrap_err();
    assert_eq!(err.violations.len(), 1);
    assert_eq!(
        err.violations[0].kind,
        ViolationKind::TypeMismatch {
            expected: SchemaType::Number,
            actual: "string",
        }
    );
    assert!(err.to_string().contains("expected number, got string"));
}

#[test]
fn test_nested_paths_are_pointer_like() {
    let schema = SchemaNode::object().required_property(
        "location",
        SchemaNode::object().required_property("lat", SchemaNode::number()),
    );
    let err = validate(&schema, &json!({"location": {"lat": null}})).unwrap_err();
    assert_eq!(err.violations[0].path, "/location/lat");
    assert_eq!(err.fields(), vec!["lat"]);
}

#[test]
fn test_unknown_properties_accepted_on_open_objects() {
    assert!(validate(&text_schema(), &json!({"text": "hi", "loud": true})).is_ok());
}

#[test]
fn test_length_counts_characters() {
    let schema = SchemaNode::object().property("code", SchemaNode::string().length(None, Some(3)));
    assert!(validate(&schema, &json!({"code": "äöü"})).is_ok());

    let err = validate(&schema, &json!({"code": "abcd"})).unwrap_err();
    assert!(matches!(
        err.violations[0].kind,
        ViolationKind::LengthOutOfRange { length: 4, .. }
    ));
}

#[test]
fn test_integer_rejects_fractions() {
    let schema = SchemaNode::object().property("count", SchemaNode::integer());
    assert!(validate(&schema, &json!({"count": 2})).is_ok());
    assert!(validate(&schema, &json!({"count": 2.5})).is_err());
}

#[test]
fn test_non_object_arguments_rejected_at_root() {
    let err = validate(&text_schema(), &json!([1, 2])).unwrap_err();
    assert_eq!(err.violations[0].path, "");
    assert!(err.to_string().contains("/: expected object, got array"));
}

#[test]
fn test_maps_to_invalid_params_with_violation_details() {
    let err: AppError = validate(&add_schema(), &json!({"a": 1})).unwrap_err().into();
    assert_eq!(err.code, ErrorCode::InvalidParams);
    assert!(err.message.contains("/b"));

    let details = err.details.unwrap();
    let violation = &details["violations"][0];
    assert_eq!(violation["field"], "b");
    assert_eq!(violation["path"], "/b");
    assert_eq!(violation["reason"], "missing_required");
}

#[test]
fn test_property_names_are_escaped_in_paths() {
    let schema = SchemaNode::object()
        .required_property("a/b", SchemaNode::string())
        .property(
            "x~y",
            SchemaNode::object().required_property("inner", SchemaNode::number()),
        );

    let err = validate(&schema, &json!({"x~y": {}})).unwrap_err();
    assert_eq!(err.violations[0].path, "/a~1b");
    assert_eq!(err.violations[0].field, "a/b");
    assert_eq!(err.violations[1].path, "/x~0y/inner");
    assert_eq!(err.violations[1].field, "inner");
}

#[test]
fn test_array_index_is_the_field() {
    let schema = SchemaNode::object().property("tags", SchemaNode::array(SchemaNode::string()));
    let err = validate(&schema, &json!({"tags": ["ok", 7]})).unwrap_err();
    assert_eq!(err.violations[0].path, "/tags/1");
    assert_eq!(err.fields(), vec!["1"]);
}

#[test]
fn test_parsed_pattern_is_compiled_and_reused() {
    let schema: SchemaNode = serde_json::from_value(json!({
        "type": "object",
        "properties": {"code": {"type": "string", "pattern": "^[A-Z]{3}$"}}
    }))
    .unwrap();

    let pattern = schema.properties["code"].pattern.as_ref().unwrap();
    assert!(pattern.regex().is_some());
    assert_eq!(pattern.as_str(), "^[A-Z]{3}$");

    for _ in 0..3 {
        assert!(validate(&schema, &json!({"code": "ABC"})).is_ok());
    }
    let err = validate(&schema, &json!({"code": "abc"})).unwrap_err();
    assert!(matches!(
        &err.violations[0].kind,
        ViolationKind::PatternMismatch { pattern } if pattern == "^[A-Z]{3}$"
    ));

    assert_eq!(
        serde_json::to_value(&schema).unwrap()["properties"]["code"]["pattern"],
        "^[A-Z]{3}$"
    );
}

#[test]
fn test_uncompilable_pattern_reported_once_at_registration() {
    let schema = SchemaNode::object().property("word", SchemaNode::string().pattern("("));
    let problems = schema.structural_problems();
    assert_eq!(problems.len(), 1);
    assert!(problems[0].contains("/word"));
    assert!(validate(&schema, &json!({"word": "anything"})).is_ok());
}
