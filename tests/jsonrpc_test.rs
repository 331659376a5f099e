// ABOUTME: Tests for the JSON-RPC 2.0 framing module
// ABOUTME: Validates request, response, error structures, payload parsing, and serialization
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use serde_json::{json, Value};
use tool_proxy::errors::{AppError, ErrorCode};
use tool_proxy::jsonrpc::{
    JsonRpcPayload, JsonRpcRequest, JsonRpcResponse, JSONRPC_VERSION,
};

#[test]
fn test_request_creation() {
    let req = JsonRpcRequest::new("tools/list", None);
    assert_eq!(req.jsonrpc, JSONRPC_VERSION);
    assert_eq!(req.method, "tools/list");
    assert!(req.params.is_none());
    assert!(req.id.is_some());
    assert!(!req.is_notification());
}

#[test]
fn test_notification_creation() {
    let req = JsonRpcRequest::notification("notifications/initialized", None);
    assert_eq!(req.jsonrpc, JSONRPC_VERSION);
    assert!(req.id.is_none());
    assert!(req.is_notification());
}

#[test]
fn test_explicit_null_id_is_not_a_notification() {
    let req = JsonRpcRequest::from_value(json!({"jsonrpc": "2.0", "id": null, "method": "ping"}))
        .unwrap();
    assert_eq!(req.id, Some(Value::Null));
    assert!(!req.is_notification());

    let absent = JsonRpcRequest::from_value(json!({"jsonrpc": "2.0", "method": "ping"})).unwrap();
    assert!(absent.id.is_none());
    assert!(absent.is_notification());
}

#[test]
fn test_success_response() {
    let resp = JsonRpcResponse::success(Some(Value::from(1)), Value::from("ok"));
    assert!(resp.is_success());
    assert!(!resp.is_error());
    assert_eq!(resp.jsonrpc, JSONRPC_VERSION);
}

#[test]
fn test_error_response() {
    let resp = JsonRpcResponse::error(Some(Value::from(1)), -32600, "Invalid Request");
    assert!(resp.is_error());
    assert!(!resp.is_success());
    assert_eq!(resp.error.unwrap().code, -32600);
}

#[test]
fn test_serialization_skips_absent_fields() {
    let notification = JsonRpcRequest::notification("notifications/cancelled", None);
    let json = serde_json::to_string(&notification).unwrap();
    assert!(!json.contains("\"id\""));
    assert!(!json.contains("\"params\""));

    let resp = JsonRpcResponse::success(None, json!({}));
    let value = serde_json::to_value(&resp).unwrap();
    assert!(value.get("error").is_none());
    assert!(value["id"].is_null());
}

#[test]
fn test_app_error_on_the_wire() {
    let error = AppError::new(ErrorCode::AmbiguousTool, "search is declared twice")
        .with_details(json!({"name": "search", "services": ["a", "b"]}));
    let resp = JsonRpcResponse::from_app_error(Some(json!("req-1")), &error);

    let value = serde_json::to_value(&resp).unwrap();
    assert_eq!(value["id"], "req-1");
    assert_eq!(value["error"]["code"], -32003);
    assert_eq!(value["error"]["message"], "search is declared twice");
    assert_eq!(value["error"]["data"]["kind"], "AmbiguousTool");
    assert_eq!(value["error"]["data"]["services"], json!(["a", "b"]));
}

#[test]
fn test_every_code_round_trips_through_wire() {
    for code in [
        ErrorCode::MethodNotFound,
        ErrorCode::InvalidParams,
        ErrorCode::AmbiguousTool,
        ErrorCode::DuplicateServiceName,
        ErrorCode::InvalidService,
        ErrorCode::ServiceNotFound,
        ErrorCode::InternalError,
        ErrorCode::Timeout,
        ErrorCode::UnsupportedProtocolVersion,
        ErrorCode::MalformedArguments,
        ErrorCode::ParseError,
        ErrorCode::InvalidRequest,
    ] {
        let resp = JsonRpcResponse::from_app_error(None, &AppError::new(code, "x"));
        let error = resp.error.unwrap();
        assert_eq!(error.error_code(), Some(code));
        assert_eq!(error.kind(), Some(code.as_str()));
    }
}

#[test]
fn test_non_object_details_are_nested() {
    let error = AppError::internal("boom").with_details(json!(["a"]));
    let resp = JsonRpcResponse::from_app_error(None, &error);
    let data = resp.error.unwrap().data.unwrap();
    assert_eq!(data["details"], json!(["a"]));
    assert_eq!(data["kind"], "InternalError");
}

#[test]
fn test_from_value_keeps_id_on_invalid_request() {
    let (id, error) =
        JsonRpcRequest::from_value(json!({"jsonrpc": "2.0", "id": 9, "params": {}})).unwrap_err();
    assert_eq!(id, Some(json!(9)));
    assert_eq!(error.code, ErrorCode::InvalidRequest);
}

#[test]
fn test_from_value_rejects_scalar_params() {
    let (_, error) = JsonRpcRequest::from_value(
        json!({"jsonrpc": "2.0", "id": 1, "method": "ping", "params": 3}),
    )
    .unwrap_err();
    assert_eq!(error.code, ErrorCode::InvalidRequest);
}

#[test]
fn test_payload_parsing() {
    assert!(matches!(
        JsonRpcPayload::parse(br#"{"jsonrpc":"2.0","method":"ping","id":1}"#).unwrap(),
        JsonRpcPayload::Single(_)
    ));
    assert!(matches!(
        JsonRpcPayload::parse(br#"[{"jsonrpc":"2.0","method":"ping","id":1}]"#).unwrap(),
        JsonRpcPayload::Batch(items) if items.len() == 1
    ));
    assert_eq!(
        JsonRpcPayload::parse(b"[]").unwrap_err().code,
        ErrorCode::InvalidRequest
    );
    assert_eq!(
        JsonRpcPayload::parse(b"\"ping\"").unwrap_err().code,
        ErrorCode::InvalidRequest
    );
    assert_eq!(
        JsonRpcPayload::parse(b"{oops").unwrap_err().code,
        ErrorCode::ParseError
    );
}
