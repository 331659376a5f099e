// ABOUTME: Tests for the line-delimited stdio transport using in-memory streams
// ABOUTME: Verifies one response line per answered request and silence for notifications
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::collections::HashMap;

use serde_json::Value;
use tokio::io::{duplex, AsyncReadExt, BufReader};
use tool_proxy::transport::serve_lines;

use common::builtin_adapter;

async fn run_lines(input: &str) -> Vec<Value> {
    let adapter = builtin_adapter().await;
    let (writer, mut output) = duplex(64 * 1024);

    serve_lines(adapter, BufReader::new(input.as_bytes()), writer)
        .await
        .unwrap();

    let mut written = String::new();
    output.read_to_string(&mut written).await.unwrap();
    written
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

fn by_id(responses: Vec<Value>) -> HashMap<String, Value> {
    responses
        .into_iter()
        .map(|r| (r["id"].to_string(), r))
        .collect()
}

#[tokio::test]
async fn test_each_request_line_gets_one_response_line() {
    let input = concat!(
        r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"2025-06-18"}}"#,
        "\n",
        r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
        "\n",
        r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"echo","arguments":{"text":"hi"}}}"#,
        "\n",
        "\n",
        r#"{"jsonrpc":"2.0","id":3,"method":"tools/list"}"#,
        "\n",
    );

    let responses = by_id(run_lines(input).await);
    assert_eq!(responses.len(), 3);
    assert_eq!(responses["1"]["result"]["protocolVersion"], "2025-06-18");
    assert_eq!(responses["2"]["result"]["content"][0]["text"], "Echo: hi");
    assert!(responses["3"]["result"]["tools"].is_array());
}

#[tokio::test]
async fn test_bad_line_does_not_stop_the_stream() {
    let input = concat!(
        "this is not json\n",
        r#"{"jsonrpc":"2.0","id":"after","method":"ping"}"#,
        "\n",
    );

    let responses = run_lines(input).await;
    assert_eq!(responses.len(), 2);

    let parse_error = responses.iter().find(|r| r["id"].is_null()).unwrap();
    assert_eq!(parse_error["error"]["code"], -32700);
    let pong = responses.iter().find(|r| r["id"] == "after").unwrap();
    assert!(pong["result"].is_object());
}

#[tokio::test]
async fn test_batch_line_answered_as_array() {
    let input = concat!(
        r#"[{"jsonrpc":"2.0","id":1,"method":"ping"},{"jsonrpc":"2.0","id":2,"method":"ping"}]"#,
        "\n",
    );

    let responses = run_lines(input).await;
    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_empty_input_writes_nothing() {
    assert!(run_lines("").await.is_empty());
}
