// ABOUTME: End-to-end tests running the HTTP transport on a local port and the proxy client
// ABOUTME: Covers discovery, translated provider calls, error mapping, and graceful shutdown
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::time::Duration;

use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tool_proxy::client::ProxyClient;
use tool_proxy::errors::{AppResult, ErrorCode};
use tool_proxy::server::ProxyServer;
use tool_proxy::translator::{from_provider_call, ProviderFunctionCall};

use common::{builtin_adapter, init_test_logging};

struct RunningProxy {
    client: ProxyClient,
    shutdown: CancellationToken,
    handle: JoinHandle<AppResult<()>>,
}

async fn start_proxy() -> RunningProxy {
    init_test_logging();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();

    let server = ProxyServer::from_adapter(builtin_adapter().await);
    let shutdown = server.shutdown_token();
    let handle = tokio::spawn(async move { server.serve_http(listener).await });

    RunningProxy {
        client: ProxyClient::new(format!("http://{address}/mcp")),
        shutdown,
        handle,
    }
}

#[tokio::test]
async fn test_client_discovers_and_calls_tools() {
    let proxy = start_proxy().await;

    let init = proxy.client.initialize().await.unwrap();
    assert_eq!(init["protocolVersion"], "2025-06-18");

    let tools = proxy.client.list_tools().await.unwrap();
    let names: Vec<&str> = tools.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["echo", "add-numbers", "list-services"]);

    let request = from_provider_call(&ProviderFunctionCall::new("echo", r#"{"text":"hi"}"#)).unwrap();
    let output = proxy.client.call_tool(&request).await.unwrap();
    assert_eq!(output.joined_text(), "Echo: hi");

    proxy.shutdown.cancel();
    proxy.handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_provider_function_call_round_trip() {
    let proxy = start_proxy().await;

    let output = proxy
        .client
        .call_provider_function(&ProviderFunctionCall::new("add-numbers", r#"{"a":2,"b":3}"#))
        .await
        .unwrap();
    assert_eq!(output.joined_text(), "2 + 3 = 5");

    let err = proxy
        .client
        .call_provider_function(&ProviderFunctionCall::new("add-numbers", "{oops"))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::MalformedArguments);

    proxy.shutdown.cancel();
    proxy.handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_remote_errors_keep_taxonomy() {
    let proxy = start_proxy().await;

    let request = from_provider_call(&ProviderFunctionCall::new("add-numbers", r#"{"a":2}"#)).unwrap();
    let err = proxy.client.call_tool(&request).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidParams);
    assert_eq!(err.details.unwrap()["violations"][0]["field"], "b");

    let stale = ProxyClient::new(proxy.client.endpoint()).with_protocol_version("2001-01-01");
    let err = stale.list_tools().await.unwrap_err();
    assert_eq!(err.code, ErrorCode::UnsupportedProtocolVersion);

    proxy.shutdown.cancel();
    proxy.handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_graceful_shutdown_stops_server() {
    let proxy = start_proxy().await;
    proxy.shutdown.cancel();

    let finished = timeout(Duration::from_secs(5), proxy.handle).await;
    assert!(finished.is_ok(), "server did not stop after cancellation");

    let err = proxy.client.request("ping", None).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InternalError);
}
