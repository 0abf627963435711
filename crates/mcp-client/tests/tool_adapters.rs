mod common;

use std::time::Duration;

use common::{mount_handshake, result, rpc, unused_local_url};
use mb_mcp_client::tools::{check_with_options, tools_with_options};
use mb_mcp_client::{check_server, tools_for_server, ClientOptions};
use serde_json::{json, Map};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_tool_list(server: &MockServer) {
    rpc(
        "tools/list",
        ResponseTemplate::new(200).set_body_json(result(
            2,
            json!({
                "tools": [
                    { "name": "foo", "description": "Does foo", "inputSchema": { "type": "object", "properties": { "a": { "type": "integer" } } } },
                    { "name": "bar" }
                ]
            }),
        )),
    )
    .mount(server)
    .await;
}

#[tokio::test]
async fn adapter_round_trip() {
    let server = MockServer::start().await;
    mount_handshake(&server).await;
    mount_tool_list(&server).await;
    Mock::given(method("POST"))
        .and(path("/mcp"))
        .and(body_partial_json(json!({
            "method": "tools/call",
            "params": { "name": "foo", "arguments": { "a": 1 } }
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(result(3, json!({ "content": [{ "type": "text", "text": "ok" }] }))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let adapters = tools_with_options(ClientOptions::new(server.uri()).session_id("s-1")).await;
    assert_eq!(adapters.len(), 2);

    let foo = &adapters[0];
    assert_eq!(foo.name(), "foo");
    assert_eq!(foo.description(), "Does foo");
    assert_eq!(foo.input_schema()["properties"]["a"]["type"], "integer");
    assert_eq!(adapters[1].description(), "Tool: bar");

    let mut kwargs = Map::new();
    kwargs.insert("a".into(), json!(1));
    let out = foo.invoke(kwargs).await;

    let rendered: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(rendered["content"][0]["text"], "ok");
}

#[tokio::test]
async fn adapter_reports_server_error_as_text() {
    let server = MockServer::start().await;
    mount_handshake(&server).await;
    mount_tool_list(&server).await;
    rpc(
        "tools/call",
        ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": 3,
            "error": { "code": -32602, "message": "Invalid params" }
        })),
    )
    .mount(&server)
    .await;

    let adapters = tools_with_options(ClientOptions::new(server.uri()).session_id("s-1")).await;
    let out = adapters[1].invoke(Map::new()).await;

    assert!(out.starts_with("Error executing bar: "), "{out}");
    assert!(out.contains("Invalid params"), "{out}");
}

#[tokio::test]
async fn unreachable_server_yields_no_adapters() {
    let adapters = tools_for_server(&unused_local_url(), Duration::from_secs(1)).await;
    assert!(adapters.is_empty());
}

#[tokio::test]
async fn check_against_unreachable_server_is_empty_not_error() {
    let tools = check_server(&unused_local_url(), Duration::from_secs(1))
        .await
        .unwrap();
    assert!(tools.is_empty());
}

#[tokio::test]
async fn check_survives_handshake_failure() {
    let server = MockServer::start().await;
    rpc("initialize", ResponseTemplate::new(500))
        .mount(&server)
        .await;
    rpc(
        "tools/list",
        ResponseTemplate::new(200)
            .set_body_json(result(3, json!([{ "name": "lonely" }]))),
    )
    .expect(0)
    .mount(&server)
    .await;

    let tools = check_with_options(ClientOptions::new(server.uri()).session_id("s-1"))
        .await
        .unwrap();

    // Listing retries the handshake first, which fails again.
    assert!(tools.is_empty());
}
