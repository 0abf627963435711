//! Shared wiremock fixtures for the MCP client integration tests.

#![allow(dead_code)]

use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const SSE: &str = "text/event-stream";

/// Successful JSON-RPC envelope.
pub fn result(id: u64, result: Value) -> Value {
    json!({ "jsonrpc": "2.0", "id": id, "result": result })
}

/// Mock answering `method` calls on `/mcp` with `response`.
pub fn rpc(rpc_method: &str, response: ResponseTemplate) -> Mock {
    Mock::given(method("POST"))
        .and(path("/mcp"))
        .and(body_partial_json(json!({ "method": rpc_method })))
        .respond_with(response)
}

/// Mount a working `initialize` + `notifications/initialized` pair.
pub async fn mount_handshake(server: &MockServer) {
    rpc(
        "initialize",
        ResponseTemplate::new(200).set_body_json(result(
            1,
            json!({
                "protocolVersion": "2024-11-05",
                "capabilities": { "tools": {} },
                "serverInfo": { "name": "test-server", "version": "0.0.0" }
            }),
        )),
    )
    .mount(server)
    .await;

    rpc("notifications/initialized", ResponseTemplate::new(202))
        .mount(server)
        .await;
}

/// A URL nothing is listening on.
pub fn unused_local_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}

/// JSON bodies of every POST the server received, in order.
pub async fn posted_bodies(server: &MockServer) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|r| r.method.as_str() == "POST")
        .map(|r| serde_json::from_slice(&r.body).unwrap())
        .collect()
}
