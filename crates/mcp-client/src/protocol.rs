//! JSON-RPC 2.0 types for the MCP protocol.
//!
//! Only the slice of MCP the benchmark needs is modelled: `initialize`,
//! `notifications/initialized`, `tools/list` and `tools/call`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const JSONRPC_VERSION: &str = "2.0";

/// MCP protocol revision advertised during `initialize`.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

pub const CLIENT_NAME: &str = "mcp-bench";

pub const METHOD_INITIALIZE: &str = "initialize";
pub const METHOD_INITIALIZED: &str = "notifications/initialized";
pub const METHOD_TOOLS_LIST: &str = "tools/list";
pub const METHOD_TOOLS_CALL: &str = "tools/call";

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Requests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A JSON-RPC 2.0 request (has an `id`, expects a response).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub id: u64,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    pub fn new(id: u64, method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.into(),
            id,
            method: method.into(),
            params,
        }
    }
}

/// A JSON-RPC 2.0 notification (no `id`, fire-and-forget).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JsonRpcNotification {
    pub jsonrpc: String,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl JsonRpcNotification {
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.into(),
            method: method.into(),
            params: None,
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Responses
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A JSON-RPC 2.0 error object.
///
/// Servers are not always strict about the members, so a missing `code`
/// reads as `-1` and a missing `message` as `"Unknown error"`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JsonRpcError {
    #[serde(default = "d_error_code")]
    pub code: i64,
    #[serde(default = "d_error_message")]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

fn d_error_code() -> i64 {
    -1
}

fn d_error_message() -> String {
    "Unknown error".into()
}

impl JsonRpcError {
    /// Interpret an arbitrary `error` member. Non-object values are kept as
    /// the message text.
    pub fn from_value(value: Value) -> Self {
        match serde_json::from_value::<JsonRpcError>(value.clone()) {
            Ok(err) => err,
            Err(_) => JsonRpcError {
                code: d_error_code(),
                message: match value {
                    Value::String(s) => s,
                    other => other.to_string(),
                },
                data: None,
            },
        }
    }
}

impl std::fmt::Display for JsonRpcError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "JSON-RPC error {}: {}", self.code, self.message)
    }
}

impl std::error::Error for JsonRpcError {}

/// Split a decoded response envelope into its outcome.
///
/// An `error` member wins (a `null` one is ignored). Otherwise the `result`
/// member is returned, or the whole envelope for servers that skip the
/// `result` wrapper.
pub fn split_envelope(envelope: Value) -> Result<Value, JsonRpcError> {
    match envelope {
        Value::Object(mut map) => {
            match map.remove("error") {
                Some(Value::Null) | None => {}
                Some(err) => return Err(JsonRpcError::from_value(err)),
            }
            match map.remove("result") {
                Some(result) => Ok(result),
                None => Ok(Value::Object(map)),
            }
        }
        other => Ok(other),
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// MCP-specific payloads
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Client info sent during `initialize`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClientInfo {
    pub name: String,
    pub version: String,
}

impl Default for ClientInfo {
    fn default() -> Self {
        Self {
            name: CLIENT_NAME.into(),
            version: env!("CARGO_PKG_VERSION").into(),
        }
    }
}

/// Parameters for the `initialize` request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeParams {
    pub protocol_version: String,
    pub capabilities: Value,
    pub client_info: ClientInfo,
}

/// Build the `initialize` request parameters.
pub fn initialize_params(protocol_version: &str, client_info: &ClientInfo) -> InitializeParams {
    InitializeParams {
        protocol_version: protocol_version.into(),
        capabilities: Value::Object(Map::new()),
        client_info: client_info.clone(),
    }
}

/// Parameters for `tools/call`. `arguments` is always sent, `{}` when empty.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CallToolParams {
    pub name: String,
    pub arguments: Map<String, Value>,
}

/// A single tool advertised by `tools/list`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Passed through untouched; the client never validates arguments.
    #[serde(default = "default_schema")]
    pub input_schema: Value,
}

impl ToolDescriptor {
    /// A descriptor carrying only a name, for calling tools that were not
    /// discovered through `tools/list`.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            input_schema: default_schema(),
        }
    }
}

fn default_schema() -> Value {
    serde_json::json!({ "type": "object", "properties": {} })
}

/// The `tools/list` result, decoded by shape.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolsListPayload {
    /// `{"tools": [...]}`. An object without `tools` is an empty list.
    Wrapped(Vec<Value>),
    /// A bare `[...]` result.
    Bare(Vec<Value>),
    /// Anything else, kept for diagnostics.
    Unexpected(Value),
}

impl ToolsListPayload {
    pub fn from_result(result: Value) -> Self {
        match result {
            Value::Array(items) => ToolsListPayload::Bare(items),
            Value::Object(mut map) => match map.remove("tools") {
                None => ToolsListPayload::Wrapped(Vec::new()),
                Some(Value::Array(items)) => ToolsListPayload::Wrapped(items),
                Some(other) => {
                    map.insert("tools".into(), other);
                    ToolsListPayload::Unexpected(Value::Object(map))
                }
            },
            other => ToolsListPayload::Unexpected(other),
        }
    }

    /// The raw tool entries, or the unexpected payload.
    pub fn into_entries(self) -> Result<Vec<Value>, Value> {
        match self {
            ToolsListPayload::Wrapped(items) | ToolsListPayload::Bare(items) => Ok(items),
            ToolsListPayload::Unexpected(raw) => Err(raw),
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serialize_request() {
        let req = JsonRpcRequest::new(
            1,
            METHOD_INITIALIZE,
            Some(json!({ "protocolVersion": PROTOCOL_VERSION })),
        );
        let json = serde_json::to_string(&req).unwrap();
        assert!(json.contains("\"jsonrpc\":\"2.0\""));
        assert!(json.contains("\"id\":1"));
        assert!(json.contains("\"method\":\"initialize\""));
    }

    #[test]
    fn serialize_request_without_params() {
        let req = JsonRpcRequest::new(2, METHOD_TOOLS_LIST, None);
        let json = serde_json::to_string(&req).unwrap();
        assert!(!json.contains("params"));
    }

    #[test]
    fn serialize_notification() {
        let notif = JsonRpcNotification::new(METHOD_INITIALIZED);
        let value = serde_json::to_value(&notif).unwrap();
        assert_eq!(
            value,
            json!({ "jsonrpc": "2.0", "method": "notifications/initialized" })
        );
    }

    #[test]
    fn initialize_params_wire_shape() {
        let params = initialize_params(PROTOCOL_VERSION, &ClientInfo::default());
        let value = serde_json::to_value(&params).unwrap();
        assert_eq!(value["protocolVersion"], "2024-11-05");
        assert_eq!(value["capabilities"], json!({}));
        assert_eq!(value["clientInfo"]["name"], CLIENT_NAME);
        assert!(value["clientInfo"]["version"].is_string());
    }

    #[test]
    fn call_params_always_carry_arguments() {
        let params = CallToolParams {
            name: "pods_list".into(),
            arguments: Map::new(),
        };
        let value = serde_json::to_value(&params).unwrap();
        assert_eq!(value, json!({ "name": "pods_list", "arguments": {} }));
    }

    #[test]
    fn split_envelope_returns_result() {
        let env = json!({ "jsonrpc": "2.0", "id": 1, "result": { "capabilities": {} } });
        assert_eq!(split_envelope(env).unwrap(), json!({ "capabilities": {} }));
    }

    #[test]
    fn split_envelope_without_result_returns_envelope() {
        let env = json!({ "jsonrpc": "2.0", "id": 1, "tools": [] });
        assert_eq!(split_envelope(env.clone()).unwrap(), env);
    }

    #[test]
    fn split_envelope_error_wins() {
        let env = json!({
            "jsonrpc": "2.0",
            "id": 2,
            "error": { "code": -32601, "message": "Method not found" }
        });
        let err = split_envelope(env).unwrap_err();
        assert_eq!(err.code, -32601);
        assert_eq!(err.message, "Method not found");
    }

    #[test]
    fn split_envelope_ignores_null_error() {
        let env = json!({ "jsonrpc": "2.0", "id": 3, "error": null, "result": 5 });
        assert_eq!(split_envelope(env).unwrap(), json!(5));
    }

    #[test]
    fn error_members_default_when_missing() {
        let err = JsonRpcError::from_value(json!({}));
        assert_eq!(err.code, -1);
        assert_eq!(err.message, "Unknown error");

        let err = JsonRpcError::from_value(json!("boom"));
        assert_eq!(err.code, -1);
        assert_eq!(err.message, "boom");
    }

    #[test]
    fn jsonrpc_error_display() {
        let err = JsonRpcError {
            code: -32601,
            message: "Method not found".into(),
            data: None,
        };
        assert_eq!(format!("{err}"), "JSON-RPC error -32601: Method not found");
    }

    #[test]
    fn tools_list_payload_shapes() {
        let wrapped = ToolsListPayload::from_result(json!({ "tools": [{ "name": "a" }] }));
        assert_eq!(wrapped, ToolsListPayload::Wrapped(vec![json!({ "name": "a" })]));

        let bare = ToolsListPayload::from_result(json!([{ "name": "b" }]));
        assert_eq!(bare, ToolsListPayload::Bare(vec![json!({ "name": "b" })]));

        let no_tools = ToolsListPayload::from_result(json!({ "nextCursor": null }));
        assert_eq!(no_tools.into_entries().unwrap(), Vec::<Value>::new());

        let odd = ToolsListPayload::from_result(json!("tools"));
        assert_eq!(odd.into_entries().unwrap_err(), json!("tools"));

        let bad_tools = ToolsListPayload::from_result(json!({ "tools": "nope" }));
        assert_eq!(
            bad_tools.into_entries().unwrap_err(),
            json!({ "tools": "nope" })
        );
    }

    #[test]
    fn deserialize_tool_descriptor() {
        let raw = json!({
            "name": "read_file",
            "description": "Read a file",
            "inputSchema": {
                "type": "object",
                "properties": { "path": { "type": "string" } }
            }
        });
        let tool: ToolDescriptor = serde_json::from_value(raw).unwrap();
        assert_eq!(tool.name, "read_file");
        assert_eq!(tool.description.as_deref(), Some("Read a file"));
        assert_eq!(tool.input_schema["properties"]["path"]["type"], "string");
    }

    #[test]
    fn tool_descriptor_defaults() {
        let tool: ToolDescriptor = serde_json::from_value(json!({ "name": "ping" })).unwrap();
        assert!(tool.description.is_none());
        assert_eq!(tool.input_schema["type"], "object");
        assert_eq!(tool, ToolDescriptor::named("ping"));
    }
}
