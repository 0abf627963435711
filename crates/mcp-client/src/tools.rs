//! Tool adapters: the surface agent frameworks call into.
//!
//! A [`ToolAdapter`] wraps one discovered tool and always produces text:
//! results are rendered, failures are described. Agent tool-calling has no
//! error channel, so nothing here returns a `Result` except
//! [`check_server`].

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Map, Value};
use tokio::sync::Mutex;

use crate::client::{ClientOptions, McpClient};
use crate::error::McpError;
use crate::protocol::ToolDescriptor;

/// A client shared by every adapter created from it.
pub type SharedClient = Arc<Mutex<McpClient>>;

/// One invocable MCP tool.
#[derive(Debug, Clone)]
pub struct ToolAdapter {
    descriptor: ToolDescriptor,
    client: SharedClient,
}

impl ToolAdapter {
    pub fn new(client: SharedClient, descriptor: ToolDescriptor) -> Self {
        Self { descriptor, client }
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    /// The advertised description, or `Tool: <name>` when there is none.
    pub fn description(&self) -> String {
        match self.descriptor.description.as_deref() {
            Some(d) if !d.trim().is_empty() => d.to_owned(),
            _ => format!("Tool: {}", self.descriptor.name),
        }
    }

    pub fn input_schema(&self) -> &Value {
        &self.descriptor.input_schema
    }

    pub fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    /// Call the tool with keyword arguments and render the outcome as text.
    pub async fn invoke(&self, kwargs: Map<String, Value>) -> String {
        let name = self.name();
        tracing::info!(tool = %name, "executing MCP tool");

        let result = {
            let mut client = self.client.lock().await;
            client.call_tool(name, Some(kwargs)).await
        };

        match result {
            Ok(value) => render_result(&value),
            Err(e) => {
                let msg = format!("Error executing {name}: {e}");
                tracing::error!(tool = %name, kind = ?e.kind(), error = %e, "MCP tool failed");
                msg
            }
        }
    }
}

/// Objects and arrays become indented JSON, strings their raw text, other
/// scalars their JSON text.
pub fn render_result(value: &Value) -> String {
    match value {
        Value::Object(_) | Value::Array(_) => {
            serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
        }
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Wrap every tool the client can discover. Discovery is best-effort, so an
/// unreachable server yields no adapters.
pub async fn tools_for_client(client: McpClient) -> Vec<ToolAdapter> {
    let client: SharedClient = Arc::new(Mutex::new(client));
    let descriptors = client.lock().await.list_tools().await;

    descriptors
        .into_iter()
        .map(|d| {
            tracing::debug!(tool = %d.name, "created tool adapter");
            ToolAdapter::new(client.clone(), d)
        })
        .collect()
}

/// Build a client from `opts` and wrap its tools. Never fails.
pub async fn tools_with_options(opts: ClientOptions) -> Vec<ToolAdapter> {
    let server_url = opts.server_url.clone();
    tracing::info!(server_url = %server_url, "getting MCP tools");

    let client = match McpClient::new(opts).await {
        Ok(client) => client,
        Err(e) => {
            tracing::error!(server_url = %server_url, error = %e, "failed to create MCP client");
            return Vec::new();
        }
    };

    let adapters = tools_for_client(client).await;
    if adapters.is_empty() {
        tracing::warn!(server_url = %server_url, "no tools found");
    } else {
        tracing::info!(
            server_url = %server_url,
            tool_count = adapters.len(),
            "created tool adapters"
        );
    }
    adapters
}

/// Discover the tools of the server at `server_url`.
pub async fn tools_for_server(server_url: &str, timeout: Duration) -> Vec<ToolAdapter> {
    tools_with_options(ClientOptions::new(server_url).timeout(timeout)).await
}

/// Connection check: handshake (tolerating its failure) and list tools.
///
/// Only client construction errors surface; an empty list still means the
/// server was checked.
pub async fn check_with_options(opts: ClientOptions) -> Result<Vec<ToolDescriptor>, McpError> {
    let mut client = McpClient::new(opts).await?;

    if let Err(e) = client.initialize().await {
        tracing::warn!(
            base_url = %client.base_url(),
            error = %e,
            "initialization failed, listing tools anyway"
        );
    }

    Ok(client.list_tools().await)
}

pub async fn check_server(
    server_url: &str,
    timeout: Duration,
) -> Result<Vec<ToolDescriptor>, McpError> {
    check_with_options(ClientOptions::new(server_url).timeout(timeout)).await
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
