//! MCP transport layer.
//!
//! A transport moves one JSON-RPC message to the server and hands back
//! the decoded response envelope. JSON-RPC semantics (ids, `error`
//! members, result shapes) live in [`crate::client`].

use std::time::{Duration, Instant};

use async_trait::async_trait;
use mb_domain::trace::TraceEvent;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use serde_json::Value;

use crate::error::McpError;
use crate::protocol::{JsonRpcNotification, JsonRpcRequest};
use crate::session::SESSION_HEADER;
use crate::sse;

/// `Accept` header for every POST: plain JSON or an event stream.
pub const ACCEPT_JSON_OR_SSE: &str = "application/json, text/event-stream";

/// Longest response body snippet kept in a status error.
const MAX_ERROR_BODY_CHARS: usize = 512;

/// Trait for MCP server transports.
#[async_trait]
pub trait McpTransport: Send + Sync {
    /// Send a JSON-RPC request and return the decoded response envelope.
    async fn send_request(&self, request: &JsonRpcRequest) -> Result<Value, McpError>;

    /// Send a JSON-RPC notification. The response body is not inspected.
    async fn send_notification(&self, notification: &JsonRpcNotification) -> Result<(), McpError>;

    /// The URL this transport talks to.
    fn endpoint(&self) -> &str;
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// HTTP transport
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// JSON-RPC over HTTP POST, one exchange per message.
///
/// Every exchange is bounded by `timeout`. Responses may be plain JSON or
/// SSE-framed JSON (see [`crate::sse`]).
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: Client,
    endpoint: String,
    session_id: String,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(
        endpoint: impl Into<String>,
        session_id: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, McpError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| McpError::Client(e.to_string()))?;

        Ok(Self {
            http,
            endpoint: endpoint.into(),
            session_id: session_id.into(),
            timeout,
        })
    }

    /// The configured request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Build a POST carrying `message` and the standard MCP headers.
    fn post<T: Serialize>(&self, message: &T) -> Result<RequestBuilder, McpError> {
        let body = serde_json::to_vec(message)?;
        Ok(self
            .http
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, ACCEPT_JSON_OR_SSE)
            .header(SESSION_HEADER, &self.session_id)
            .body(body))
    }

    fn transport_error(&self, e: reqwest::Error) -> McpError {
        McpError::from_reqwest(&self.endpoint, self.timeout, e)
    }
}

#[async_trait]
impl McpTransport for HttpTransport {
    async fn send_request(&self, request: &JsonRpcRequest) -> Result<Value, McpError> {
        let start = Instant::now();
        let result = self.post(request)?.send().await;

        let resp = match result {
            Ok(resp) => resp,
            Err(e) => {
                emit_exchange(&self.endpoint, &request.method, 0, start);
                return Err(self.transport_error(e));
            }
        };

        let status = resp.status();
        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_owned();

        if !status.is_success() {
            emit_exchange(&self.endpoint, &request.method, status.as_u16(), start);
            let body = resp.text().await.unwrap_or_default();
            return Err(McpError::Status {
                endpoint: self.endpoint.clone(),
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        let body = resp.text().await.map_err(|e| self.transport_error(e))?;
        emit_exchange(&self.endpoint, &request.method, status.as_u16(), start);

        let envelope = sse::decode_body(&content_type, &body).map_err(|e| {
            tracing::warn!(
                endpoint = %self.endpoint,
                method = %request.method,
                content_type = %content_type,
                body_len = body.len(),
                body_start = %body.chars().take(200).collect::<String>(),
                "failed to decode MCP response body"
            );
            McpError::Framing {
                endpoint: self.endpoint.clone(),
                message: if sse::is_event_stream(&content_type) {
                    format!("invalid SSE response: {e}")
                } else {
                    format!("invalid JSON response: {e}")
                },
            }
        })?;

        tracing::debug!(
            id = request.id,
            method = %request.method,
            body_len = body.len(),
            "MCP response received"
        );
        Ok(envelope)
    }

    async fn send_notification(&self, notification: &JsonRpcNotification) -> Result<(), McpError> {
        let start = Instant::now();
        let resp = match self.post(notification)?.send().await {
            Ok(resp) => resp,
            Err(e) => {
                emit_exchange(&self.endpoint, &notification.method, 0, start);
                return Err(self.transport_error(e));
            }
        };

        let status = resp.status();
        emit_exchange(&self.endpoint, &notification.method, status.as_u16(), start);
        if !status.is_success() {
            tracing::debug!(
                endpoint = %self.endpoint,
                method = %notification.method,
                status = status.as_u16(),
                "notification answered with non-success status"
            );
        }
        Ok(())
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn emit_exchange(endpoint: &str, method: &str, status: u16, start: Instant) {
    TraceEvent::McpExchange {
        endpoint: endpoint.to_owned(),
        method: method.to_owned(),
        status,
        duration_ms: start.elapsed().as_millis() as u64,
    }
    .emit();
}
