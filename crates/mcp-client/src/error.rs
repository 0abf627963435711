//! Error taxonomy for MCP client operations.

use std::time::Duration;

use serde_json::Value;

use crate::protocol::JsonRpcError;

/// Coarse classification of an [`McpError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Connection failures, non-2xx statuses, unparseable bodies.
    Transport,
    /// The exchange did not complete within the configured timeout.
    Timeout,
    /// The server answered with a JSON-RPC `error` member.
    Protocol,
    /// A successful result did not have the shape the operation expects.
    Shape,
}

/// Errors specific to MCP operations.
#[derive(Debug, thiserror::Error)]
pub enum McpError {
    #[error("request to {endpoint} timed out after {timeout:?}")]
    Timeout { endpoint: String, timeout: Duration },

    #[error("connection to {endpoint} failed: {message}")]
    Connect { endpoint: String, message: String },

    #[error("HTTP {status} from {endpoint}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("HTTP error talking to {endpoint}: {message}")]
    Http { endpoint: String, message: String },

    #[error("invalid response from {endpoint}: {message}")]
    Framing { endpoint: String, message: String },

    #[error("JSON-RPC error ({code}): {message}")]
    Protocol {
        code: i64,
        message: String,
        data: Option<Value>,
    },

    #[error("unexpected {method} result shape: {payload}")]
    Shape { method: String, payload: Value },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

impl McpError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            McpError::Timeout { .. } => ErrorKind::Timeout,
            McpError::Protocol { .. } => ErrorKind::Protocol,
            McpError::Shape { .. } => ErrorKind::Shape,
            McpError::Connect { .. }
            | McpError::Status { .. }
            | McpError::Http { .. }
            | McpError::Framing { .. }
            | McpError::Json(_)
            | McpError::Client(_) => ErrorKind::Transport,
        }
    }

    /// The endpoint involved, when the failure happened on the wire.
    pub fn endpoint(&self) -> Option<&str> {
        match self {
            McpError::Timeout { endpoint, .. }
            | McpError::Connect { endpoint, .. }
            | McpError::Status { endpoint, .. }
            | McpError::Http { endpoint, .. }
            | McpError::Framing { endpoint, .. } => Some(endpoint),
            _ => None,
        }
    }

    /// HTTP status for [`McpError::Status`].
    pub fn status(&self) -> Option<u16> {
        match self {
            McpError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Classify a `reqwest` failure. Timeouts are checked first because a
    /// connect timeout reports both `is_timeout` and `is_connect`.
    pub(crate) fn from_reqwest(endpoint: &str, timeout: Duration, e: reqwest::Error) -> Self {
        if e.is_timeout() {
            McpError::Timeout {
                endpoint: endpoint.to_owned(),
                timeout,
            }
        } else if e.is_connect() {
            McpError::Connect {
                endpoint: endpoint.to_owned(),
                message: e.to_string(),
            }
        } else {
            McpError::Http {
                endpoint: endpoint.to_owned(),
                message: e.to_string(),
            }
        }
    }
}

impl From<JsonRpcError> for McpError {
    fn from(e: JsonRpcError) -> Self {
        McpError::Protocol {
            code: e.code,
            message: e.message,
            data: e.data,
        }
    }
}

impl From<McpError> for mb_domain::error::Error {
    fn from(e: McpError) -> Self {
        use mb_domain::error::Error;

        match e {
            McpError::Timeout { .. } => Error::Timeout(e.to_string()),
            McpError::Protocol { code, message, .. } => Error::Protocol { code, message },
            McpError::Shape { .. } => Error::Shape(e.to_string()),
            McpError::Json(inner) => Error::Json(inner),
            other => match other.endpoint() {
                Some(endpoint) => Error::Transport {
                    endpoint: endpoint.to_owned(),
                    message: other.to_string(),
                },
                None => Error::Other(other.to_string()),
            },
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
