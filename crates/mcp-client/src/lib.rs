//! `mb-mcp-client`: MCP (Model Context Protocol) client for mcp-bench.
//!
//! This crate provides:
//! - JSON-RPC 2.0 protocol types for the `initialize`, `tools/list` and
//!   `tools/call` methods.
//! - An HTTP transport that POSTs each message and decodes plain JSON or
//!   SSE-framed responses.
//! - An [`McpClient`] that owns one session: session id resolution, lazy
//!   handshake, request id sequencing.
//! - [`ToolAdapter`]s that expose discovered tools to agent frameworks as
//!   infallible text-returning callables.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::time::Duration;
//! use mb_mcp_client::{ClientOptions, McpClient};
//!
//! let mut client = McpClient::new(
//!     ClientOptions::new("http://localhost:8080").timeout(Duration::from_secs(10)),
//! )
//! .await?;
//!
//! // Best-effort: an unreachable server yields an empty list.
//! for tool in client.list_tools().await {
//!     println!("{}", tool.name);
//! }
//!
//! let result = client.call_tool("pods_list", None).await?;
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod protocol;
pub mod session;
pub mod sse;
pub mod tools;
pub mod transport;

// Re-exports for convenience.
pub use client::{ClientOptions, InitializeOutcome, McpClient, SessionState};
pub use config::McpConfig;
pub use error::{ErrorKind, McpError};
pub use protocol::ToolDescriptor;
pub use session::{Endpoint, KnownSessions, SessionSource};
pub use tools::{check_server, render_result, tools_for_server, SharedClient, ToolAdapter};
pub use transport::{HttpTransport, McpTransport};
