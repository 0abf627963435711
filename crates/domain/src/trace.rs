use serde::Serialize;

/// Structured trace events emitted across all mcp-bench crates.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event")]
pub enum TraceEvent {
    /// One HTTP exchange with an MCP endpoint (call or notification).
    McpExchange {
        endpoint: String,
        method: String,
        /// HTTP status, or `0` when no response was received.
        status: u16,
        duration_ms: u64,
    },
    McpSessionResolved {
        endpoint: String,
        source: String,
        session_id: String,
    },
    BenchStep {
        step: String,
        duration_ms: u64,
        ok: bool,
    },
}

impl TraceEvent {
    pub fn emit(&self) {
        let json = serde_json::to_string(self).unwrap_or_default();
        tracing::info!(trace_event = %json, "mb_event");
    }
}
