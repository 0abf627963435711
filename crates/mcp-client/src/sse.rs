//! Response body decoding for MCP over HTTP.
//!
//! Servers answer a POST either with a plain JSON body or with the same
//! JSON framed as a Server-Sent Events stream. Only the first `data: `
//! line matters; a stream without one is retried as plain JSON.

use serde_json::Value;

pub const EVENT_STREAM: &str = "text/event-stream";

const DATA_PREFIX: &str = "data: ";

/// Whether a `Content-Type` value declares an event stream.
pub fn is_event_stream(content_type: &str) -> bool {
    content_type.contains(EVENT_STREAM)
}

/// The payload of the first `data: ` line, if any.
pub fn first_data_payload(body: &str) -> Option<&str> {
    body.trim().lines().find_map(|line| line.strip_prefix(DATA_PREFIX))
}

/// Decode an SSE-framed body: the first `data: ` payload, or the whole
/// body when no data line exists.
pub fn decode_event_stream(body: &str) -> serde_json::Result<Value> {
    match first_data_payload(body) {
        Some(payload) => serde_json::from_str(payload),
        None => serde_json::from_str(body),
    }
}

/// Decode a response body according to its declared content type.
pub fn decode_body(content_type: &str, body: &str) -> serde_json::Result<Value> {
    if is_event_stream(content_type) {
        decode_event_stream(body)
    } else {
        serde_json::from_str(body)
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
