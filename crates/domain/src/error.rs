/// Shared error type used across all mcp-bench crates.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config: {0}")]
    Config(String),

    /// The MCP server could not be reached or answered with garbage.
    #[error("MCP transport ({endpoint}): {message}")]
    Transport { endpoint: String, message: String },

    #[error("timeout: {0}")]
    Timeout(String),

    /// A JSON-RPC `error` member.
    #[error("MCP error {code}: {message}")]
    Protocol { code: i64, message: String },

    #[error("unexpected MCP payload: {0}")]
    Shape(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;
