//! MCP server connection settings (the `[mcp]` section).
//!
//! The client logic lives in the `mb-mcp-client` crate; these are only the
//! deserializable knobs.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Connection settings for the benchmarked MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpConfig {
    /// Server URL. `/mcp` is appended unless the URL already ends with it.
    #[serde(default = "d_url")]
    pub url: String,

    /// Per-exchange timeout in seconds.
    #[serde(default = "d_timeout_secs")]
    pub timeout_secs: u64,

    /// Fixed session id. When unset the client resolves one itself.
    #[serde(default)]
    pub session_id: Option<String>,

    /// Hostname substring → session id, for deployments that expect a
    /// pre-agreed id instead of handing one out.
    #[serde(default)]
    pub known_sessions: BTreeMap<String, String>,
}

impl McpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// The configured session id, ignoring blank values.
    pub fn fixed_session_id(&self) -> Option<&str> {
        self.session_id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

impl Default for McpConfig {
    fn default() -> Self {
        Self {
            url: d_url(),
            timeout_secs: d_timeout_secs(),
            session_id: None,
            known_sessions: BTreeMap::new(),
        }
    }
}

fn d_url() -> String {
    "http://localhost:8080".into()
}

fn d_timeout_secs() -> u64 {
    10
}
