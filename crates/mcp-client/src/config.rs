//! Bridge from the `[mcp]` config section to [`ClientOptions`].
//!
//! The canonical config types live in `mb_domain::config` so the CLI can
//! load them without depending on the client internals.

pub use mb_domain::config::McpConfig;

use crate::client::ClientOptions;
use crate::session::KnownSessions;

impl From<&McpConfig> for ClientOptions {
    fn from(cfg: &McpConfig) -> Self {
        let mut opts = ClientOptions::new(cfg.url.clone())
            .timeout(cfg.timeout())
            .known_sessions(KnownSessions::from(cfg.known_sessions.clone()));
        if let Some(id) = cfg.fixed_session_id() {
            opts = opts.session_id(id);
        }
        opts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn options_follow_config() {
        let raw = r#"{
            "url": "https://github-ai.n3s.ai/",
            "timeout_secs": 30,
            "known_sessions": { "github-ai.n3s.ai": "github-mcp-session" }
        }"#;
        let cfg: McpConfig = serde_json::from_str(raw).unwrap();
        let opts = ClientOptions::from(&cfg);
        assert_eq!(opts.server_url, "https://github-ai.n3s.ai/");
        assert_eq!(opts.timeout, Duration::from_secs(30));
        assert!(opts.session_id.is_none());
        assert_eq!(
            opts.known_sessions.lookup("https://github-ai.n3s.ai"),
            Some(("github-ai.n3s.ai", "github-mcp-session"))
        );
    }

    #[test]
    fn blank_session_id_is_dropped() {
        let cfg = McpConfig {
            session_id: Some(" ".into()),
            ..McpConfig::default()
        };
        assert!(ClientOptions::from(&cfg).session_id.is_none());

        let cfg = McpConfig {
            session_id: Some("fixed".into()),
            ..McpConfig::default()
        };
        assert_eq!(ClientOptions::from(&cfg).session_id.as_deref(), Some("fixed"));
    }
}
