mod mcp;
mod observability;

pub use mcp::*;
pub use observability::*;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::error::{Error, Result};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Top-level config
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub mcp: McpConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Parse a TOML document. Missing sections and fields take defaults.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|e| Error::Config(e.to_string()))
    }

    /// Load the file at `path`, or the defaults when it does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
            .map_err(|e| Error::Config(format!("parsing {}: {e}", path.display())))
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Config validation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Severity level for a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSeverity {
    Error,
    Warning,
}

/// A single configuration validation issue.
#[derive(Debug, Clone)]
pub struct ConfigIssue {
    pub severity: ConfigSeverity,
    pub field: String,
    pub message: String,
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            ConfigSeverity::Error => "ERROR",
            ConfigSeverity::Warning => "WARN",
        };
        write!(f, "[{tag}] {}: {}", self.field, self.message)
    }
}

impl Config {
    /// Validate the configuration and return a list of issues.
    ///
    /// Returns an empty vec when everything looks good.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        let url = self.mcp.url.trim();
        if url.is_empty() {
            issues.push(ConfigIssue {
                severity: ConfigSeverity::Error,
                field: "mcp.url".into(),
                message: "url must not be empty".into(),
            });
        } else if !(url.starts_with("http://") || url.starts_with("https://")) {
            issues.push(ConfigIssue {
                severity: ConfigSeverity::Error,
                field: "mcp.url".into(),
                message: format!("url must use http:// or https:// (got {url:?})"),
            });
        }

        if self.mcp.timeout_secs == 0 {
            issues.push(ConfigIssue {
                severity: ConfigSeverity::Error,
                field: "mcp.timeout_secs".into(),
                message: "timeout must be greater than 0".into(),
            });
        }

        if matches!(self.mcp.session_id.as_deref(), Some(s) if s.trim().is_empty()) {
            issues.push(ConfigIssue {
                severity: ConfigSeverity::Warning,
                field: "mcp.session_id".into(),
                message: "empty session_id is ignored; the id will be resolved".into(),
            });
        }

        for (host, session) in &self.mcp.known_sessions {
            // An empty key is a substring of every URL and would shadow the probe.
            if host.trim().is_empty() {
                issues.push(ConfigIssue {
                    severity: ConfigSeverity::Error,
                    field: "mcp.known_sessions".into(),
                    message: "host key must not be empty".into(),
                });
            }
            if session.trim().is_empty() {
                issues.push(ConfigIssue {
                    severity: ConfigSeverity::Error,
                    field: format!("mcp.known_sessions.{host}"),
                    message: "session id must not be empty".into(),
                });
            }
        }

        issues
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_is_a_config_error() {
        let err = Config::from_toml_str("[mcp\nurl = ").unwrap_err();
        assert!(matches!(err, Error::Config(_)), "{err:?}");
    }

    #[test]
    fn missing_file_loads_defaults() {
        let cfg = Config::load(Path::new("/nonexistent/mcp-bench.toml")).unwrap();
        assert_eq!(cfg.mcp.timeout_secs, 10);
    }

    #[test]
    fn default_config_is_valid() {
        assert!(Config::default().validate().is_empty());
    }

    #[test]
    fn empty_url_is_an_error() {
        let mut cfg = Config::default();
        cfg.mcp.url = "  ".into();
        let issues = cfg.validate();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, ConfigSeverity::Error);
        assert_eq!(issues[0].field, "mcp.url");
    }

    #[test]
    fn non_http_scheme_is_an_error() {
        let mut cfg = Config::default();
        cfg.mcp.url = "ftp://example.com".into();
        let issues = cfg.validate();
        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.contains("http://"));
    }

    #[test]
    fn zero_timeout_is_an_error() {
        let mut cfg = Config::default();
        cfg.mcp.timeout_secs = 0;
        let issues = cfg.validate();
        assert_eq!(issues[0].field, "mcp.timeout_secs");
    }

    #[test]
    fn empty_known_session_entries_are_errors() {
        let mut cfg = Config::default();
        cfg.mcp.known_sessions.insert(String::new(), "x".into());
        cfg.mcp.known_sessions.insert("host.example".into(), " ".into());
        let issues = cfg.validate();
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().all(|i| i.severity == ConfigSeverity::Error));
    }

    #[test]
    fn blank_session_id_is_a_warning() {
        let mut cfg = Config::default();
        cfg.mcp.session_id = Some(String::new());
        let issues = cfg.validate();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, ConfigSeverity::Warning);
    }

    #[test]
    fn issue_display_includes_tag_and_field() {
        let issue = ConfigIssue {
            severity: ConfigSeverity::Warning,
            field: "mcp.session_id".into(),
            message: "ignored".into(),
        };
        assert_eq!(issue.to_string(), "[WARN] mcp.session_id: ignored");
    }
}
