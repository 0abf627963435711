//! Session identity: endpoint normalization and session id resolution.
//!
//! Resolution order when the caller does not supply an id:
//! 1. a known-host table (hostname substring of the base URL → id),
//! 2. the `mcp-session-id` header of a GET probe against the endpoint,
//! 3. a freshly generated UUID v4.

use std::collections::BTreeMap;
use std::fmt;
use std::time::{Duration, Instant};

use mb_domain::trace::TraceEvent;
use reqwest::header::ACCEPT;
use uuid::Uuid;

use crate::sse::EVENT_STREAM;

/// Header carrying the session id on every request.
pub const SESSION_HEADER: &str = "mcp-session-id";

/// Upper bound for the discovery probe, regardless of the client timeout.
pub const PROBE_TIMEOUT_CAP: Duration = Duration::from_secs(5);

const MCP_SUFFIX: &str = "/mcp";

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Endpoint
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A server base URL and the MCP endpoint derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    base_url: String,
    url: String,
}

impl Endpoint {
    /// Strip one trailing slash, then append `/mcp` unless already present.
    pub fn new(server_url: &str) -> Self {
        let base_url = server_url
            .strip_suffix('/')
            .unwrap_or(server_url)
            .to_owned();
        let url = if base_url.ends_with(MCP_SUFFIX) {
            base_url.clone()
        } else {
            format!("{base_url}{MCP_SUFFIX}")
        };
        Self { base_url, url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Known hosts
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Static hostname → session id table for deployments with pre-agreed ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnownSessions {
    entries: BTreeMap<String, String>,
}

impl KnownSessions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, host: impl Into<String>, session_id: impl Into<String>) -> Self {
        self.entries.insert(host.into(), session_id.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Find the entry whose host occurs in `base_url`. The longest matching
    /// host wins so that overlapping entries resolve deterministically.
    /// Blank hosts and ids never match.
    pub fn lookup(&self, base_url: &str) -> Option<(&str, &str)> {
        self.entries
            .iter()
            .filter(|(host, id)| !host.is_empty() && !id.is_empty())
            .filter(|(host, _)| base_url.contains(host.as_str()))
            .max_by_key(|(host, _)| host.len())
            .map(|(host, id)| (host.as_str(), id.as_str()))
    }
}

impl From<BTreeMap<String, String>> for KnownSessions {
    fn from(entries: BTreeMap<String, String>) -> Self {
        Self { entries }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for KnownSessions {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Resolution
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Where a session id came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionSource {
    Supplied,
    KnownHost,
    ServerHeader,
    Generated,
}

impl SessionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionSource::Supplied => "supplied",
            SessionSource::KnownHost => "known_host",
            SessionSource::ServerHeader => "server_header",
            SessionSource::Generated => "generated",
        }
    }
}

impl fmt::Display for SessionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved, non-empty session id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSession {
    pub id: String,
    pub source: SessionSource,
}

/// Resolve a session id for `endpoint`. Never fails: every probe failure
/// falls through to a generated id.
pub async fn resolve_session_id(
    endpoint: &Endpoint,
    supplied: Option<&str>,
    known: &KnownSessions,
    timeout: Duration,
) -> ResolvedSession {
    let resolved = match supplied.map(str::trim).filter(|s| !s.is_empty()) {
        Some(id) => ResolvedSession {
            id: id.to_owned(),
            source: SessionSource::Supplied,
        },
        None => resolve_unsupplied(endpoint, known, timeout).await,
    };

    tracing::info!(
        endpoint = %endpoint,
        source = %resolved.source,
        session_id = %resolved.id,
        "MCP session id resolved"
    );
    TraceEvent::McpSessionResolved {
        endpoint: endpoint.url().to_owned(),
        source: resolved.source.as_str().to_owned(),
        session_id: resolved.id.clone(),
    }
    .emit();

    resolved
}

async fn resolve_unsupplied(
    endpoint: &Endpoint,
    known: &KnownSessions,
    timeout: Duration,
) -> ResolvedSession {
    if let Some((host, id)) = known.lookup(endpoint.base_url()) {
        tracing::debug!(host, "using known session id for host");
        return ResolvedSession {
            id: id.to_owned(),
            source: SessionSource::KnownHost,
        };
    }

    if let Some(id) = probe_session_header(endpoint, timeout).await {
        return ResolvedSession {
            id,
            source: SessionSource::ServerHeader,
        };
    }

    ResolvedSession {
        id: Uuid::new_v4().to_string(),
        source: SessionSource::Generated,
    }
}

/// GET the endpoint asking for an event stream and read `mcp-session-id`
/// from the response headers, whatever the status. Redirects are not
/// followed so the header of the first hop is the one that counts.
pub async fn probe_session_header(endpoint: &Endpoint, timeout: Duration) -> Option<String> {
    let probe_timeout = timeout.min(PROBE_TIMEOUT_CAP);
    let http = match reqwest::Client::builder()
        .timeout(probe_timeout)
        .redirect(reqwest::redirect::Policy::none())
        .build()
    {
        Ok(http) => http,
        Err(e) => {
            tracing::warn!(error = %e, "failed to build session probe client");
            return None;
        }
    };

    tracing::debug!(endpoint = %endpoint, "probing for MCP session id");
    let start = Instant::now();
    let resp = match http
        .get(endpoint.url())
        .header(ACCEPT, EVENT_STREAM)
        .send()
        .await
    {
        Ok(resp) => resp,
        Err(e) if e.is_timeout() => {
            tracing::warn!(
                endpoint = %endpoint,
                timeout_ms = probe_timeout.as_millis() as u64,
                "timeout while probing for MCP session id"
            );
            return None;
        }
        Err(e) => {
            tracing::warn!(endpoint = %endpoint, error = %e, "session id probe failed");
            return None;
        }
    };

    let status = resp.status().as_u16();
    tracing::debug!(
        endpoint = %endpoint,
        status,
        duration_ms = start.elapsed().as_millis() as u64,
        "session id probe answered"
    );

    let id = resp
        .headers()
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned);

    if id.is_none() {
        tracing::debug!(status, "no mcp-session-id header in probe response");
    }
    id
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
