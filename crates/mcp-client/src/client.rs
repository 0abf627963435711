//! The MCP session client.
//!
//! One [`McpClient`] owns one session with one server endpoint. Operations
//! take `&mut self`: the request counter and the session state are plain
//! owned fields, and a client shared between tasks must sit behind a lock
//! (see [`crate::tools::SharedClient`]).

use std::time::Duration;

use serde_json::{json, Map, Value};

use crate::error::McpError;
use crate::protocol::{
    self, CallToolParams, ClientInfo, JsonRpcNotification, JsonRpcRequest, ToolDescriptor,
    ToolsListPayload,
};
use crate::session::{self, Endpoint, KnownSessions};
use crate::transport::{HttpTransport, McpTransport};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Options
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Construction parameters for [`McpClient::new`].
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub server_url: String,
    pub timeout: Duration,
    /// Pre-agreed session id; resolved automatically when `None`.
    pub session_id: Option<String>,
    pub known_sessions: KnownSessions,
    pub client_info: ClientInfo,
}

impl ClientOptions {
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            timeout: DEFAULT_TIMEOUT,
            session_id: None,
            known_sessions: KnownSessions::default(),
            client_info: ClientInfo::default(),
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    pub fn known_sessions(mut self, known: KnownSessions) -> Self {
        self.known_sessions = known;
        self
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Session state
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Handshake state of a session.
///
/// `Initializing` is only observable if an `initialize` future was dropped
/// mid-flight; like `Failed`, it is retried by the next operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    Initializing,
    Ready,
    Failed { reason: String },
}

/// Result of [`McpClient::initialize`].
#[derive(Debug, Clone, PartialEq)]
pub enum InitializeOutcome {
    /// The handshake ran; carries the server's `initialize` result.
    Initialized(Value),
    /// The session was already ready; nothing was sent.
    AlreadyInitialized,
}

impl InitializeOutcome {
    pub fn is_already_initialized(&self) -> bool {
        matches!(self, InitializeOutcome::AlreadyInitialized)
    }

    /// The server payload, or `{"status": "already_initialized"}`.
    pub fn into_value(self) -> Value {
        match self {
            InitializeOutcome::Initialized(v) => v,
            InitializeOutcome::AlreadyInitialized => json!({ "status": "already_initialized" }),
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Client
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub struct McpClient {
    endpoint: Endpoint,
    session_id: String,
    transport: Box<dyn McpTransport>,
    next_id: u64,
    state: SessionState,
    protocol_version: String,
    client_info: ClientInfo,
}

impl std::fmt::Debug for McpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("McpClient")
            .field("endpoint", &self.endpoint.url())
            .field("session_id", &self.session_id)
            .field("next_id", &self.next_id)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl McpClient {
    /// Bind a client to `opts.server_url`, resolving the session id when
    /// none is supplied. Does not perform the handshake.
    pub async fn new(opts: ClientOptions) -> Result<Self, McpError> {
        let endpoint = Endpoint::new(&opts.server_url);
        let resolved = session::resolve_session_id(
            &endpoint,
            opts.session_id.as_deref(),
            &opts.known_sessions,
            opts.timeout,
        )
        .await;

        let transport = HttpTransport::new(endpoint.url(), &resolved.id, opts.timeout)?;
        tracing::info!(
            base_url = %endpoint.base_url(),
            session_id = %resolved.id,
            "MCP client ready"
        );

        Ok(Self::with_transport(endpoint, resolved.id, Box::new(transport))
            .with_client_info(opts.client_info))
    }

    /// Build a client over an arbitrary transport.
    pub fn with_transport(
        endpoint: Endpoint,
        session_id: impl Into<String>,
        transport: Box<dyn McpTransport>,
    ) -> Self {
        Self {
            endpoint,
            session_id: session_id.into(),
            transport,
            next_id: 1,
            state: SessionState::Uninitialized,
            protocol_version: protocol::PROTOCOL_VERSION.into(),
            client_info: ClientInfo::default(),
        }
    }

    pub fn with_client_info(mut self, client_info: ClientInfo) -> Self {
        self.client_info = client_info;
        self
    }

    pub fn base_url(&self) -> &str {
        self.endpoint.base_url()
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.url()
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn protocol_version(&self) -> &str {
        &self.protocol_version
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == SessionState::Ready
    }

    /// The id the next call-type request will carry.
    pub fn next_request_id(&self) -> u64 {
        self.next_id
    }

    // ── operations ───────────────────────────────────────────────────

    /// Perform the MCP handshake.
    ///
    /// A ready session returns [`InitializeOutcome::AlreadyInitialized`]
    /// without touching the network. On success the `initialized`
    /// notification is sent before the session is marked ready; its
    /// delivery failures are logged and otherwise ignored.
    pub async fn initialize(&mut self) -> Result<InitializeOutcome, McpError> {
        if self.is_ready() {
            tracing::debug!(base_url = %self.base_url(), "MCP session already initialized");
            return Ok(InitializeOutcome::AlreadyInitialized);
        }

        let params = serde_json::to_value(protocol::initialize_params(
            &self.protocol_version,
            &self.client_info,
        ))?;

        tracing::info!(base_url = %self.base_url(), "initializing MCP session");
        self.state = SessionState::Initializing;

        match self.request(protocol::METHOD_INITIALIZE, Some(params)).await {
            Ok(result) => {
                self.notify_initialized().await;
                self.state = SessionState::Ready;
                tracing::info!(base_url = %self.base_url(), "MCP session initialized");
                Ok(InitializeOutcome::Initialized(result))
            }
            Err(e) => {
                tracing::error!(
                    base_url = %self.base_url(),
                    error = %e,
                    "failed to initialize MCP session"
                );
                self.state = SessionState::Failed {
                    reason: e.to_string(),
                };
                Err(e)
            }
        }
    }

    /// List the server's tools, degrading to an empty list on any failure.
    ///
    /// Use [`McpClient::try_list_tools`] to see why discovery failed.
    pub async fn list_tools(&mut self) -> Vec<ToolDescriptor> {
        match self.try_list_tools().await {
            Ok(tools) => tools,
            Err(McpError::Shape { payload, .. }) => {
                tracing::warn!(
                    base_url = %self.base_url(),
                    payload = %payload,
                    "unexpected tools/list result, treating as empty"
                );
                Vec::new()
            }
            Err(e) => {
                tracing::error!(
                    base_url = %self.base_url(),
                    kind = ?e.kind(),
                    error = %e,
                    "failed to list tools"
                );
                Vec::new()
            }
        }
    }

    /// List the server's tools, propagating every failure.
    ///
    /// Entries that are not valid tool descriptors are skipped with a
    /// warning; a result that is neither `{"tools": [...]}` nor an array is
    /// a [`McpError::Shape`].
    pub async fn try_list_tools(&mut self) -> Result<Vec<ToolDescriptor>, McpError> {
        self.ensure_ready().await?;

        tracing::info!(base_url = %self.base_url(), "listing tools");
        let result = self
            .request(protocol::METHOD_TOOLS_LIST, Some(Value::Object(Map::new())))
            .await?;

        let entries = ToolsListPayload::from_result(result).into_entries().map_err(|payload| {
            McpError::Shape {
                method: protocol::METHOD_TOOLS_LIST.into(),
                payload,
            }
        })?;

        let tools: Vec<ToolDescriptor> = entries
            .into_iter()
            .filter_map(|entry| match serde_json::from_value::<ToolDescriptor>(entry.clone()) {
                Ok(tool) => Some(tool),
                Err(e) => {
                    tracing::warn!(entry = %entry, error = %e, "skipping malformed tool entry");
                    None
                }
            })
            .collect();

        tracing::info!(
            base_url = %self.base_url(),
            tool_count = tools.len(),
            "tools listed"
        );
        Ok(tools)
    }

    /// Invoke `name` with `arguments` (`None` is sent as `{}`).
    ///
    /// The tool name is not checked against `tools/list`. The server's
    /// `result` is returned as-is.
    pub async fn call_tool(
        &mut self,
        name: &str,
        arguments: Option<Map<String, Value>>,
    ) -> Result<Value, McpError> {
        self.ensure_ready().await?;

        let params = CallToolParams {
            name: name.to_owned(),
            arguments: arguments.unwrap_or_default(),
        };
        tracing::info!(base_url = %self.base_url(), tool = %name, "calling tool");
        tracing::debug!(tool = %name, arguments = ?params.arguments, "tool arguments");

        let params = serde_json::to_value(params)?;
        match self.request(protocol::METHOD_TOOLS_CALL, Some(params)).await {
            Ok(result) => {
                tracing::info!(tool = %name, "tool executed");
                tracing::debug!(
                    tool = %name,
                    result_start = %result.to_string().chars().take(200).collect::<String>(),
                    "tool result"
                );
                Ok(result)
            }
            Err(e) => {
                tracing::error!(tool = %name, kind = ?e.kind(), error = %e, "tool call failed");
                Err(e)
            }
        }
    }

    // ── internals ────────────────────────────────────────────────────

    /// Drive the state machine to `Ready`, handshaking if needed.
    async fn ensure_ready(&mut self) -> Result<(), McpError> {
        match self.state {
            SessionState::Ready => Ok(()),
            SessionState::Uninitialized
            | SessionState::Initializing
            | SessionState::Failed { .. } => self.initialize().await.map(|_| ()),
        }
    }

    /// Issue one call-type request. The id is consumed even if the
    /// exchange fails, so ids are never reused.
    async fn request(&mut self, method: &str, params: Option<Value>) -> Result<Value, McpError> {
        let id = self.next_id;
        self.next_id += 1;

        let request = JsonRpcRequest::new(id, method, params);
        tracing::debug!(endpoint = %self.endpoint, id, method, "sending MCP request");

        let envelope = self.transport.send_request(&request).await?;
        protocol::split_envelope(envelope).map_err(|err| {
            tracing::error!(
                endpoint = %self.endpoint,
                method,
                code = err.code,
                message = %err.message,
                "MCP server returned an error"
            );
            McpError::from(err)
        })
    }

    async fn notify_initialized(&self) {
        let notification = JsonRpcNotification::new(protocol::METHOD_INITIALIZED);
        match self.transport.send_notification(&notification).await {
            Ok(()) => tracing::debug!(endpoint = %self.endpoint, "sent initialized notification"),
            Err(e) => tracing::warn!(
                endpoint = %self.endpoint,
                error = %e,
                "failed to send initialized notification"
            ),
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
