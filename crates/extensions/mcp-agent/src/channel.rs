//! The agent evaluation channel: an MCP server driven as a [`UsabilityEvaluator`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::{Map, Value};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uihealth_config::AgentConfig;
use uihealth_protocols::{AgentError, ContentPart, UsabilityEvaluator, UsabilityReply, UsabilityRequest};

use crate::client::{McpClient, McpClientError};
use crate::protocol::{McpContent, McpToolResult};
use crate::transport::{StdioTransport, Transport, TransportError};

/// Observable lifecycle of an [`AgentChannel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    Disconnected,
    Connected,
    Closed,
}

enum Inner {
    Disconnected,
    Connected(McpClient),
    Closed,
}

/// One MCP server process, one tool, one call in flight at a time.
pub struct AgentChannel {
    settings: AgentConfig,
    inner: Mutex<Inner>,
}

impl AgentChannel {
    pub fn new(settings: AgentConfig) -> Self {
        Self {
            settings,
            inner: Mutex::new(Inner::Disconnected),
        }
    }

    /// Spawn the configured command and run the handshake.
    pub async fn connect(&self) -> Result<(), AgentError> {
        let transport = StdioTransport::spawn(&self.settings.command, &self.settings.args)
            .map_err(|e| AgentError::Spawn(e.to_string()))?
            .with_shutdown_grace(Duration::from_millis(self.settings.shutdown_grace_ms));

        self.attach(Arc::new(transport)).await
    }

    /// Run the handshake over an already-open transport.
    ///
    /// On handshake failure the transport is closed and the channel ends up
    /// `Closed`.
    pub async fn attach(&self, transport: Arc<dyn Transport>) -> Result<(), AgentError> {
        let mut inner = self.inner.lock().await;
        if !matches!(*inner, Inner::Disconnected) {
            return Err(AgentError::Handshake("channel already used".to_string()));
        }

        let mut client = McpClient::new(transport);
        if let Err(e) = client.initialize().await {
            warn!("MCP handshake failed: {}", e);
            if let Err(close_err) = client.close().await {
                debug!("Closing after failed handshake: {}", close_err);
            }
            *inner = Inner::Closed;
            return Err(handshake_error(e));
        }

        let version = client
            .server_info()
            .and_then(|info| info.pointer("/serverInfo/version"))
            .and_then(Value::as_str)
            .unwrap_or("unknown version");
        info!("Agent channel connected ({}, server {})", self.settings.command, version);
        *inner = Inner::Connected(client);
        Ok(())
    }

    pub async fn state(&self) -> ChannelState {
        match *self.inner.lock().await {
            Inner::Disconnected => ChannelState::Disconnected,
            Inner::Connected(_) => ChannelState::Connected,
            Inner::Closed => ChannelState::Closed,
        }
    }

    /// Close the transport and stop the server. Safe to call in any state.
    pub async fn close(&self) -> Result<(), AgentError> {
        let previous = std::mem::replace(&mut *self.inner.lock().await, Inner::Closed);
        if let Inner::Connected(client) = previous {
            info!("Closing agent channel");
            client
                .close()
                .await
                .map_err(|e| AgentError::Invocation(format!("close failed: {}", e)))?;
        }
        Ok(())
    }

    fn call_timeout(&self) -> Option<Duration> {
        self.settings.call_timeout_secs.map(Duration::from_secs)
    }
}

#[async_trait]
impl UsabilityEvaluator for AgentChannel {
    async fn evaluate(&self, request: UsabilityRequest) -> Result<UsabilityReply, AgentError> {
        let inner = self.inner.lock().await;
        let client = match &*inner {
            Inner::Connected(client) => client,
            Inner::Disconnected | Inner::Closed => return Err(AgentError::Closed),
        };

        let keys = &self.settings.arguments;
        let mut arguments = Map::new();
        arguments.insert(keys.url.clone(), Value::String(request.url));
        arguments.insert(keys.task.clone(), Value::String(request.task));
        arguments.insert(keys.headless.clone(), Value::Bool(request.headless));
        let arguments = Value::Object(arguments);
        let call = client.call_tool(&self.settings.tool, arguments);

        let result = match self.call_timeout() {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| AgentError::Timeout(limit.as_secs()))?,
            None => call.await,
        };

        result.map(into_reply).map_err(invocation_error)
    }
}

fn handshake_error(error: McpClientError) -> AgentError {
    AgentError::Handshake(error.to_string())
}

fn invocation_error(error: McpClientError) -> AgentError {
    match error {
        McpClientError::Transport(TransportError::Closed) => AgentError::Closed,
        other => AgentError::Invocation(other.to_string()),
    }
}

/// Keep text and image parts in order; images are decoded, empty or
/// undecodable ones are dropped.
fn into_reply(result: McpToolResult) -> UsabilityReply {
    let parts = result
        .content
        .into_iter()
        .filter_map(|content| match content {
            McpContent::Text { text } => Some(ContentPart::Text(text)),
            McpContent::Image { data, .. } if data.is_empty() => None,
            McpContent::Image { data, .. } => match STANDARD.decode(data.trim()) {
                Ok(bytes) => Some(ContentPart::Image(bytes)),
                Err(e) => {
                    warn!("Dropping undecodable image part: {}", e);
                    None
                }
            },
            McpContent::Resource { .. } | McpContent::Unknown => None,
        })
        .collect();

    UsabilityReply {
        parts,
        is_error: result.is_error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockTransport, Step};
    use crate::protocol::McpError;
    use serde_json::json;

    fn init_reply() -> Step {
        Step::Reply(json!({"protocolVersion": "2024-11-05", "serverInfo": {"name": "mock"}}))
    }

    fn request() -> UsabilityRequest {
        UsabilityRequest::new("http://localhost:8050/signals", "Evaluate the Signals page")
    }

    async fn connected(steps: Vec<Step>, settings: AgentConfig) -> (AgentChannel, Arc<MockTransport>) {
        let mut all = vec![init_reply()];
        all.extend(steps);
        let transport = Arc::new(MockTransport::new(all));
        let channel = AgentChannel::new(settings);
        channel.attach(transport.clone()).await.unwrap();
        (channel, transport)
    }

    #[tokio::test]
    async fn test_lifecycle() {
        let transport = Arc::new(MockTransport::new(vec![init_reply()]));
        let channel = AgentChannel::new(AgentConfig::default());
        assert_eq!(channel.state().await, ChannelState::Disconnected);

        channel.attach(transport.clone()).await.unwrap();
        assert_eq!(channel.state().await, ChannelState::Connected);
        assert_eq!(transport.notifications(), vec!["notifications/initialized".to_string()]);

        channel.close().await.unwrap();
        assert_eq!(channel.state().await, ChannelState::Closed);
        assert!(transport.is_closed());

        // Closing again is harmless; evaluating is not.
        channel.close().await.unwrap();
        assert!(matches!(channel.evaluate(request()).await, Err(AgentError::Closed)));
    }

    #[tokio::test]
    async fn test_evaluate_before_connect() {
        let channel = AgentChannel::new(AgentConfig::default());
        assert!(matches!(channel.evaluate(request()).await, Err(AgentError::Closed)));
    }

    #[tokio::test]
    async fn test_handshake_failure_is_fatal() {
        let transport = Arc::new(MockTransport::new(vec![Step::Fail(McpError::new(-32603, "boom"))]));
        let channel = AgentChannel::new(AgentConfig::default());

        let err = channel.attach(transport.clone()).await.unwrap_err();
        assert!(matches!(err, AgentError::Handshake(_)));
        assert!(err.is_fatal());
        assert!(transport.is_closed());
        assert_eq!(channel.state().await, ChannelState::Closed);
    }

    #[tokio::test]
    async fn test_spawn_failure_is_fatal() {
        let settings = AgentConfig {
            command: "uihealth-no-such-agent".to_string(),
            args: vec![],
            ..AgentConfig::default()
        };
        let channel = AgentChannel::new(settings);

        let err = channel.connect().await.unwrap_err();
        assert!(matches!(err, AgentError::Spawn(_)));
        assert!(err.is_fatal());
        assert_eq!(channel.state().await, ChannelState::Disconnected);
    }

    #[tokio::test]
    async fn test_tool_call_shape_and_reply() {
        let (channel, transport) = connected(
            vec![Step::Reply(json!({
                "content": [
                    {"type": "text", "text": "Table renders"},
                    {"type": "image", "data": "iVBORw0KGgo=", "mimeType": "image/png"},
                    {"type": "text", "text": "ignored second text"}
                ]
            }))],
            AgentConfig::default(),
        )
        .await;

        let reply = channel.evaluate(request()).await.unwrap();
        assert_eq!(reply.first_text(), Some("Table renders"));
        assert_eq!(reply.first_image(), Some(&b"\x89PNG\r\n\x1a\n"[..]));
        assert!(!reply.is_error);

        let call = &transport.requests()[1];
        assert_eq!(call.method, "tools/call");
        let params = call.params.as_ref().unwrap();
        assert_eq!(params["name"], "evaluate_usability");
        assert_eq!(params["arguments"]["url"], "http://localhost:8050/signals");
        assert_eq!(params["arguments"]["task"], "Evaluate the Signals page");
        assert_eq!(params["arguments"]["headless"], true);
    }

    #[tokio::test]
    async fn test_custom_tool_and_argument_names() {
        let mut settings = AgentConfig::default();
        settings.tool = "web_eval_agent".to_string();
        settings.arguments.headless = "headless_browser".to_string();
        let (channel, transport) = connected(
            vec![Step::Reply(json!({"content": [{"type": "text", "text": "fine"}]}))],
            settings,
        )
        .await;

        channel.evaluate(request()).await.unwrap();

        let params = transport.requests()[1].params.clone().unwrap();
        assert_eq!(params["name"], "web_eval_agent");
        let arguments = params["arguments"].as_object().unwrap();
        assert_eq!(arguments["headless_browser"], true);
        assert_eq!(arguments["url"], "http://localhost:8050/signals");
        assert!(!arguments.contains_key("headless"));
    }

    #[tokio::test]
    async fn test_error_flag_and_bad_image() {
        let (channel, _) = connected(
            vec![Step::Reply(json!({
                "content": [
                    {"type": "image", "base64": "***not base64***"},
                    {"type": "image", "data": ""}
                ],
                "isError": true
            }))],
            AgentConfig::default(),
        )
        .await;

        let reply = channel.evaluate(request()).await.unwrap();
        assert!(reply.is_error);
        assert!(reply.parts.is_empty());
    }

    #[tokio::test]
    async fn test_invocation_failure_is_per_call() {
        let (channel, _) = connected(
            vec![
                Step::Fail(McpError::new(-32000, "browser crashed")),
                Step::Reply(json!({"content": [{"type": "text", "text": "ok now"}]})),
            ],
            AgentConfig::default(),
        )
        .await;

        let err = channel.evaluate(request()).await.unwrap_err();
        assert!(!err.is_fatal());
        assert!(err.to_string().contains("browser crashed"));

        let reply = channel.evaluate(request()).await.unwrap();
        assert_eq!(reply.first_text(), Some("ok now"));
    }

    #[tokio::test]
    async fn test_dead_server_reports_closed() {
        let (channel, _) = connected(
            vec![Step::Error(TransportError::Closed)],
            AgentConfig::default(),
        )
        .await;

        assert!(matches!(channel.evaluate(request()).await, Err(AgentError::Closed)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_call_timeout() {
        let settings = AgentConfig {
            call_timeout_secs: Some(45),
            ..AgentConfig::default()
        };
        let (channel, _) = connected(vec![Step::Hang], settings).await;

        let err = channel.evaluate(request()).await.unwrap_err();
        assert!(matches!(err, AgentError::Timeout(45)));
        assert!(!err.is_fatal());
    }
}
