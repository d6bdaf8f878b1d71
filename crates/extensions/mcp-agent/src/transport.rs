//! Transport layer for MCP communication.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::sync::Mutex;
use tracing::{debug, trace, warn};

use crate::protocol::{McpError, McpMessage, McpMethod, McpRequest, McpResponse};

/// Transport trait for MCP communication.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a request and wait for the response carrying the same id.
    async fn send(&self, request: McpRequest) -> Result<McpResponse, TransportError>;

    /// Send a request without an id. No response is expected.
    async fn notify(&self, notification: McpRequest) -> Result<(), TransportError>;

    /// Close the transport.
    async fn close(&self) -> Result<(), TransportError>;
}

/// Transport errors.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Failed to spawn {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Process error: {0}")]
    Process(String),

    #[error("Connection closed")]
    Closed,
}

/// Stdio transport for a subprocess MCP server.
///
/// Messages are newline-delimited JSON. The server's stderr is inherited so its
/// logs end up next to ours.
pub struct StdioTransport {
    child: Mutex<Option<Child>>,
    stdin: Mutex<Option<ChildStdin>>,
    stdout: Mutex<Option<BufReader<ChildStdout>>>,
    shutdown_grace: Duration,
}

impl StdioTransport {
    /// Spawn `command` and take over its stdin/stdout.
    pub fn spawn(command: &str, args: &[String]) -> Result<Self, TransportError> {
        debug!("Spawning MCP server: {} {}", command, args.join(" "));

        let mut child = Command::new(command)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| TransportError::Spawn {
                command: command.to_string(),
                source,
            })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| TransportError::Process("Failed to capture stdin".to_string()))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| TransportError::Process("Failed to capture stdout".to_string()))?;

        Ok(Self {
            child: Mutex::new(Some(child)),
            stdin: Mutex::new(Some(stdin)),
            stdout: Mutex::new(Some(BufReader::new(stdout))),
            shutdown_grace: Duration::from_millis(2000),
        })
    }

    /// Time between SIGTERM and a forced kill on close.
    pub fn with_shutdown_grace(mut self, grace: Duration) -> Self {
        self.shutdown_grace = grace;
        self
    }

    async fn write_line<T: serde::Serialize>(stdin: &mut ChildStdin, message: &T) -> Result<(), TransportError> {
        let json = serde_json::to_string(message)?;
        trace!("MCP send: {}", json);
        stdin.write_all(json.as_bytes()).await?;
        stdin.write_all(b"\n").await?;
        stdin.flush().await?;
        Ok(())
    }

    async fn terminate(child: &mut Child, grace: Duration) -> Result<(), TransportError> {
        #[cfg(unix)]
        {
            use nix::sys::signal::{Signal, kill};
            use nix::unistd::Pid;

            if let Some(pid) = child.id() {
                if let Err(e) = kill(Pid::from_raw(pid as i32), Signal::SIGTERM) {
                    warn!("Failed to send SIGTERM to MCP server: {}", e);
                }
                match tokio::time::timeout(grace, child.wait()).await {
                    Ok(status) => {
                        let status = status?;
                        debug!("MCP server exited: {}", status);
                        return Ok(());
                    }
                    Err(_) => warn!("MCP server ignored SIGTERM for {:?}, killing", grace),
                }
            }
        }

        #[cfg(not(unix))]
        let _ = grace;

        child.kill().await?;
        Ok(())
    }
}

#[async_trait]
impl Transport for StdioTransport {
    async fn send(&self, request: McpRequest) -> Result<McpResponse, TransportError> {
        let mut stdin_guard = self.stdin.lock().await;
        let stdin = stdin_guard.as_mut().ok_or(TransportError::Closed)?;

        let mut stdout_guard = self.stdout.lock().await;
        let stdout = stdout_guard.as_mut().ok_or(TransportError::Closed)?;

        Self::write_line(stdin, &request).await?;

        let mut line = String::new();
        loop {
            line.clear();
            if stdout.read_line(&mut line).await? == 0 {
                return Err(TransportError::Closed);
            }
            let text = line.trim();
            if text.is_empty() {
                continue;
            }
            trace!("MCP recv: {}", text);

            match McpMessage::parse(text) {
                Ok(McpMessage::Response(response)) if response.id == request.id => return Ok(response),
                Ok(McpMessage::Response(response)) => {
                    // Late answer to a call we stopped waiting for.
                    debug!("Discarding response for stale request {:?}", response.id);
                }
                Ok(McpMessage::Request(note)) if note.is_notification() => {
                    debug!("MCP notification: {}", note.method);
                }
                Ok(McpMessage::Request(server_req)) => {
                    let outcome = if server_req.method == McpMethod::Ping.as_str() {
                        Ok(serde_json::json!({}))
                    } else {
                        debug!("Rejecting server request: {}", server_req.method);
                        Err(McpError::method_not_found())
                    };
                    Self::write_line(stdin, &McpResponse::answer(server_req.id, outcome)).await?;
                }
                Err(e) => warn!("Ignoring malformed MCP line: {}", e),
            }
        }
    }

    async fn notify(&self, notification: McpRequest) -> Result<(), TransportError> {
        let mut stdin_guard = self.stdin.lock().await;
        let stdin = stdin_guard.as_mut().ok_or(TransportError::Closed)?;
        Self::write_line(stdin, &notification).await
    }

    async fn close(&self) -> Result<(), TransportError> {
        // Closing stdin is the polite shutdown signal for stdio servers.
        *self.stdin.lock().await = None;
        *self.stdout.lock().await = None;

        if let Some(mut child) = self.child.lock().await.take() {
            Self::terminate(&mut child, self.shutdown_grace).await?;
        }

        Ok(())
    }
}
