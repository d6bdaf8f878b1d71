//! Request/response layer on top of a [`Transport`].

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use serde_json::{Value, json};
use tracing::{debug, info};

use crate::protocol::{McpMethod, McpRequest, McpToolResult, PROTOCOL_VERSION};
use crate::transport::{Transport, TransportError};

/// Speaks to one MCP server: handshake first, then tool calls.
pub struct McpClient {
    transport: Arc<dyn Transport>,
    next_id: AtomicI64,
    server_info: Option<Value>,
}

impl McpClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            next_id: AtomicI64::new(1),
            server_info: None,
        }
    }

    /// Issue `method` and return its `result` member (null when absent).
    async fn call(&self, method: McpMethod, params: Value) -> Result<Value, McpClientError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        debug!("MCP call {} (id={})", method.as_str(), id);

        let response = self
            .transport
            .send(McpRequest::call(id, method.as_str()).with_params(params))
            .await?;

        match response.error {
            Some(error) => Err(McpClientError::Server {
                code: error.code,
                message: error.message,
            }),
            None => Ok(response.result.unwrap_or(Value::Null)),
        }
    }

    /// Handshake. `notifications/initialized` goes out only after the server
    /// accepted `initialize`.
    pub async fn initialize(&mut self) -> Result<Value, McpClientError> {
        let params = json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {},
            "clientInfo": { "name": "uihealth", "version": env!("CARGO_PKG_VERSION") },
        });
        let result = self.call(McpMethod::Initialize, params).await?;

        self.transport
            .notify(McpRequest::notification(McpMethod::Initialized.as_str()))
            .await?;

        let name = result
            .pointer("/serverInfo/name")
            .and_then(Value::as_str)
            .unwrap_or("unnamed server");
        info!("MCP session ready ({})", name);

        self.server_info = Some(result.clone());
        Ok(result)
    }

    pub fn server_info(&self) -> Option<&Value> {
        self.server_info.as_ref()
    }

    pub async fn call_tool(&self, name: &str, arguments: Value) -> Result<McpToolResult, McpClientError> {
        let result = self
            .call(McpMethod::CallTool, json!({ "name": name, "arguments": arguments }))
            .await?;
        serde_json::from_value(result).map_err(|e| McpClientError::Malformed(e.to_string()))
    }

    pub async fn close(&self) -> Result<(), McpClientError> {
        Ok(self.transport.close().await?)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum McpClientError {
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// The server answered with a JSON-RPC error object.
    #[error("Server error ({code}): {message}")]
    Server { code: i32, message: String },

    #[error("Malformed result: {0}")]
    Malformed(String),
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
