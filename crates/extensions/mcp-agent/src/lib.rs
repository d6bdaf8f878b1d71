//! Usability evaluation through an external MCP agent.
//!
//! The agent is spawned as a subprocess and spoken to over stdio
//! (newline-delimited JSON-RPC). [`AgentChannel`] implements
//! [`uihealth_protocols::UsabilityEvaluator`] on top of it.

mod channel;
mod client;
mod protocol;
mod transport;

#[cfg(test)]
mod mock;

pub use channel::{AgentChannel, ChannelState};
pub use client::{McpClient, McpClientError};
pub use protocol::{McpContent, McpError, McpMethod, McpRequest, McpResponse, McpToolResult};
pub use transport::{StdioTransport, Transport, TransportError};
