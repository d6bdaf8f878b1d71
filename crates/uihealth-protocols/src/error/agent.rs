//! Agent evaluation errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("Failed to spawn evaluation agent: {0}")]
    Spawn(String),

    #[error("Agent handshake failed: {0}")]
    Handshake(String),

    #[error("Tool invocation failed: {0}")]
    Invocation(String),

    #[error("Tool invocation timed out after {0} seconds")]
    Timeout(u64),

    #[error("Agent channel closed")]
    Closed,
}

impl AgentError {
    /// Startup-class errors abort the whole run; the rest are per-page.
    pub fn is_fatal(&self) -> bool {
        matches!(self, AgentError::Spawn(_) | AgentError::Handshake(_))
    }
}
