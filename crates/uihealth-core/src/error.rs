//! Core errors.

use thiserror::Error;
use uihealth_protocols::{AgentError, PageError};

/// Errors raised while evaluating expectations or indicators on a live page.
#[derive(Debug, Error)]
pub enum EvaluatorError {
    /// The page itself failed; the text is recorded verbatim on the page result.
    #[error(transparent)]
    Page(#[from] PageError),

    #[error("Invalid severity indicator '{0}': set exactly one of selector or text")]
    InvalidIndicator(String),
}

/// Artifact store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Invalid artifact key: {0}")]
    InvalidKey(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Screenshot capture errors.
#[derive(Debug, Error)]
pub enum EvidenceError {
    #[error(transparent)]
    Page(#[from] PageError),

    #[error("Failed to store screenshot: {0}")]
    Store(#[from] StoreError),
}

/// Errors that abort a whole run.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("Failed to write report: {0}")]
    Report(#[from] StoreError),

    #[error(transparent)]
    Agent(#[from] AgentError),
}

impl RunError {
    /// Machine-readable kind used in the fatal JSON contract.
    pub fn kind(&self) -> &'static str {
        match self {
            RunError::Report(_) => "report-write-failed",
            RunError::Agent(_) => "spawn-agent-failed",
        }
    }
}
