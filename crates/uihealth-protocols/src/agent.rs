//! Agent evaluation protocol definitions.
//!
//! An evaluator receives a URL and a task description and answers with an ordered
//! list of content parts (free text, images).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AgentError;

/// Core trait for semantic usability evaluators.
#[async_trait]
pub trait UsabilityEvaluator: Send + Sync {
    /// Evaluate one page. Requests are issued one at a time.
    async fn evaluate(&self, request: UsabilityRequest) -> Result<UsabilityReply, AgentError>;
}

/// One "evaluate this URL" request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsabilityRequest {
    pub url: String,
    pub task: String,
    pub headless: bool,
}

impl UsabilityRequest {
    pub fn new(url: impl Into<String>, task: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            task: task.into(),
            headless: true,
        }
    }
}

/// A decoded part of an evaluator reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentPart {
    Text(String),
    /// Raw image bytes (already base64-decoded).
    Image(Vec<u8>),
}

/// Evaluator reply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsabilityReply {
    pub parts: Vec<ContentPart>,
    /// The evaluator flagged its own answer as an error.
    pub is_error: bool,
}

impl UsabilityReply {
    pub fn new(parts: Vec<ContentPart>) -> Self {
        Self {
            parts,
            is_error: false,
        }
    }

    /// First text part, if any.
    pub fn first_text(&self) -> Option<&str> {
        self.parts.iter().find_map(|p| match p {
            ContentPart::Text(text) => Some(text.as_str()),
            ContentPart::Image(_) => None,
        })
    }

    /// First image part, if any.
    pub fn first_image(&self) -> Option<&[u8]> {
        self.parts.iter().find_map(|p| match p {
            ContentPart::Image(bytes) => Some(bytes.as_slice()),
            ContentPart::Text(_) => None,
        })
    }
}
