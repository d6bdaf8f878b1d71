//! Page interaction errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PageError {
    #[error("Navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("Navigation to {url} timed out after {timeout_ms} ms")]
    Timeout { url: String, timeout_ms: u64 },

    #[error("Query '{selector}' failed: {message}")]
    Query { selector: String, message: String },

    #[error("Screenshot failed: {0}")]
    Screenshot(String),

    #[error("Page session closed")]
    Closed,

    #[error("Browser error: {0}")]
    Backend(String),
}

impl PageError {
    pub fn navigation(url: impl Into<String>, message: impl Into<String>) -> Self {
        PageError::Navigation {
            url: url.into(),
            message: message.into(),
        }
    }

    pub fn query(selector: impl Into<String>, message: impl Into<String>) -> Self {
        PageError::Query {
            selector: selector.into(),
            message: message.into(),
        }
    }

    /// Whether this error happened while loading the document, as opposed to
    /// while inspecting an already loaded page.
    pub fn is_navigation(&self) -> bool {
        matches!(self, PageError::Navigation { .. } | PageError::Timeout { .. })
    }
}
