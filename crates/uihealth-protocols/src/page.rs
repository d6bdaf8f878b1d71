//! Browser page protocol definitions.
//!
//! The engine only needs four things from a browser: load a URL, count matches of a
//! selector, read the text of the first match, and take a screenshot.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::PageError;

/// A live page shared across a run. Operations are awaited strictly in sequence.
#[async_trait]
pub trait BrowserPage: Send + Sync {
    /// Navigate to `url` and wait until the document is parsed, bounded by `timeout`.
    async fn goto(&self, url: &str, timeout: Duration) -> Result<(), PageError>;

    /// Number of elements currently matching `selector`.
    async fn count(&self, selector: &str) -> Result<usize, PageError>;

    /// Text content of the first element matching `selector`, if any.
    async fn first_text(&self, selector: &str) -> Result<Option<String>, PageError>;

    /// PNG screenshot. `full_page` captures beyond the viewport.
    async fn screenshot(&self, full_page: bool) -> Result<Vec<u8>, PageError>;
}
