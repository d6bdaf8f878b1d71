//! [`BrowserPage`] over a CDP session.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use uihealth_protocols::{BrowserPage, PageError};

use crate::cdp::{CdpClient, CdpError, PageSession};

/// The single page a run drives.
pub struct CdpPage {
    client: Arc<CdpClient>,
    session: PageSession,
}

impl CdpPage {
    pub(crate) fn new(client: Arc<CdpClient>, session: PageSession) -> Self {
        Self { client, session }
    }

    pub fn session(&self) -> &PageSession {
        &self.session
    }

    /// Close the tab.
    pub async fn close(&self) -> Result<(), CdpError> {
        self.client.close_page(&self.session).await
    }
}

fn navigation_error(url: &str, timeout: Duration, error: CdpError) -> PageError {
    match error {
        CdpError::Timeout(_) => PageError::Timeout {
            url: url.to_string(),
            timeout_ms: timeout.as_millis() as u64,
        },
        CdpError::SessionClosed => PageError::Closed,
        CdpError::NavigationFailed(text) => PageError::navigation(url, text),
        other => PageError::navigation(url, other.to_string()),
    }
}

fn query_error(selector: &str, error: CdpError) -> PageError {
    match error {
        CdpError::SessionClosed => PageError::Closed,
        CdpError::JavaScript(text) => PageError::query(selector, text),
        other => PageError::Backend(other.to_string()),
    }
}

#[async_trait]
impl BrowserPage for CdpPage {
    async fn goto(&self, url: &str, timeout: Duration) -> Result<(), PageError> {
        self.session
            .navigate(url, timeout)
            .await
            .map_err(|e| navigation_error(url, timeout, e))
    }

    async fn count(&self, selector: &str) -> Result<usize, PageError> {
        self.session
            .count(selector)
            .await
            .map_err(|e| query_error(selector, e))
    }

    async fn first_text(&self, selector: &str) -> Result<Option<String>, PageError> {
        self.session
            .first_text(selector)
            .await
            .map_err(|e| query_error(selector, e))
    }

    async fn screenshot(&self, full_page: bool) -> Result<Vec<u8>, PageError> {
        self.session.screenshot(full_page).await.map_err(|e| match e {
            CdpError::SessionClosed => PageError::Closed,
            other => PageError::Screenshot(other.to_string()),
        })
    }
}
