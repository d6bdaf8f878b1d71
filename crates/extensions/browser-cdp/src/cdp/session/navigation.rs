//! Navigation operations for CDP page session.

use std::time::Duration;

use serde_json::{Value, json};
use tracing::debug;

use crate::cdp::error::CdpError;
use crate::cdp::protocol::DOM_CONTENT_EVENT;

use super::core::PageSession;

/// Whether a `Page.navigate` result starts a new document.
///
/// Same-document navigations (fragment changes, history API) carry no `loaderId`
/// and never fire DOMContentLoaded.
pub(super) fn is_cross_document(result: &Value) -> bool {
    result
        .get("loaderId")
        .and_then(Value::as_str)
        .is_some_and(|id| !id.is_empty())
}

impl PageSession {
    /// Navigate to `url` and wait until the document is parsed.
    ///
    /// The whole operation, including the DOMContentLoaded wait, is bounded by
    /// `timeout`.
    pub async fn navigate(&self, url: &str, timeout: Duration) -> Result<(), CdpError> {
        tokio::time::timeout(timeout, self.navigate_inner(url))
            .await
            .map_err(|_| CdpError::Timeout(format!("Navigation to {} timed out", url)))?
    }

    async fn navigate_inner(&self, url: &str) -> Result<(), CdpError> {
        let mut events = self.events.lock().await;

        // Events from a previous document must not satisfy this navigation.
        while events.try_recv().is_ok() {}

        let result = self
            .call("Page.navigate", Some(json!({"url": url})))
            .await?;

        if let Some(error) = result.get("errorText").and_then(Value::as_str) {
            if !error.is_empty() {
                return Err(CdpError::NavigationFailed(error.to_string()));
            }
        }

        if is_cross_document(&result) {
            loop {
                match events.recv().await {
                    Some(event) if event.is_event(DOM_CONTENT_EVENT) => break,
                    Some(_) => continue,
                    None => return Err(CdpError::SessionClosed),
                }
            }
        }

        debug!("Navigated to {}", url);
        Ok(())
    }
}
