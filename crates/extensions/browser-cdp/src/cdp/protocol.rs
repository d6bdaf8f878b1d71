//! Wire types for the DevTools socket and HTTP endpoints.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Fired once the main document has been parsed.
pub const DOM_CONTENT_EVENT: &str = "Page.domContentEventFired";

/// Outgoing command. `sessionId` targets a flattened page session.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CdpRequest {
    pub id: u64,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

/// Incoming frame: a command response when `id` is set, an event otherwise.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CdpResponse {
    pub id: Option<u64>,
    pub result: Option<Value>,
    pub error: Option<CdpErrorResponse>,
    pub method: Option<String>,
    pub params: Option<Value>,
    pub session_id: Option<String>,
}

impl CdpResponse {
    pub fn is_event(&self, method: &str) -> bool {
        self.id.is_none() && self.method.as_deref() == Some(method)
    }
}

#[derive(Debug, Deserialize)]
pub struct CdpErrorResponse {
    pub code: i64,
    pub message: String,
}

/// The `/json/new` answer. Only the target id is needed to attach.
#[derive(Debug, Clone, Deserialize)]
pub struct PageInfo {
    pub id: String,
}

/// `/json/version`. Chrome uses PascalCase keys here, except for the socket URL.
#[derive(Debug, Clone, Deserialize)]
pub struct BrowserVersion {
    #[serde(rename = "Browser")]
    pub browser: String,
    #[serde(rename = "webSocketDebuggerUrl")]
    pub web_socket_debugger_url: String,
}

/// Rectangle in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Subset of `Page.getLayoutMetrics`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutMetrics {
    /// Present on Chrome 92+; preferred over the device-pixel `content_size`.
    pub css_content_size: Option<Rect>,
    pub content_size: Rect,
}

impl LayoutMetrics {
    /// Full document size in CSS pixels.
    pub fn document_size(&self) -> Rect {
        self.css_content_size.unwrap_or(self.content_size)
    }

    /// `Page.captureScreenshot` clip covering the whole document at scale 1.
    pub fn full_page_clip(&self) -> Value {
        let size = self.document_size();
        json!({
            "x": 0,
            "y": 0,
            "width": size.width.ceil(),
            "height": size.height.ceil(),
            "scale": 1,
        })
    }
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
