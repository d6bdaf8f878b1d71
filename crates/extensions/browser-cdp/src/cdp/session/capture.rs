//! Screenshots.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::json;

use crate::cdp::error::CdpError;
use crate::cdp::protocol::LayoutMetrics;

use super::core::PageSession;

impl PageSession {
    pub async fn layout_metrics(&self) -> Result<LayoutMetrics, CdpError> {
        let result = self.call("Page.getLayoutMetrics", None).await?;
        Ok(serde_json::from_value(result)?)
    }

    /// Decoded PNG. With `full_page` the clip is the whole document, not the
    /// viewport.
    pub async fn screenshot(&self, full_page: bool) -> Result<Vec<u8>, CdpError> {
        let mut params = json!({ "format": "png", "captureBeyondViewport": full_page });
        if full_page {
            params["clip"] = self.layout_metrics().await?.full_page_clip();
        }

        let result = self.call("Page.captureScreenshot", Some(params)).await?;
        let Some(data) = result["data"].as_str() else {
            return Err(CdpError::InvalidResponse("captureScreenshot returned no data".to_string()));
        };
        Ok(STANDARD.decode(data)?)
    }
}
