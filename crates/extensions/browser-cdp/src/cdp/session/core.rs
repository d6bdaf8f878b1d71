//! The page session type and its command entry point.

use std::sync::Arc;

use serde_json::{Value, json};
use tokio::sync::{Mutex, mpsc};
use tracing::debug;

use crate::cdp::connection::Connection;
use crate::cdp::error::CdpError;
use crate::cdp::protocol::CdpResponse;

/// A flattened session attached to one tab.
pub struct PageSession {
    target_id: String,
    session_id: String,
    connection: Arc<Connection>,
    /// Events for this session, drained by navigation.
    pub(super) events: Mutex<mpsc::UnboundedReceiver<CdpResponse>>,
}

impl PageSession {
    pub(crate) fn new(
        target_id: String,
        session_id: String,
        connection: Arc<Connection>,
        events: mpsc::UnboundedReceiver<CdpResponse>,
    ) -> Self {
        Self {
            target_id,
            session_id,
            connection,
            events: Mutex::new(events),
        }
    }

    pub fn target_id(&self) -> &str {
        &self.target_id
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Send a command scoped to this tab.
    pub async fn call(&self, method: &str, params: Option<Value>) -> Result<Value, CdpError> {
        self.connection
            .command(method, params, Some(&self.session_id))
            .await
    }

    /// Page events drive navigation waits; Runtime backs selector queries.
    pub(crate) async fn enable_domains(&self) -> Result<(), CdpError> {
        for domain in ["Page.enable", "Runtime.enable"] {
            self.call(domain, None).await?;
        }
        Ok(())
    }

    /// Fix the viewport size for every subsequent navigation.
    pub async fn set_viewport(&self, width: u32, height: u32) -> Result<(), CdpError> {
        let metrics = json!({
            "width": width,
            "height": height,
            "deviceScaleFactor": 1,
            "mobile": false,
        });
        self.call("Emulation.setDeviceMetricsOverride", Some(metrics)).await?;
        debug!("Viewport set to {}x{}", width, height);
        Ok(())
    }
}
