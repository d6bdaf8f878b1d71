//! Browser-level CDP client.

use std::sync::Arc;

use serde_json::{Value, json};
use tracing::debug;

use super::connection::Connection;
use super::error::CdpError;
use super::protocol::{BrowserVersion, PageInfo};
use super::session::PageSession;

/// A DevTools connection to one browser.
pub struct CdpClient {
    /// `http://host:port`, used for tab creation.
    http_endpoint: String,
    connection: Arc<Connection>,
    pump: tokio::task::JoinHandle<()>,
}

impl CdpClient {
    /// Connect to Chrome at the given DevTools endpoint (e.g. `http://127.0.0.1:9222`).
    pub async fn connect(endpoint: &str) -> Result<Self, CdpError> {
        let http_endpoint = endpoint.trim_end_matches('/').to_string();

        let version = Self::probe(&http_endpoint).await?;
        debug!("Connected to browser: {}", version.browser);

        let (connection, source) = Connection::open(&version.web_socket_debugger_url).await?;
        let connection = Arc::new(connection);
        let pump = {
            let connection = connection.clone();
            tokio::spawn(async move { connection.pump(source).await })
        };

        Ok(Self {
            http_endpoint,
            connection,
            pump,
        })
    }

    /// Query `/json/version`. Succeeds only when a browser answers on `endpoint`.
    pub async fn probe(endpoint: &str) -> Result<BrowserVersion, CdpError> {
        let unavailable = |e: reqwest::Error| CdpError::ChromeNotAvailable(format!("{}: {}", endpoint, e));
        let url = format!("{}/json/version", endpoint.trim_end_matches('/'));

        reqwest::get(&url)
            .await
            .map_err(unavailable)?
            .json()
            .await
            .map_err(unavailable)
    }

    /// Send a browser-level CDP command.
    pub async fn call(&self, method: &str, params: Option<Value>) -> Result<Value, CdpError> {
        self.connection.command(method, params, None).await
    }

    /// Open a blank tab and attach a flattened session to it.
    pub async fn new_page(&self) -> Result<PageSession, CdpError> {
        // /json/new only accepts PUT on current Chrome.
        let page: PageInfo = reqwest::Client::new()
            .put(format!("{}/json/new?about:blank", self.http_endpoint))
            .send()
            .await?
            .json()
            .await?;

        let attached = self
            .call(
                "Target.attachToTarget",
                Some(json!({ "targetId": page.id, "flatten": true })),
            )
            .await?;
        let session_id = attached["sessionId"]
            .as_str()
            .ok_or_else(|| CdpError::InvalidResponse("attachToTarget returned no sessionId".to_string()))?
            .to_string();

        let events = self.connection.subscribe(&session_id).await;
        let session = PageSession::new(page.id, session_id, self.connection.clone(), events);
        session.enable_domains().await?;
        debug!("Attached to target {}", session.target_id());

        Ok(session)
    }

    /// Close a tab and stop routing its events.
    pub async fn close_page(&self, session: &PageSession) -> Result<(), CdpError> {
        self.connection.unsubscribe(session.session_id()).await;
        self.call("Target.closeTarget", Some(json!({ "targetId": session.target_id() })))
            .await
            .map(|_| ())
    }
}

impl Drop for CdpClient {
    fn drop(&mut self) {
        self.pump.abort();
    }
}
