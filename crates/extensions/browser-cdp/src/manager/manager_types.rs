//! Browser manager type definitions and configuration.

use std::path::PathBuf;

use thiserror::Error;
use uihealth_config::BrowserConfig;

use crate::cdp::CdpError;

/// Browser manager errors. All of them are startup-class.
#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Browser not connected")]
    NotConnected,

    #[error("Chrome not found. Install Google Chrome or Chromium, or set browser.chrome_path.")]
    ChromeNotFound,

    #[error("Failed to launch Chrome: {0}")]
    LaunchFailed(String),

    #[error(transparent)]
    Cdp(#[from] CdpError),
}

/// Browser configuration.
#[derive(Debug, Clone)]
pub struct BrowserManagerConfig {
    /// DevTools endpoint to try first.
    pub endpoint: Option<String>,
    /// Explicit Chrome executable.
    pub chrome_path: Option<PathBuf>,
    /// Port for a launched Chrome.
    pub debug_port: u16,
    pub viewport_width: u32,
    pub viewport_height: u32,
    pub headless: bool,
}

impl Default for BrowserManagerConfig {
    fn default() -> Self {
        Self::from(&BrowserConfig::default())
    }
}

impl From<&BrowserConfig> for BrowserManagerConfig {
    fn from(config: &BrowserConfig) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            chrome_path: config.chrome_path.clone(),
            debug_port: config.debug_port,
            viewport_width: config.viewport_width,
            viewport_height: config.viewport_height,
            headless: config.headless,
        }
    }
}

impl BrowserManagerConfig {
    /// Endpoint of an already running browser.
    pub fn endpoint(&self) -> String {
        self.endpoint
            .clone()
            .unwrap_or_else(|| self.launch_endpoint())
    }

    /// Endpoint a browser launched by us listens on.
    pub fn launch_endpoint(&self) -> String {
        format!("http://127.0.0.1:{}", self.debug_port)
    }
}
