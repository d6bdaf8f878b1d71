//! BrowserManager core: connect, launch, open page, shutdown.

use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;
use tokio::process::{Child, Command};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::{BrowserError, BrowserManagerConfig};
use crate::cdp::CdpClient;
use crate::page::CdpPage;

/// Poll interval and attempts while waiting for a launched Chrome (~6 s).
const LAUNCH_POLL: Duration = Duration::from_millis(200);
const LAUNCH_ATTEMPTS: u32 = 30;

/// A Chrome process started by this manager.
struct LaunchedChrome {
    child: Child,
    /// Removed when dropped, after the process is gone.
    _profile: TempDir,
}

/// Owns the browser connection for one run.
pub struct BrowserManager {
    config: BrowserManagerConfig,
    client: RwLock<Option<Arc<CdpClient>>>,
    chrome: RwLock<Option<LaunchedChrome>>,
}

impl BrowserManager {
    pub fn new(config: BrowserManagerConfig) -> Self {
        Self {
            config,
            client: RwLock::new(None),
            chrome: RwLock::new(None),
        }
    }

    pub fn config(&self) -> &BrowserManagerConfig {
        &self.config
    }

    /// Find a Chrome/Chromium executable.
    pub fn find_chrome() -> Option<PathBuf> {
        #[cfg(target_os = "macos")]
        let paths: &[&str] = &[
            "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
            "/Applications/Chromium.app/Contents/MacOS/Chromium",
        ];

        #[cfg(target_os = "linux")]
        let paths: &[&str] = &[
            "/usr/bin/google-chrome",
            "/usr/bin/google-chrome-stable",
            "/usr/bin/chromium",
            "/usr/bin/chromium-browser",
            "/snap/bin/chromium",
        ];

        #[cfg(target_os = "windows")]
        let paths: &[&str] = &[
            r"C:\Program Files\Google\Chrome\Application\chrome.exe",
            r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
        ];

        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        let paths: &[&str] = &[];

        paths.iter().map(PathBuf::from).find(|p| p.exists())
    }

    fn chrome_path(&self) -> Result<PathBuf, BrowserError> {
        match &self.config.chrome_path {
            Some(path) if path.exists() => Ok(path.clone()),
            Some(path) => Err(BrowserError::LaunchFailed(format!(
                "{} does not exist",
                path.display()
            ))),
            None => Self::find_chrome().ok_or(BrowserError::ChromeNotFound),
        }
    }

    async fn launch_chrome(&self) -> Result<LaunchedChrome, BrowserError> {
        let chrome_path = self.chrome_path()?;
        let profile = TempDir::with_prefix("uihealth-chrome-")
            .map_err(|e| BrowserError::LaunchFailed(format!("profile directory: {}", e)))?;

        info!("Launching {} on port {}", chrome_path.display(), self.config.debug_port);

        let mut cmd = Command::new(&chrome_path);
        cmd.arg(format!("--remote-debugging-port={}", self.config.debug_port))
            .arg(format!("--user-data-dir={}", profile.path().display()))
            .arg("--no-first-run")
            .arg("--no-default-browser-check")
            .arg("--disable-background-networking")
            .arg("--disable-sync")
            .arg("--disable-extensions")
            .arg("--mute-audio")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        if self.config.headless {
            cmd.arg("--headless=new");
        }

        let child = cmd
            .spawn()
            .map_err(|e| BrowserError::LaunchFailed(e.to_string()))?;

        info!("Chrome launched with PID: {:?}", child.id());
        Ok(LaunchedChrome {
            child,
            _profile: profile,
        })
    }

    /// Connect to the browser, launching one if nothing answers.
    pub async fn connect(&self) -> Result<(), BrowserError> {
        if self.client.read().await.is_some() {
            return Ok(());
        }

        let mut endpoint = self.config.endpoint();
        if CdpClient::probe(&endpoint).await.is_err() {
            info!("No browser at {}, launching one", endpoint);
            let launched = self.launch_chrome().await?;
            *self.chrome.write().await = Some(launched);

            endpoint = self.config.launch_endpoint();
            let mut ready = false;
            for _ in 0..LAUNCH_ATTEMPTS {
                tokio::time::sleep(LAUNCH_POLL).await;
                if CdpClient::probe(&endpoint).await.is_ok() {
                    ready = true;
                    break;
                }
            }

            if !ready {
                self.shutdown().await?;
                return Err(BrowserError::LaunchFailed(
                    "Chrome failed to start within timeout".to_string(),
                ));
            }
        }

        let client = CdpClient::connect(&endpoint).await?;
        *self.client.write().await = Some(Arc::new(client));

        info!("Connected to Chrome at {}", endpoint);
        Ok(())
    }

    async fn client(&self) -> Result<Arc<CdpClient>, BrowserError> {
        self.client
            .read()
            .await
            .clone()
            .ok_or(BrowserError::NotConnected)
    }

    /// Open the page shared by the whole run, with the configured viewport.
    pub async fn open_page(&self) -> Result<CdpPage, BrowserError> {
        let client = self.client().await?;
        let session = client.new_page().await?;
        session
            .set_viewport(self.config.viewport_width, self.config.viewport_height)
            .await?;
        debug!("Opened page {}", session.target_id());
        Ok(CdpPage::new(client, session))
    }

    /// Whether Chrome was launched by this manager.
    pub async fn launched(&self) -> bool {
        self.chrome.read().await.is_some()
    }

    /// Drop the connection and stop Chrome if this manager launched it.
    pub async fn shutdown(&self) -> Result<(), BrowserError> {
        let _ = self.client.write().await.take();
        if let Some(mut launched) = self.chrome.write().await.take() {
            info!("Shutting down Chrome");
            if let Err(e) = launched.child.kill().await {
                warn!("Failed to kill Chrome: {}", e);
            }
        }
        Ok(())
    }
}
