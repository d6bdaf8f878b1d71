//! Browser-backed commands: the structural check and the single-URL snapshot.

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tracing::{info, warn};

use uihealth_browser_cdp::{BrowserManager, BrowserManagerConfig, CdpPage};
use uihealth_config::Config;
use uihealth_core::{RunOutcome, StructuralRunner};
use uihealth_protocols::{BrowserPage, PageResult};

use crate::fatal::Fatal;
use crate::print_json;

/// Run the structural pipeline over the registry and print the report.
pub(crate) async fn run_check(config: &Config) -> Result<ExitCode, Fatal> {
    let manager = BrowserManager::new(BrowserManagerConfig::from(&config.browser));
    manager.connect().await.map_err(Fatal::browser)?;

    let result = check_with(&manager, config).await;
    shutdown(&manager).await;

    let outcome = result?;
    info!("Report written to {}", outcome.location);
    print_json(&outcome.report);
    Ok(ExitCode::SUCCESS)
}

async fn check_with(manager: &BrowserManager, config: &Config) -> Result<RunOutcome<PageResult>, Fatal> {
    let page = Arc::new(manager.open_page().await.map_err(Fatal::browser)?);
    let runner = StructuralRunner::from_config(config, page.clone()).map_err(Fatal::indicators)?;

    let registry = config.registry();
    info!("Checking {} pages against {}", registry.len(), config.target.base_url);
    let outcome = runner.run(&registry).await.map_err(Fatal::run);

    close_page(&page).await;
    outcome
}

/// Navigate to one URL and save a full-page screenshot.
pub(crate) async fn run_snap(config: &Config, url: &str, out: &Path) -> Result<ExitCode, Fatal> {
    let manager = BrowserManager::new(BrowserManagerConfig::from(&config.browser));
    manager.connect().await.map_err(Fatal::browser)?;

    let timeout = Duration::from_millis(config.browser.snapshot_timeout_ms);
    let result = snap_with(&manager, url, out, timeout).await;
    shutdown(&manager).await;

    result?;
    print_json(&json!({ "ok": true, "screenshot": out.display().to_string() }));
    Ok(ExitCode::SUCCESS)
}

async fn snap_with(manager: &BrowserManager, url: &str, out: &Path, timeout: Duration) -> Result<(), Fatal> {
    let page = manager.open_page().await.map_err(Fatal::browser)?;

    let captured = async {
        page.goto(url, timeout).await?;
        page.screenshot(true).await
    }
    .await;
    close_page(&page).await;
    let bytes = captured.map_err(Fatal::snap)?;

    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(Fatal::snap)?;
    }
    tokio::fs::write(out, &bytes).await.map_err(Fatal::snap)?;
    info!("Saved screenshot to {}", out.display());
    Ok(())
}

async fn close_page(page: &CdpPage) {
    if let Err(e) = page.close().await {
        warn!("Failed to close page: {}", e);
    }
}

async fn shutdown(manager: &BrowserManager) {
    if let Err(e) = manager.shutdown().await {
        warn!("Browser shutdown failed: {}", e);
    }
}
