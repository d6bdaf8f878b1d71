//! # uihealth Browser (CDP)
//!
//! A [`BrowserPage`](uihealth_protocols::BrowserPage) backed by a headless
//! Chrome/Chromium driven over the Chrome DevTools Protocol.
//!
//! ```rust,ignore
//! let manager = BrowserManager::new(BrowserManagerConfig::from(&config.browser));
//! manager.connect().await?;
//! let page = manager.open_page().await?;
//! page.goto("http://127.0.0.1:8050/signals", Duration::from_secs(15)).await?;
//! manager.shutdown().await?;
//! ```

pub mod cdp;
pub mod manager;
mod page;

pub use cdp::{CdpClient, CdpError, PageSession};
pub use manager::{BrowserError, BrowserManager, BrowserManagerConfig};
pub use page::CdpPage;
