//! Chrome DevTools Protocol plumbing.
//!
//! One WebSocket per browser, flattened sessions per tab. Only the Page,
//! Runtime, Emulation and Target domains are used.

mod client;
mod connection;
mod error;
mod protocol;
mod session;

pub use client::CdpClient;
pub use error::CdpError;
pub use protocol::{BrowserVersion, LayoutMetrics, Rect};
pub use session::PageSession;
