//! Browser instance manager.
//!
//! Connects to a running DevTools endpoint, or launches a headless Chrome with a
//! throwaway profile when nothing answers.

mod manager_core;
mod manager_types;

pub use manager_core::BrowserManager;
pub use manager_types::{BrowserError, BrowserManagerConfig};

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
