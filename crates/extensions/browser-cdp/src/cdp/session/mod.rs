//! CDP page session for interacting with a single page.

mod capture;
mod core;
mod navigation;
mod runtime;

pub use self::core::PageSession;
