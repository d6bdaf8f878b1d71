//! Error types for the uihealth protocol layer.

mod agent;
mod page;

pub use agent::*;
pub use page::*;
