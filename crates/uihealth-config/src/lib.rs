//! # uihealth Config
//!
//! Configuration management for the uihealth engine: target origin, browser,
//! probe budget, severity indicators, artifact locations, agent process, and the
//! page registry.

mod error;
mod loader;
mod schema;
mod validator;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::*;
pub use validator::{ConfigValidator, ValidationError, ValidationResult, ValidationWarning};
