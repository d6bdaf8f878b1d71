//! # uihealth Protocols
//!
//! Domain types and trait seams for the uihealth engine.
//! Contains only interface definitions - no implementations.
//!
//! ## Core Traits
//!
//! - [`BrowserPage`] - A live, navigable page that can be queried by CSS selector
//! - [`UsabilityEvaluator`] - An external agent that judges a URL in free text
//!
//! ## Core Types
//!
//! - [`PageTarget`] / [`Expectation`] - The registry of what "healthy" means per page
//! - [`PageResult`] / [`AgentEvaluation`] - Per-page verdicts
//! - [`RunReport`] - The aggregate verdict of one run

pub mod agent;
pub mod error;
pub mod expectation;
pub mod page;
pub mod result;

pub use agent::{ContentPart, UsabilityEvaluator, UsabilityReply, UsabilityRequest};
pub use error::{AgentError, PageError};
pub use expectation::{Expectation, PageTarget};
pub use page::BrowserPage;
pub use result::{AgentEvaluation, EvaluationStatus, PageResult, PageVerdict, ProbeResult, RunReport};
