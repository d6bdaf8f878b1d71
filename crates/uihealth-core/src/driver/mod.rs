//! Run drivers.
//!
//! A driver walks the page registry in order, one page at a time, and folds the
//! per-page verdicts into a persisted [`RunReport`]. Per-page failures never stop
//! a run; only report persistence and agent startup errors do.

mod agent;
mod structural;

pub use agent::AgentRunner;
pub use structural::StructuralRunner;

use uihealth_protocols::RunReport;

/// A finished run: the report and where it was written.
#[derive(Debug, Clone)]
pub struct RunOutcome<T> {
    pub report: RunReport<T>,
    pub location: String,
}

/// Milliseconds elapsed since `started`.
pub(crate) fn elapsed_ms(started: tokio::time::Instant) -> u64 {
    started.elapsed().as_millis() as u64
}
