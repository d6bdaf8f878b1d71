//! Verdict types produced by a run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Anything that folds into a [`RunReport`] must say whether it passed.
pub trait PageVerdict {
    fn ok(&self) -> bool;
}

/// Outcome of one bounded polling loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeResult {
    pub satisfied: bool,
    pub attempts_used: u32,
    pub elapsed_ms: u64,
}

/// Verdict and findings for one page in one structural run.
///
/// Field order is the serialized key order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResult {
    pub path: String,
    pub url: String,
    pub ok: bool,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
    pub ms: u64,
}

impl PageResult {
    /// Build a result; `ok` is derived from `errors`.
    pub fn new(
        path: impl Into<String>,
        url: impl Into<String>,
        warnings: Vec<String>,
        errors: Vec<String>,
        ms: u64,
    ) -> Self {
        Self {
            path: path.into(),
            url: url.into(),
            ok: errors.is_empty(),
            warnings,
            errors,
            ms,
        }
    }

    /// A page that could not be loaded: one error, nothing else evaluated.
    pub fn unreachable(
        path: impl Into<String>,
        url: impl Into<String>,
        error: impl Into<String>,
        ms: u64,
    ) -> Self {
        Self::new(path, url, Vec::new(), vec![error.into()], ms)
    }
}

impl PageVerdict for PageResult {
    fn ok(&self) -> bool {
        self.ok
    }
}

/// Status of one agent evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvaluationStatus {
    Ok,
    Error,
}

/// Agent-strategy analogue of [`PageResult`]: qualitative text instead of
/// structured findings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentEvaluation {
    pub page: String,
    pub path: String,
    pub url: String,
    pub status: EvaluationStatus,
    pub evaluation: String,
    /// Location of the persisted screenshot, when the agent returned one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screenshot: Option<String>,
}

impl PageVerdict for AgentEvaluation {
    fn ok(&self) -> bool {
        self.status == EvaluationStatus::Ok
    }
}

/// Aggregate verdict of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport<T> {
    pub ok: bool,
    pub base: String,
    pub asof: DateTime<Utc>,
    pub results: Vec<T>,
}

impl<T: PageVerdict> RunReport<T> {
    /// Fold per-page verdicts; `ok` is the AND over `results`.
    pub fn new(base: impl Into<String>, asof: DateTime<Utc>, results: Vec<T>) -> Self {
        Self {
            ok: results.iter().all(PageVerdict::ok),
            base: base.into(),
            asof,
            results,
        }
    }

    pub fn failed_count(&self) -> usize {
        self.results.iter().filter(|r| !r.ok()).count()
    }
}

#[cfg(test)]
#[path = "result_tests.rs"]
mod tests;
