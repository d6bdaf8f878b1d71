//! Assertion evaluation against a live page.

use tracing::debug;
use uihealth_protocols::{BrowserPage, Expectation};

use crate::error::EvaluatorError;
use crate::probe::{ProbePolicy, probe};

/// Verdict of one expectation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Pass,
    /// Recorded, does not affect the page verdict.
    Warn(String),
    /// Recorded, fails the page.
    Fail(String),
}

impl Outcome {
    pub fn is_pass(&self) -> bool {
        matches!(self, Outcome::Pass)
    }
}

/// Evaluates expectations one at a time on the page it is handed.
#[derive(Debug, Clone, Default)]
pub struct AssertionEvaluator {
    policy: ProbePolicy,
}

impl AssertionEvaluator {
    pub fn new(policy: ProbePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ProbePolicy {
        &self.policy
    }

    /// Evaluate a single expectation.
    ///
    /// `Exists` and every `AnyOf` alternative are probed with the full retry budget.
    /// `TextContains` queries once: it is meant for static headings that are present
    /// as soon as the document is parsed.
    pub async fn evaluate(
        &self,
        page: &dyn BrowserPage,
        expectation: &Expectation,
    ) -> Result<Outcome, EvaluatorError> {
        let outcome = match expectation {
            Expectation::Exists { selector } => {
                if self.present(page, selector).await? {
                    Outcome::Pass
                } else {
                    Outcome::Fail(format!("missing {}", selector))
                }
            }
            Expectation::TextContains { selector, contains } => {
                if page.count(selector).await? == 0 {
                    Outcome::Fail(format!("missing {}", selector))
                } else {
                    match page.first_text(selector).await? {
                        None => Outcome::Fail(format!("missing {}", selector)),
                        Some(text) if text.contains(contains.as_str()) => Outcome::Pass,
                        Some(_) => {
                            Outcome::Warn(format!("text '{}' not found in {}", contains, selector))
                        }
                    }
                }
            }
            Expectation::AnyOf { selectors } => {
                let mut matched = false;
                for selector in selectors {
                    if self.present(page, selector).await? {
                        matched = true;
                        break;
                    }
                }
                if matched {
                    Outcome::Pass
                } else {
                    Outcome::Fail(format!("none of selectors present: {}", selectors.join(", ")))
                }
            }
        };

        debug!("{} check {:?} -> {:?}", expectation.kind(), expectation.selectors(), outcome);
        Ok(outcome)
    }

    async fn present(&self, page: &dyn BrowserPage, selector: &str) -> Result<bool, EvaluatorError> {
        let result = probe(&self.policy, || async move { page.count(selector).await.map(|n| n > 0) })
            .await?;
        Ok(result.satisfied)
    }
}

#[cfg(test)]
#[path = "evaluator_tests.rs"]
mod tests;
